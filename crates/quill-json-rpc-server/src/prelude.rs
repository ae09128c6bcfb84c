//! # JSON-RPC Engine Prelude
//!
//! Convenient re-exports of the most commonly used types.
//!
//! ```rust
//! use quill_json_rpc_server::prelude::*;
//! ```

// Core JSON-RPC types
pub use crate::error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, RpcFailure, ToJsonRpcError};
pub use crate::notification::JsonRpcNotification;
pub use crate::request::{JsonRpcRequest, RequestParams};
pub use crate::response::{JsonRpcMessage, JsonRpcResponse, ResponsePayload};
pub use crate::types::{JsonRpcVersion, RequestId};
pub use crate::validate::{InvalidEnvelope, validate_envelope};

#[cfg(feature = "async")]
pub use crate::r#async::{JsonRpcDispatcher, JsonRpcHandler, RequestContext};

// Standard error codes
pub use crate::error_codes::*;
