//! # JSON-RPC 2.0 Lifecycle Engine
//!
//! A pure, transport-agnostic JSON-RPC 2.0 server engine: envelope
//! validation, method dispatch, batching and notification semantics.
//! Transports hand in a raw JSON body and write back whatever payload the
//! engine decides is owed — possibly nothing.
//!
//! ## Features
//! - Full JSON-RPC 2.0 batching rules: per-element failure isolation,
//!   notification suppression, no body for notification-only batches
//! - Structural envelope validation before any typed decoding
//! - Type-safe domain/protocol error separation via [`ToJsonRpcError`]
//! - Async handlers with `async` feature; stream-backed handlers with
//!   `streams`

pub mod error;
pub mod notification;
pub mod request;
pub mod response;
pub mod types;
pub mod validate;

#[cfg(feature = "async")]
pub mod r#async;

pub mod prelude;

// Re-export main types
pub use error::{JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, RpcFailure, ToJsonRpcError};
pub use notification::JsonRpcNotification;
pub use request::{JsonRpcRequest, RequestParams};
pub use response::{JsonRpcMessage, JsonRpcResponse, ResponsePayload};
pub use types::{JsonRpcVersion, RequestId};
pub use validate::{InvalidEnvelope, extract_id, has_id, validate_envelope};

#[cfg(feature = "async")]
pub use r#async::{FunctionHandler, JsonRpcDispatcher, JsonRpcHandler, RequestContext};

#[cfg(feature = "streams")]
pub use r#async::StreamHandler;

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
