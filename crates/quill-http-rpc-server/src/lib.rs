//! # HTTP JSON-RPC Server
//!
//! HTTP transport for the quill JSON-RPC 2.0 engine. A single configured
//! path accepts POST bodies — one envelope or a batch — and writes back
//! either the serialized response payload or nothing at all when every
//! request was a pure notification.
//!
//! Protocol-level errors travel in-band as JSON-RPC error objects; the
//! HTTP status reports transport-level success only.

pub mod cors;
pub mod handler;
pub mod server;

// Re-export main types
pub use cors::CorsLayer;
pub use handler::HttpRpcHandler;
pub use server::{HttpRpcServer, HttpRpcServerBuilder, ServerConfig};

// Re-export foundational engine types
pub use quill_json_rpc_server::{
    JsonRpcDispatcher, JsonRpcHandler, RequestContext, RpcFailure, ToJsonRpcError,
};

/// Result type for HTTP RPC operations
pub type Result<T> = std::result::Result<T, HttpRpcError>;

/// HTTP transport errors
#[derive(Debug, thiserror::Error)]
pub enum HttpRpcError {
    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] quill_json_rpc_server::JsonRpcError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
