//! HTTP request handler bridging hyper to the JSON-RPC engine

use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::CONTENT_TYPE;
use hyper::{Method, Request, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

use quill_json_rpc_server::{JsonRpcDispatcher, JsonRpcError, RequestContext, ToJsonRpcError};

use crate::{Result, server::ServerConfig};

/// HTTP handler for JSON-RPC requests
///
/// Enforces the transport guards (method, content type, body size, UTF-8,
/// well-formed JSON) and delegates everything protocol-shaped to the
/// engine. JSON-RPC errors go out in-band with HTTP 200; only transport
/// violations use 4xx status codes.
pub struct HttpRpcHandler<E>
where
    E: ToJsonRpcError,
{
    pub(crate) config: ServerConfig,
    pub(crate) dispatcher: Arc<JsonRpcDispatcher<E>>,
}

impl<E> Clone for HttpRpcHandler<E>
where
    E: ToJsonRpcError,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            dispatcher: Arc::clone(&self.dispatcher),
        }
    }
}

impl<E> HttpRpcHandler<E>
where
    E: ToJsonRpcError,
{
    pub fn new(config: ServerConfig, dispatcher: Arc<JsonRpcDispatcher<E>>) -> Self {
        Self { config, dispatcher }
    }

    /// Handle an HTTP request on the RPC path
    pub async fn handle_rpc_request(
        &self,
        req: Request<hyper::body::Incoming>,
        peer_addr: Option<SocketAddr>,
    ) -> Result<Response<Full<Bytes>>> {
        match *req.method() {
            Method::POST => self.handle_post(req, peer_addr).await,
            Method::OPTIONS => self.handle_preflight(),
            _ => self.method_not_allowed(),
        }
    }

    async fn handle_post(
        &self,
        req: Request<hyper::body::Incoming>,
        peer_addr: Option<SocketAddr>,
    ) -> Result<Response<Full<Bytes>>> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|ct| ct.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            warn!("invalid content type: {}", content_type);
            return Ok(plain_response(
                StatusCode::BAD_REQUEST,
                "Content-Type must be application/json",
            ));
        }

        let body_bytes = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(err) => {
                error!("failed to read request body: {}", err);
                return Ok(plain_response(
                    StatusCode::BAD_REQUEST,
                    "Failed to read request body",
                ));
            }
        };

        if body_bytes.len() > self.config.max_body_size {
            warn!("request body too large: {} bytes", body_bytes.len());
            return Ok(plain_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body too large",
            ));
        }

        let body_str = match std::str::from_utf8(&body_bytes) {
            Ok(s) => s,
            Err(err) => {
                error!("invalid UTF-8 in request body: {}", err);
                return Ok(plain_response(
                    StatusCode::BAD_REQUEST,
                    "Request body must be valid UTF-8",
                ));
            }
        };

        let mut context = RequestContext::new();
        if let Some(addr) = peer_addr {
            context = context.with_peer_addr(addr);
        }

        self.process_body(body_str, Some(context)).await
    }

    /// Run one raw body through the engine and shape the HTTP reply
    async fn process_body(
        &self,
        body_str: &str,
        context: Option<RequestContext>,
    ) -> Result<Response<Full<Bytes>>> {
        debug!("received JSON-RPC body: {}", body_str);

        let body: Value = match serde_json::from_str(body_str) {
            Ok(value) => value,
            Err(err) => {
                // Not well-formed JSON at all: a ParseError envelope,
                // reported in-band like every other protocol error.
                debug!("JSON parse error: {}", err);
                return json_response(&JsonRpcError::parse_error());
            }
        };

        match self.dispatcher.handle_body(body, context).await {
            Some(payload) => json_response(&payload),
            None => {
                // Pure notifications: transport success, no body owed.
                debug!("no response body owed");
                Ok(Response::builder()
                    .status(StatusCode::NO_CONTENT)
                    .body(Full::new(Bytes::new()))
                    .unwrap())
            }
        }
    }

    /// Handle OPTIONS preflight requests
    fn handle_preflight(&self) -> Result<Response<Full<Bytes>>> {
        Ok(Response::builder()
            .status(StatusCode::OK)
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type, Accept")
            .header("Access-Control-Max-Age", "86400")
            .body(Full::new(Bytes::new()))
            .unwrap())
    }

    fn method_not_allowed(&self) -> Result<Response<Full<Bytes>>> {
        Ok(Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("Allow", "POST, OPTIONS")
            .body(Full::new(Bytes::from("Method not allowed")))
            .unwrap())
    }
}

fn json_response<T: serde::Serialize>(payload: &T) -> Result<Response<Full<Bytes>>> {
    let body = serde_json::to_string(payload)?;
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .unwrap())
}

fn plain_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .body(Full::new(Bytes::from(message)))
        .unwrap()
}
