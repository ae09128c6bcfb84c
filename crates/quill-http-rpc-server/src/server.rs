//! HTTP server loop and builder
//!
//! Handler registration happens on the builder; `build()` freezes the
//! dispatcher behind `Arc`, after which the method table is read-only for
//! the lifetime of the server.

use std::net::SocketAddr;

use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use quill_json_rpc_server::{JsonRpcDispatcher, JsonRpcHandler, ToJsonRpcError};

use crate::{CorsLayer, HttpRpcHandler, Result};

/// Configuration for the HTTP RPC server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: SocketAddr,
    /// Path that accepts JSON-RPC POST bodies
    pub rpc_path: String,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum request body size
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8545".parse().unwrap(),
            rpc_path: "/rpc".to_string(),
            enable_cors: true,
            max_body_size: 1024 * 1024, // 1MB
        }
    }
}

/// Builder for the HTTP RPC server
pub struct HttpRpcServerBuilder<E>
where
    E: ToJsonRpcError,
{
    config: ServerConfig,
    dispatcher: JsonRpcDispatcher<E>,
}

impl<E> HttpRpcServerBuilder<E>
where
    E: ToJsonRpcError,
{
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            dispatcher: JsonRpcDispatcher::new(),
        }
    }

    /// Set the bind address
    pub fn bind_address(mut self, addr: SocketAddr) -> Self {
        self.config.bind_address = addr;
        self
    }

    /// Set the RPC endpoint path
    pub fn rpc_path(mut self, path: impl Into<String>) -> Self {
        self.config.rpc_path = path.into();
        self
    }

    /// Enable or disable CORS
    pub fn cors(mut self, enable: bool) -> Self {
        self.config.enable_cors = enable;
        self
    }

    /// Set maximum request body size
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    /// Register a handler for a single method
    pub fn register_method<H>(mut self, method: impl Into<String>, handler: H) -> Self
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.dispatcher.register_method(method.into(), handler);
        self
    }

    /// Register a handler for multiple methods
    pub fn register_methods<H>(mut self, methods: Vec<String>, handler: H) -> Self
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.dispatcher.register_methods(methods, handler);
        self
    }

    /// Build the HTTP RPC server, freezing the method registry
    pub fn build(self) -> HttpRpcServer<E> {
        HttpRpcServer {
            handler: HttpRpcHandler::new(self.config, Arc::new(self.dispatcher)),
        }
    }
}

impl<E> Default for HttpRpcServerBuilder<E>
where
    E: ToJsonRpcError,
{
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP JSON-RPC server
#[derive(Clone)]
pub struct HttpRpcServer<E>
where
    E: ToJsonRpcError,
{
    handler: HttpRpcHandler<E>,
}

impl<E> HttpRpcServer<E>
where
    E: ToJsonRpcError,
{
    pub fn builder() -> HttpRpcServerBuilder<E> {
        HttpRpcServerBuilder::new()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.handler.config
    }

    /// Run the accept loop
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(&self.handler.config.bind_address).await?;
        info!("HTTP RPC server listening on {}", self.handler.config.bind_address);
        info!("RPC endpoint available at: {}", self.handler.config.rpc_path);

        loop {
            let (stream, peer_addr) = listener.accept().await?;
            debug!("new connection from {}", peer_addr);

            let handler = self.handler.clone();
            tokio::spawn(async move {
                let io = TokioIo::new(stream);
                let service =
                    service_fn(move |req| handle_request(req, handler.clone(), peer_addr));

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    // Client disconnects mid-request are routine, not faults
                    let err_str = err.to_string();
                    if err_str.contains("connection closed before message completed") {
                        debug!("client disconnected: {}", err);
                    } else {
                        error!("error serving connection: {}", err);
                    }
                }
            });
        }
    }
}

async fn handle_request<E>(
    req: Request<hyper::body::Incoming>,
    handler: HttpRpcHandler<E>,
    peer_addr: SocketAddr,
) -> std::result::Result<Response<Full<Bytes>>, hyper::Error>
where
    E: ToJsonRpcError,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    debug!("handling {} {}", method, path);

    let mut response = if path == handler.config.rpc_path {
        match handler.handle_rpc_request(req, Some(peer_addr)).await {
            Ok(response) => response,
            Err(err) => {
                error!("request handling error: {}", err);
                Response::builder()
                    .status(StatusCode::INTERNAL_SERVER_ERROR)
                    .body(Full::new(Bytes::from("Internal Server Error")))
                    .unwrap()
            }
        }
    } else {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Full::new(Bytes::from("Not Found")))
            .unwrap()
    };

    if handler.config.enable_cors {
        CorsLayer::apply_cors_headers(response.headers_mut());
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_json_rpc_server::RpcFailure;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.rpc_path, "/rpc");
        assert!(config.enable_cors);
        assert_eq!(config.max_body_size, 1024 * 1024);
    }

    #[test]
    fn test_builder() {
        let addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 3000);
        let server: HttpRpcServer<RpcFailure> = HttpRpcServer::builder()
            .bind_address(addr)
            .rpc_path("/api/rpc")
            .cors(false)
            .max_body_size(2048)
            .build();

        assert_eq!(server.config().bind_address, addr);
        assert_eq!(server.config().rpc_path, "/api/rpc");
        assert!(!server.config().enable_cors);
        assert_eq!(server.config().max_body_size, 2048);
    }
}
