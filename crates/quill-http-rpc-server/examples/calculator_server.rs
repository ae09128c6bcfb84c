//! Calculator HTTP JSON-RPC server
//!
//! Run with `cargo run --example calculator_server`, then:
//!
//! ```sh
//! curl -s localhost:8545/rpc -H 'Content-Type: application/json' \
//!   -d '{"jsonrpc":"2.0","method":"add","params":{"a":1,"b":2},"id":1}'
//! ```

use async_trait::async_trait;
use serde_json::{Value, json};

use quill_http_rpc_server::{
    HttpRpcServer, JsonRpcHandler, RequestContext, RpcFailure,
};
use quill_json_rpc_server::RequestParams;

struct CalculatorHandler;

#[async_trait]
impl JsonRpcHandler for CalculatorHandler {
    type Error = RpcFailure;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        _context: Option<RequestContext>,
    ) -> Result<Value, Self::Error> {
        let params = params.ok_or_else(|| RpcFailure::internal("missing parameters"))?;
        let a = params
            .get("a")
            .and_then(Value::as_f64)
            .ok_or_else(|| RpcFailure::internal("parameter 'a' must be a number"))?;
        let b = params
            .get("b")
            .and_then(Value::as_f64)
            .ok_or_else(|| RpcFailure::internal("parameter 'b' must be a number"))?;

        match method {
            "add" => Ok(json!(a + b)),
            "subtract" => Ok(json!(a - b)),
            other => Err(RpcFailure::internal(format!("unexpected method {other}"))),
        }
    }
}

#[tokio::main]
async fn main() -> quill_http_rpc_server::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let server: HttpRpcServer<RpcFailure> = HttpRpcServer::builder()
        .register_methods(
            vec!["add".to_string(), "subtract".to_string()],
            CalculatorHandler,
        )
        .build();

    server.run().await
}
