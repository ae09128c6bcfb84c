//! Simple Calculator JSON-RPC Example
//!
//! Demonstrates registering a handler, running single requests,
//! notifications and a batch through the dispatcher, and the responses
//! (or absence of responses) each produces.

use async_trait::async_trait;
use serde_json::{Value, json};

use quill_json_rpc_server::{
    JsonRpcDispatcher, JsonRpcHandler, RequestParams, RpcFailure,
    r#async::RequestContext,
};

/// Calculator handler implementing basic arithmetic
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
            "divide" if b == 0.0 => Err(RpcFailure::declared(-32000, "division by zero")),
            "divide" => Ok(json!(a / b)),
            other => Err(RpcFailure::internal(format!("unexpected method {other}"))),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        vec!["add".to_string(), "subtract".to_string(), "divide".to_string()]
    }
}

#[tokio::main]
async fn main() {
    let mut dispatcher: JsonRpcDispatcher<RpcFailure> = JsonRpcDispatcher::new();
    dispatcher.register_methods(
        vec!["add".to_string(), "subtract".to_string(), "divide".to_string()],
        CalculatorHandler,
    );

    let bodies = [
        json!({"jsonrpc": "2.0", "method": "add", "params": {"a": 1, "b": 2}, "id": 1}),
        json!({"jsonrpc": "2.0", "method": "divide", "params": {"a": 1, "b": 0}, "id": 2}),
        // Notification: runs, but no response is owed
        json!({"jsonrpc": "2.0", "method": "subtract", "params": {"a": 5, "b": 3}}),
        // Batch mixing requests and a notification
        json!([
            {"jsonrpc": "2.0", "method": "add", "params": {"a": 10, "b": 20}, "id": 3},
            {"jsonrpc": "2.0", "method": "nope", "id": 4},
            {"jsonrpc": "2.0", "method": "add", "params": {"a": 0, "b": 0}}
        ]),
    ];

    for body in bodies {
        println!("--> {}", body);
        match dispatcher.handle_body(body, None).await {
            Some(payload) => println!("<-- {}", serde_json::to_string(&payload).unwrap()),
            None => println!("<-- (no response body)"),
        }
    }
}
