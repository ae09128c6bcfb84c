use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{
    error::{JsonRpcError, ToJsonRpcError},
    notification::JsonRpcNotification,
    request::{JsonRpcRequest, RequestParams},
    response::{JsonRpcMessage, ResponsePayload},
    validate,
};

/// Transport context handed opaquely to handlers
///
/// The engine never reads it; it exists so a transport can thread peer
/// information through to handler implementations.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub peer_addr: Option<SocketAddr>,
    pub metadata: HashMap<String, Value>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_peer_addr(mut self, addr: SocketAddr) -> Self {
        self.peer_addr = Some(addr);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Trait for handling JSON-RPC method calls
///
/// A handler is an opaque computation that eventually yields one value or
/// one failure. Returns domain errors only; the dispatcher converts them
/// to wire error objects at the protocol boundary.
#[async_trait]
pub trait JsonRpcHandler: Send + Sync {
    /// The error type returned by this handler
    type Error: ToJsonRpcError;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<RequestContext>,
    ) -> Result<Value, Self::Error>;

    /// List supported methods (optional - used for introspection)
    fn supported_methods(&self) -> Vec<String> {
        vec![]
    }
}

/// A simple function-based handler
pub struct FunctionHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::future::BoxFuture<'static, Result<Value, E>>
        + Send
        + Sync,
{
    handler_fn: F,
    methods: Vec<String>,
}

impl<F, E> FunctionHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::future::BoxFuture<'static, Result<Value, E>>
        + Send
        + Sync,
{
    pub fn new(handler_fn: F) -> Self {
        Self {
            handler_fn,
            methods: vec![],
        }
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }
}

#[async_trait]
impl<F, E> JsonRpcHandler for FunctionHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::future::BoxFuture<'static, Result<Value, E>>
        + Send
        + Sync,
{
    type Error = E;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<RequestContext>,
    ) -> Result<Value, Self::Error> {
        (self.handler_fn)(method, params, context).await
    }

    fn supported_methods(&self) -> Vec<String> {
        self.methods.clone()
    }
}

/// Adapter for handlers that produce a stream of values
///
/// The protocol owes at most one terminal value per invocation, so the
/// stream is driven to its first item and then dropped; an empty stream
/// settles as `null`. Multi-emission handlers are a misuse of this
/// protocol and the surplus items are never observed.
#[cfg(feature = "streams")]
pub struct StreamHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::stream::BoxStream<'static, Result<Value, E>>
        + Send
        + Sync,
{
    stream_fn: F,
    methods: Vec<String>,
}

#[cfg(feature = "streams")]
impl<F, E> StreamHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::stream::BoxStream<'static, Result<Value, E>>
        + Send
        + Sync,
{
    pub fn new(stream_fn: F) -> Self {
        Self {
            stream_fn,
            methods: vec![],
        }
    }

    pub fn with_methods(mut self, methods: Vec<String>) -> Self {
        self.methods = methods;
        self
    }
}

#[cfg(feature = "streams")]
#[async_trait]
impl<F, E> JsonRpcHandler for StreamHandler<F, E>
where
    E: ToJsonRpcError,
    F: Fn(
            &str,
            Option<RequestParams>,
            Option<RequestContext>,
        ) -> futures::stream::BoxStream<'static, Result<Value, E>>
        + Send
        + Sync,
{
    type Error = E;

    async fn handle(
        &self,
        method: &str,
        params: Option<RequestParams>,
        context: Option<RequestContext>,
    ) -> Result<Value, Self::Error> {
        use futures::StreamExt;

        let mut stream = (self.stream_fn)(method, params, context);
        match stream.next().await {
            Some(item) => item,
            None => Ok(Value::Null),
        }
    }

    fn supported_methods(&self) -> Vec<String> {
        self.methods.clone()
    }
}

/// JSON-RPC method dispatcher
///
/// Owns the method registry and runs the full request lifecycle:
/// validate, look up, invoke, wrap. Registration happens during an
/// explicit build phase; once the dispatcher is shared behind `Arc` it is
/// read-only and safe for concurrent lookups.
pub struct JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    handlers: HashMap<String, Arc<dyn JsonRpcHandler<Error = E>>>,
}

impl<E> JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler for a specific method
    pub fn register_method<H>(&mut self, method: String, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        self.handlers.insert(method, Arc::new(handler));
    }

    /// Register a handler for multiple methods
    pub fn register_methods<H>(&mut self, methods: Vec<String>, handler: H)
    where
        H: JsonRpcHandler<Error = E> + 'static,
    {
        let handler_arc = Arc::new(handler);
        for method in methods {
            self.handlers.insert(method, handler_arc.clone());
        }
    }

    /// Look up a handler by exact, case-sensitive method name
    pub fn lookup(&self, method: &str) -> Option<&Arc<dyn JsonRpcHandler<Error = E>>> {
        self.handlers.get(method)
    }

    pub fn contains_method(&self, method: &str) -> bool {
        self.handlers.contains_key(method)
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<String> {
        self.handlers.keys().cloned().collect()
    }

    /// Process one whole transport payload: a single envelope or a batch
    ///
    /// Returns `None` when no response body is owed at all (pure
    /// notifications). An empty batch yields one `InvalidRequest` error
    /// object keyed to no id, never an array.
    pub async fn handle_body(
        &self,
        body: Value,
        context: Option<RequestContext>,
    ) -> Option<ResponsePayload> {
        match body {
            Value::Array(items) => {
                if items.is_empty() {
                    debug!("rejecting empty batch");
                    return Some(ResponsePayload::Single(
                        JsonRpcError::invalid_request(None).into(),
                    ));
                }

                // One independent lifecycle per element, joined at the end.
                // A failing element never aborts or alters its siblings.
                let lifecycles = items
                    .into_iter()
                    .map(|item| self.process_value(item, context.clone()));
                let settled = future::join_all(lifecycles).await;

                let responses: Vec<JsonRpcMessage> = settled.into_iter().flatten().collect();
                if responses.is_empty() {
                    // A batch of nothing but notifications gets no body,
                    // not even an empty array.
                    None
                } else {
                    Some(ResponsePayload::Batch(responses))
                }
            }
            single => self
                .process_value(single, context)
                .await
                .map(ResponsePayload::Single),
        }
    }

    /// Run the request lifecycle for exactly one envelope
    ///
    /// `None` means no output is owed: a notification that succeeded, or a
    /// notification whose failure is suppressed by protocol rule. A
    /// structurally invalid envelope always produces an error, with the
    /// extracted id or `null`, because the client otherwise gets no signal
    /// about a rejected payload.
    pub async fn process_value(
        &self,
        raw: Value,
        context: Option<RequestContext>,
    ) -> Option<JsonRpcMessage> {
        if let Err(reason) = validate::validate_envelope(&raw) {
            debug!(%reason, "rejecting malformed envelope");
            return Some(JsonRpcError::invalid_request(validate::extract_id(&raw)).into());
        }

        if validate::has_id(&raw) {
            let fallback_id = validate::extract_id(&raw);
            let request: JsonRpcRequest = match serde_json::from_value(raw) {
                Ok(request) => request,
                Err(err) => {
                    // Validation vets everything typed decoding inspects,
                    // so this arm should be dead; fail closed if it isn't.
                    debug!(%err, "envelope failed typed decoding");
                    return Some(JsonRpcError::invalid_request(fallback_id).into());
                }
            };
            Some(self.handle_request(request, context).await)
        } else {
            let notification: JsonRpcNotification = match serde_json::from_value(raw) {
                Ok(notification) => notification,
                Err(err) => {
                    debug!(%err, "envelope failed typed decoding");
                    return Some(JsonRpcError::invalid_request(None).into());
                }
            };
            self.handle_notification(notification, context).await;
            None
        }
    }

    /// Process an addressed JSON-RPC request and return a response
    pub async fn handle_request(
        &self,
        request: JsonRpcRequest,
        context: Option<RequestContext>,
    ) -> JsonRpcMessage {
        match self.lookup(&request.method) {
            Some(handler) => {
                match handler
                    .handle(&request.method, request.params.clone(), context)
                    .await
                {
                    Ok(result) => JsonRpcMessage::success(request.id, result),
                    Err(domain_error) => {
                        // Convert the domain error at the protocol boundary
                        let error_object = domain_error.to_error_object();
                        JsonRpcMessage::error(JsonRpcError::new(Some(request.id), error_object))
                    }
                }
            }
            None => {
                debug!(method = %request.method, "method not registered");
                JsonRpcMessage::error(JsonRpcError::method_not_found(request.id))
            }
        }
    }

    /// Process a JSON-RPC notification
    ///
    /// The handler runs for its side effects; success and failure alike
    /// produce no response. An unregistered method is dropped silently.
    pub async fn handle_notification(
        &self,
        notification: JsonRpcNotification,
        context: Option<RequestContext>,
    ) {
        match self.lookup(&notification.method) {
            Some(handler) => {
                if let Err(err) = handler
                    .handle(&notification.method, notification.params.clone(), context)
                    .await
                {
                    warn!(
                        method = %notification.method,
                        error = %err,
                        "notification handler failed; no response owed"
                    );
                }
            }
            None => {
                debug!(
                    method = %notification.method,
                    "dropping notification for unregistered method"
                );
            }
        }
    }
}

impl<E> Default for JsonRpcDispatcher<E>
where
    E: ToJsonRpcError,
{
    fn default() -> Self {
        Self::new()
    }
}
