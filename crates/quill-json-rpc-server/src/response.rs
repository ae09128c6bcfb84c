use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::JsonRpcError;
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
///
/// `id` echoes the originating request's id verbatim. A handler that
/// produced no explicit value gets `result: null`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result,
        }
    }

    pub fn success(id: RequestId, result: Value) -> Self {
        Self::new(id, result)
    }

    /// Response for a void method; `result` is still present, as `null`.
    pub fn null(id: RequestId) -> Self {
        Self::new(id, Value::Null)
    }
}

/// Union of a success response and an error response
///
/// Keeping the two as separate structs means a serialized message can never
/// carry both `result` and `error`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    pub fn error(error: JsonRpcError) -> Self {
        Self::Error(error)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// The correlating id, from either arm. `None` only for errors whose
    /// originating id could not be determined.
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.id),
            JsonRpcMessage::Error(err) => err.id.as_ref(),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// The whole response body for one transport payload
///
/// A single request yields `Single`; a batch yields `Batch`, with
/// suppressed notifications already filtered out. "No body at all" is
/// represented by the dispatcher returning `Option::None`, never by an
/// empty `Batch`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

impl ResponsePayload {
    pub fn messages(&self) -> &[JsonRpcMessage] {
        match self {
            ResponsePayload::Single(msg) => std::slice::from_ref(msg),
            ResponsePayload::Batch(msgs) => msgs,
        }
    }
}

impl From<JsonRpcMessage> for ResponsePayload {
    fn from(message: JsonRpcMessage) -> Self {
        ResponsePayload::Single(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_response_serialization() {
        let response = JsonRpcResponse::success(RequestId::Number(1), json!({"ok": true}));

        let json_str = to_string(&response).unwrap();
        let parsed: JsonRpcResponse = from_str(&json_str).unwrap();

        assert_eq!(parsed.id, RequestId::Number(1));
        assert_eq!(parsed.result, json!({"ok": true}));
    }

    #[test]
    fn test_null_result_is_serialized() {
        let response = JsonRpcResponse::null(RequestId::String("test".to_string()));
        let json_str = to_string(&response).unwrap();
        assert!(json_str.contains("\"result\":null"));
    }

    #[test]
    fn test_message_never_mixes_result_and_error() {
        let success = JsonRpcMessage::success(RequestId::Number(1), json!(3));
        let failure = JsonRpcMessage::error(JsonRpcError::method_not_found(RequestId::Number(2)));

        let success_json = to_string(&success).unwrap();
        let failure_json = to_string(&failure).unwrap();

        assert!(success_json.contains("\"result\""));
        assert!(!success_json.contains("\"error\""));
        assert!(failure_json.contains("\"error\""));
        assert!(!failure_json.contains("\"result\""));
    }

    #[test]
    fn test_payload_shapes() {
        let single = ResponsePayload::Single(JsonRpcMessage::success(RequestId::Number(1), json!(3)));
        assert_eq!(to_string(&single).unwrap(), r#"{"jsonrpc":"2.0","id":1,"result":3}"#);

        let batch = ResponsePayload::Batch(vec![
            JsonRpcMessage::success(RequestId::Number(1), json!(3)),
            JsonRpcMessage::error(JsonRpcError::method_not_found(RequestId::Number(2))),
        ]);
        let json_str = to_string(&batch).unwrap();
        assert!(json_str.starts_with('['));
        assert!(json_str.ends_with(']'));
    }

    #[test]
    fn test_message_id_accessor() {
        let msg = JsonRpcMessage::success(RequestId::Number(7), json!(null));
        assert_eq!(msg.id(), Some(&RequestId::Number(7)));

        let err = JsonRpcMessage::error(JsonRpcError::invalid_request(None));
        assert_eq!(err.id(), None);
    }
}
