use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
///
/// The envelope places no shape requirement on `params`: structured
/// forms get dedicated variants, anything else is passed through to the
/// handler untouched.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(HashMap<String, Value>),
    /// Any other JSON value (string, number, bool, null)
    Other(Value),
}

impl RequestParams {
    /// Get a parameter by name (object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            _ => None,
        }
    }

    /// Get a parameter by position (array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
            RequestParams::Other(value) => value.is_null(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            RequestParams::Object(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            RequestParams::Array(arr) => Value::Array(arr.clone()),
            RequestParams::Other(value) => value.clone(),
        }
    }
}

impl From<Value> for RequestParams {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(vec) => RequestParams::Array(vec),
            Value::Object(map) => RequestParams::Object(map.into_iter().collect()),
            other => RequestParams::Other(other),
        }
    }
}

impl From<HashMap<String, Value>> for RequestParams {
    fn from(map: HashMap<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

/// An addressed JSON-RPC request (the `id` key is present)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: RequestId,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
}

impl JsonRpcRequest {
    pub fn new(id: RequestId, method: impl Into<String>, params: Option<RequestParams>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            method: method.into(),
            params,
        }
    }

    pub fn new_no_params(id: RequestId, method: impl Into<String>) -> Self {
        Self::new(id, method, None)
    }

    pub fn new_with_object_params(
        id: RequestId,
        method: impl Into<String>,
        params: HashMap<String, Value>,
    ) -> Self {
        Self::new(id, method, Some(RequestParams::Object(params)))
    }

    pub fn new_with_array_params(
        id: RequestId,
        method: impl Into<String>,
        params: Vec<Value>,
    ) -> Self {
        Self::new(id, method, Some(RequestParams::Array(params)))
    }

    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_string};

    #[test]
    fn test_request_serialization() {
        let request = JsonRpcRequest::new_no_params(RequestId::Number(1), "test_method");

        let json = to_string(&request).unwrap();
        let parsed: JsonRpcRequest = from_str(&json).unwrap();

        assert_eq!(parsed.id, RequestId::Number(1));
        assert_eq!(parsed.method, "test_method");
        assert!(parsed.params.is_none());
    }

    #[test]
    fn test_request_with_null_id() {
        let parsed: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#).unwrap();
        assert_eq!(parsed.id, RequestId::Null);

        // null id is echoed verbatim, not dropped
        let json = to_string(&parsed).unwrap();
        assert!(json.contains("\"id\":null"));
    }

    #[test]
    fn test_request_with_object_params() {
        let mut params = HashMap::new();
        params.insert("name".to_string(), json!("test"));
        params.insert("value".to_string(), json!(42));

        let request = JsonRpcRequest::new_with_object_params(
            RequestId::String("req1".to_string()),
            "set_value",
            params,
        );

        assert_eq!(request.get_param("name"), Some(&json!("test")));
        assert_eq!(request.get_param("value"), Some(&json!(42)));
        assert_eq!(request.get_param("missing"), None);
    }

    #[test]
    fn test_request_with_primitive_params() {
        let parsed: JsonRpcRequest =
            from_str(r#"{"jsonrpc":"2.0","method":"set","params":5,"id":1}"#).unwrap();
        match parsed.params {
            Some(RequestParams::Other(ref value)) => assert_eq!(value, &json!(5)),
            other => panic!("expected passthrough params, got {:?}", other),
        }

        // Named accessors don't apply to a primitive
        assert_eq!(parsed.get_param("a"), None);
        assert_eq!(parsed.get_param_index(0), None);
    }

    #[test]
    fn test_request_with_array_params() {
        let params = vec![json!("test"), json!(42), json!(true)];

        let request = JsonRpcRequest::new_with_array_params(RequestId::Number(2), "process", params);

        assert_eq!(request.get_param_index(0), Some(&json!("test")));
        assert_eq!(request.get_param_index(1), Some(&json!(42)));
        assert_eq!(request.get_param_index(2), Some(&json!(true)));
        assert_eq!(request.get_param_index(3), None);
    }
}
