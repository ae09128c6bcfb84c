use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// JSON-RPC protocol version marker
///
/// Serializes as the literal string `"2.0"`. Using an enum instead of a
/// plain `String` makes it impossible to construct an envelope with any
/// other version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JsonRpcVersion {
    #[serde(rename = "2.0")]
    V2_0,
}

impl Default for JsonRpcVersion {
    fn default() -> Self {
        JsonRpcVersion::V2_0
    }
}

impl fmt::Display for JsonRpcVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("2.0")
    }
}

/// Identifier correlating a request with its response
///
/// Per the JSON-RPC 2.0 spec an id is a string, an integer, or `null`.
/// Float spellings of integers (`2.0`, `1e2`) are accepted and
/// normalized. A request whose `id` key is *absent* is a notification and
/// is modeled as [`crate::notification::JsonRpcNotification`], not as a
/// variant here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    /// An explicit JSON `null` id. Unusual but valid; it still addresses
    /// the request and is echoed back verbatim.
    Null,
}

impl RequestId {
    pub fn is_null(&self) -> bool {
        matches!(self, RequestId::Null)
    }

    /// Build an id from any JSON number that is mathematically an
    /// integer, whatever its spelling. Fractional values, and magnitudes
    /// outside the `i64` range, yield `None`.
    pub fn from_json_number(n: &serde_json::Number) -> Option<Self> {
        if let Some(i) = n.as_i64() {
            return Some(RequestId::Number(i));
        }
        match n.as_f64() {
            // -(i64::MIN as f64) is exactly 2^63
            Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < -(i64::MIN as f64) => {
                Some(RequestId::Number(f as i64))
            }
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for RequestId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(RequestId::Null),
            Value::String(s) => Ok(RequestId::String(s)),
            Value::Number(n) => RequestId::from_json_number(&n)
                .ok_or_else(|| D::Error::custom("id must be an integer, a string, or null")),
            _ => Err(D::Error::custom("id must be an integer, a string, or null")),
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{}", n),
            RequestId::String(s) => f.write_str(s),
            RequestId::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, to_string};

    #[test]
    fn test_version_serialization() {
        let json = to_string(&JsonRpcVersion::V2_0).unwrap();
        assert_eq!(json, "\"2.0\"");

        let parsed: JsonRpcVersion = from_str("\"2.0\"").unwrap();
        assert_eq!(parsed, JsonRpcVersion::V2_0);

        assert!(from_str::<JsonRpcVersion>("\"1.0\"").is_err());
    }

    #[test]
    fn test_request_id_round_trip() {
        let cases = [
            (RequestId::Number(42), "42"),
            (RequestId::String("abc".to_string()), "\"abc\""),
            (RequestId::Null, "null"),
        ];

        for (id, expected) in cases {
            let json = to_string(&id).unwrap();
            assert_eq!(json, expected);
            let parsed: RequestId = from_str(&json).unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn test_request_id_rejects_non_integer_number() {
        assert!(from_str::<RequestId>("1.5").is_err());
        assert!(from_str::<RequestId>("true").is_err());
        assert!(from_str::<RequestId>("[1]").is_err());
    }

    #[test]
    fn test_request_id_normalizes_float_spelled_integers() {
        assert_eq!(from_str::<RequestId>("2.0").unwrap(), RequestId::Number(2));
        assert_eq!(from_str::<RequestId>("1e2").unwrap(), RequestId::Number(100));
        assert_eq!(
            from_str::<RequestId>("-3.0").unwrap(),
            RequestId::Number(-3)
        );
        // Integral, but outside the representable id range
        assert!(from_str::<RequestId>("1e300").is_err());
    }
}
