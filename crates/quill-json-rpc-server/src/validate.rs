//! Structural validation of a single request envelope
//!
//! A pure predicate over the raw JSON value, run before any typed
//! deserialization. The key-set rule follows the JSON-RPC 2.0 envelope
//! shape: exactly `{jsonrpc, method}` mandatory, `{params, id}` optional,
//! nothing else permitted.

use serde_json::Value;
use thiserror::Error;

use crate::types::RequestId;

const MANDATORY_KEYS: [&str; 2] = ["jsonrpc", "method"];
const IGNORABLE_KEYS: [&str; 2] = ["params", "id"];

/// Why an envelope failed structural validation
///
/// Every variant maps to the single `InvalidRequest` protocol error; the
/// distinction exists for logging only and is never sent to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InvalidEnvelope {
    #[error("envelope is not a JSON object")]
    NotAnObject,
    #[error("key set does not match the JSON-RPC 2.0 envelope shape")]
    KeySet,
    #[error("jsonrpc version is not the literal \"2.0\"")]
    Version,
    #[error("method is not a string")]
    MethodType,
    #[error("id is not a string, an integer, or null")]
    IdType,
}

/// Validate one request envelope against the 2.0 structural rules
///
/// Valid iff: the key set minus `{params, id}` equals `{jsonrpc, method}`
/// as an unordered set, `jsonrpc` is literally `"2.0"`, `method` is a
/// string, and `id` (when present) is null, a string, or an integer.
/// Idempotent and side-effect free.
pub fn validate_envelope(raw: &Value) -> Result<(), InvalidEnvelope> {
    let obj = raw.as_object().ok_or(InvalidEnvelope::NotAnObject)?;

    let mut seen = [false; MANDATORY_KEYS.len()];
    for key in obj.keys() {
        if IGNORABLE_KEYS.contains(&key.as_str()) {
            continue;
        }
        match MANDATORY_KEYS.iter().position(|k| *k == key.as_str()) {
            Some(i) => seen[i] = true,
            None => return Err(InvalidEnvelope::KeySet),
        }
    }
    if seen != [true; MANDATORY_KEYS.len()] {
        return Err(InvalidEnvelope::KeySet);
    }

    match obj.get("jsonrpc") {
        Some(Value::String(version)) if version == crate::JSONRPC_VERSION => {}
        _ => return Err(InvalidEnvelope::Version),
    }

    if !obj.get("method").is_some_and(Value::is_string) {
        return Err(InvalidEnvelope::MethodType);
    }

    if let Some(id) = obj.get("id") {
        if !is_valid_id_type(id) {
            return Err(InvalidEnvelope::IdType);
        }
    }

    Ok(())
}

/// Whether the envelope carries an `id` key at all
///
/// Absence — not a null value — is what makes a notification.
pub fn has_id(raw: &Value) -> bool {
    raw.as_object().is_some_and(|obj| obj.contains_key("id"))
}

/// Recover a trustworthy id from a possibly malformed envelope
///
/// Used for the error-echo fallback: a string, integer, or null id is
/// echoed back even when the rest of the envelope is invalid. Anything
/// else yields `None` and the error goes out with `id: null`.
pub fn extract_id(raw: &Value) -> Option<RequestId> {
    match raw.as_object()?.get("id")? {
        Value::Null => Some(RequestId::Null),
        Value::String(s) => Some(RequestId::String(s.clone())),
        Value::Number(n) => RequestId::from_json_number(n),
        _ => None,
    }
}

fn is_valid_id_type(id: &Value) -> bool {
    match id {
        Value::Null | Value::String(_) => true,
        Value::Number(n) => RequestId::from_json_number(n).is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_valid_envelope() {
        assert_eq!(
            validate_envelope(&json!({"jsonrpc": "2.0", "method": "ping"})),
            Ok(())
        );
    }

    #[test]
    fn test_full_valid_envelope() {
        let raw = json!({"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1});
        assert_eq!(validate_envelope(&raw), Ok(()));
    }

    #[test]
    fn test_validation_is_idempotent() {
        let raw = json!({"jsonrpc": "2.0", "method": "add", "id": "a"});
        assert_eq!(validate_envelope(&raw), Ok(()));
        assert_eq!(validate_envelope(&raw), Ok(()));
    }

    #[test]
    fn test_missing_jsonrpc_key() {
        assert_eq!(
            validate_envelope(&json!({"method": "add", "id": 1})),
            Err(InvalidEnvelope::KeySet)
        );
    }

    #[test]
    fn test_missing_method_key() {
        assert_eq!(
            validate_envelope(&json!({"jsonrpc": "2.0", "id": 1})),
            Err(InvalidEnvelope::KeySet)
        );
    }

    #[test]
    fn test_extra_key_rejected() {
        let raw = json!({"jsonrpc": "2.0", "method": "add", "extra": true});
        assert_eq!(validate_envelope(&raw), Err(InvalidEnvelope::KeySet));
    }

    #[test]
    fn test_wrong_version_literal() {
        assert_eq!(
            validate_envelope(&json!({"jsonrpc": "1.0", "method": "add"})),
            Err(InvalidEnvelope::Version)
        );
        assert_eq!(
            validate_envelope(&json!({"jsonrpc": 2.0, "method": "add"})),
            Err(InvalidEnvelope::Version)
        );
    }

    #[test]
    fn test_method_must_be_string() {
        assert_eq!(
            validate_envelope(&json!({"jsonrpc": "2.0", "method": 42})),
            Err(InvalidEnvelope::MethodType)
        );
    }

    #[test]
    fn test_id_types() {
        // Float spellings of integers count as integers
        for id in [json!(1), json!("abc"), json!(null), json!(2.0), json!(1e2)] {
            let raw = json!({"jsonrpc": "2.0", "method": "m", "id": id});
            assert_eq!(validate_envelope(&raw), Ok(()));
        }
        for id in [json!(1.5), json!(true), json!({}), json!([1])] {
            let raw = json!({"jsonrpc": "2.0", "method": "m", "id": id});
            assert_eq!(validate_envelope(&raw), Err(InvalidEnvelope::IdType));
        }
    }

    #[test]
    fn test_non_object_envelopes() {
        for raw in [json!("hello"), json!(42), json!(null), json!(true)] {
            assert_eq!(validate_envelope(&raw), Err(InvalidEnvelope::NotAnObject));
        }
    }

    #[test]
    fn test_has_id_distinguishes_absent_from_null() {
        assert!(!has_id(&json!({"jsonrpc": "2.0", "method": "m"})));
        assert!(has_id(&json!({"jsonrpc": "2.0", "method": "m", "id": null})));
    }

    #[test]
    fn test_extract_id_from_malformed_envelope() {
        assert_eq!(
            extract_id(&json!({"method": "add", "id": 1})),
            Some(RequestId::Number(1))
        );
        assert_eq!(
            extract_id(&json!({"id": "x"})),
            Some(RequestId::String("x".to_string()))
        );
        assert_eq!(extract_id(&json!({"id": null})), Some(RequestId::Null));
        assert_eq!(
            extract_id(&json!({"id": 100.0})),
            Some(RequestId::Number(100))
        );
        // A non-id-typed value cannot be trusted for correlation
        assert_eq!(extract_id(&json!({"id": {"nested": 1}})), None);
        assert_eq!(extract_id(&json!({"method": "add"})), None);
        assert_eq!(extract_id(&json!("not an object")), None);
    }
}
