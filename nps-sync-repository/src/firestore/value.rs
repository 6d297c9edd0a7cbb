//! Decoding and encoding of Firestore typed values.
//!
//! Firestore wraps every value in a single-key object naming its type, e.g.
//! `{"integerValue": "9"}` or `{"mapValue": {"fields": {...}}}`. These helpers
//! unwrap them into plain JSON so records can be decoded without knowing the
//! wire format.

use serde_json::{json, Map, Number, Value};

use crate::errors::StoreError;
use crate::types::StoredDocument;
use crate::utils::document_id_from_name;

/// Decode one typed value. Unknown value types decode as `null`.
pub fn decode_value(typed: &Value) -> Value {
    let Some(object) = typed.as_object() else {
        return Value::Null;
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Value::Null;
    };

    match kind.as_str() {
        "stringValue" | "timestampValue" | "referenceValue" | "bytesValue" => inner.clone(),
        "booleanValue" => inner.clone(),
        // int64 travels as a JSON string
        "integerValue" => match inner {
            Value::String(s) => s
                .parse::<i64>()
                .map(|n| Value::Number(n.into()))
                .unwrap_or(Value::Null),
            Value::Number(_) => inner.clone(),
            _ => Value::Null,
        },
        "doubleValue" => match inner {
            Value::Number(_) => inner.clone(),
            Value::String(s) => s
                .parse::<f64>()
                .ok()
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            _ => Value::Null,
        },
        "geoPointValue" => inner.clone(),
        "mapValue" => Value::Object(
            inner
                .get("fields")
                .and_then(Value::as_object)
                .map(decode_fields)
                .unwrap_or_default(),
        ),
        "arrayValue" => Value::Array(
            inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode_value).collect())
                .unwrap_or_default(),
        ),
        _ => Value::Null,
    }
}

/// Encode a plain scalar as a typed filter value.
///
/// Integers go out as `integerValue` strings and other numbers as
/// `doubleValue`. Arrays and maps are not valid equality operands here and
/// encode as `nullValue`, which matches nothing.
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::String(s) => json!({ "stringValue": s }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => json!({ "integerValue": i.to_string() }),
            (None, Some(f)) => json!({ "doubleValue": f }),
            (None, None) => json!({ "nullValue": null }),
        },
        _ => json!({ "nullValue": null }),
    }
}

/// Decode a Firestore `fields` object.
pub fn decode_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .map(|(key, typed)| (key.clone(), decode_value(typed)))
        .collect()
}

/// Decode a Firestore `Document` resource (`{name, fields, createTime, ...}`).
pub fn document_from_json(document: &Value) -> Result<StoredDocument, StoreError> {
    let name = document
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::parse("document has no name"))?;

    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .map(decode_fields)
        .unwrap_or_default();

    Ok(StoredDocument::new(document_id_from_name(name), fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode_value(&json!({ "stringValue": "Ibiza" })), json!("Ibiza"));
        assert_eq!(decode_value(&json!({ "integerValue": "9" })), json!(9));
        assert_eq!(decode_value(&json!({ "doubleValue": 8.5 })), json!(8.5));
        assert_eq!(decode_value(&json!({ "booleanValue": true })), json!(true));
        assert_eq!(decode_value(&json!({ "nullValue": null })), Value::Null);
        assert_eq!(
            decode_value(&json!({ "timestampValue": "2024-03-15T10:00:00Z" })),
            json!("2024-03-15T10:00:00Z")
        );
    }

    #[test]
    fn test_decode_nested() {
        let typed = json!({
            "mapValue": {
                "fields": {
                    "tags": { "arrayValue": { "values": [
                        { "stringValue": "pool" },
                        { "integerValue": "3" }
                    ] } }
                }
            }
        });

        assert_eq!(decode_value(&typed), json!({ "tags": ["pool", 3] }));
    }

    #[test]
    fn test_decode_empty_containers() {
        assert_eq!(decode_value(&json!({ "mapValue": {} })), json!({}));
        assert_eq!(decode_value(&json!({ "arrayValue": {} })), json!([]));
    }

    #[test]
    fn test_unknown_or_malformed_values_decode_as_null() {
        assert_eq!(decode_value(&json!({ "vectorValue": [1] })), Value::Null);
        assert_eq!(decode_value(&json!({ "integerValue": "abc" })), Value::Null);
        assert_eq!(decode_value(&json!("plain")), Value::Null);
    }

    #[test]
    fn test_document_from_json() {
        let document = json!({
            "name": "projects/p/databases/(default)/documents/homes/h-doc",
            "fields": {
                "hid": { "stringValue": "H1" },
                "name": { "stringValue": "Villa Azul" }
            },
            "createTime": "2024-01-01T00:00:00Z"
        });

        let doc = document_from_json(&document).unwrap();

        assert_eq!(doc.id, "h-doc");
        assert_eq!(doc.text("hid").as_deref(), Some("H1"));
        assert_eq!(doc.text("name").as_deref(), Some("Villa Azul"));
    }

    #[test]
    fn test_document_without_name_is_a_parse_error() {
        let result = document_from_json(&json!({ "fields": {} }));
        assert!(matches!(result, Err(StoreError::ParseError(_))));
    }

    #[test]
    fn test_encode_keeps_scalar_type() {
        assert_eq!(encode_value(&json!("H1")), json!({ "stringValue": "H1" }));
        assert_eq!(encode_value(&json!(42)), json!({ "integerValue": "42" }));
        assert_eq!(encode_value(&json!(4.5)), json!({ "doubleValue": 4.5 }));
        assert_eq!(encode_value(&json!(true)), json!({ "booleanValue": true }));
        assert_eq!(encode_value(&json!(["H1"])), json!({ "nullValue": null }));
    }
}
