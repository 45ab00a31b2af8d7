//! Helpers for the nested key/value document the asset graph serializes to.
//!
//! Keys carry their type intent as a suffix: `_i` scalar, `_k` per-step
//! array, `_b` bool, `_s` string, `_d` nested dict of assets, `_dd` doubly
//! nested dict. Non-finite numbers are stored as JSON null and read back as
//! NaN, so a round trip through the document is identity up to NaN equality.

use serde_json::{Map, Number, Value};
use thiserror::Error;

/// One level of the nested serialization document.
pub type Document = Map<String, Value>;

/// Failure while reconstructing assets from a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("missing key `{0}`")]
    MissingKey(String),
    #[error("key `{key}` is not a {expected}")]
    WrongType { key: String, expected: &'static str },
    #[error("invalid horizon: {steps} steps of {delta_t} h")]
    InvalidHorizon { steps: usize, delta_t: f64 },
}

/// A scalar value, with non-finite numbers mapped to null.
pub fn number(value: f64) -> Value {
    match Number::from_f64(value) {
        Some(n) => Value::Number(n),
        None => Value::Null,
    }
}

/// A per-step array of floats, with non-finite entries mapped to null.
pub fn float_array(values: &[f64]) -> Value {
    Value::Array(values.iter().map(|&v| number(v)).collect())
}

/// A per-step array of 0/1 flags.
pub fn bool_array(values: &[bool]) -> Value {
    Value::Array(values.iter().map(|&v| Value::from(v as i64)).collect())
}

fn get<'a>(doc: &'a Document, key: &str) -> Result<&'a Value, DocumentError> {
    doc.get(key)
        .ok_or_else(|| DocumentError::MissingKey(key.to_string()))
}

fn wrong_type(key: &str, expected: &'static str) -> DocumentError {
    DocumentError::WrongType {
        key: key.to_string(),
        expected,
    }
}

fn value_to_f64(value: &Value) -> Option<f64> {
    match value {
        // null is the document encoding of NaN
        Value::Null => Some(f64::NAN),
        other => other.as_f64(),
    }
}

/// Reads a scalar; null yields NaN.
pub fn get_f64(doc: &Document, key: &str) -> Result<f64, DocumentError> {
    value_to_f64(get(doc, key)?).ok_or_else(|| wrong_type(key, "number"))
}

pub fn get_usize(doc: &Document, key: &str) -> Result<usize, DocumentError> {
    get(doc, key)?
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| wrong_type(key, "non-negative integer"))
}

pub fn get_bool(doc: &Document, key: &str) -> Result<bool, DocumentError> {
    get(doc, key)?
        .as_bool()
        .ok_or_else(|| wrong_type(key, "bool"))
}

pub fn get_str(doc: &Document, key: &str) -> Result<String, DocumentError> {
    get(doc, key)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| wrong_type(key, "string"))
}

/// Reads a per-step float array; null entries yield NaN.
pub fn get_float_array(doc: &Document, key: &str) -> Result<Vec<f64>, DocumentError> {
    get(doc, key)?
        .as_array()
        .ok_or_else(|| wrong_type(key, "array"))?
        .iter()
        .map(|v| value_to_f64(v).ok_or_else(|| wrong_type(key, "array of numbers")))
        .collect()
}

/// Reads a per-step 0/1 array into booleans. Accepts JSON bools as well.
pub fn get_bool_array(doc: &Document, key: &str) -> Result<Vec<bool>, DocumentError> {
    get(doc, key)?
        .as_array()
        .ok_or_else(|| wrong_type(key, "array"))?
        .iter()
        .map(|v| match v {
            Value::Bool(b) => Ok(*b),
            other => other
                .as_f64()
                .map(|x| x != 0.0)
                .ok_or_else(|| wrong_type(key, "array of 0/1 flags")),
        })
        .collect()
}

/// Reads a nested `_d`/`_dd` group.
pub fn get_map<'a>(doc: &'a Document, key: &str) -> Result<&'a Document, DocumentError> {
    get(doc, key)?
        .as_object()
        .ok_or_else(|| wrong_type(key, "object"))
}

/// Reads the entries of a nested group as documents, in key order.
pub fn get_entries<'a>(doc: &'a Document, key: &str) -> Result<Vec<&'a Document>, DocumentError> {
    get_map(doc, key)?
        .values()
        .map(|v| v.as_object().ok_or_else(|| wrong_type(key, "object entries")))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_non_finite_round_trips_as_null() {
        assert_eq!(number(f64::NAN), Value::Null);
        assert_eq!(number(f64::INFINITY), Value::Null);

        let mut doc = Document::new();
        doc.insert("x_k".into(), float_array(&[1.0, f64::NAN, 3.0]));
        let back = get_float_array(&doc, "x_k").unwrap();
        assert_eq!(back[0], 1.0);
        assert!(back[1].is_nan());
        assert_eq!(back[2], 3.0);
    }

    #[test]
    fn test_bool_arrays_are_integers() {
        let mut doc = Document::new();
        doc.insert("available_k".into(), bool_array(&[true, false, true]));
        assert_eq!(doc["available_k"], json!([1, 0, 1]));
        assert_eq!(
            get_bool_array(&doc, "available_k").unwrap(),
            vec![true, false, true]
        );
    }

    #[test]
    fn test_missing_and_mistyped_keys() {
        let mut doc = Document::new();
        doc.insert("power_max_i".into(), json!("not a number"));

        assert!(matches!(
            get_f64(&doc, "absent_i"),
            Err(DocumentError::MissingKey(_))
        ));
        assert!(matches!(
            get_f64(&doc, "power_max_i"),
            Err(DocumentError::WrongType { .. })
        ));
    }
}
