//! Custom-data payload carried by tiles and sprites (JSON-like but typed)
//!
//! `Value` compares and hashes structurally: object keys are kept sorted and
//! floats compare by bit pattern (with `-0.0 == 0.0` and all NaNs equal), so
//! two payloads built independently with the same content are the same key.
//!
//! Only finite floats can be serialized. NaN and the infinities have no JSON
//! form, so serializing a payload that holds one is an error rather than a
//! silent `null`.

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Error raised when a custom-data payload does not have the expected shape
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CustomDataError {
    #[error("{type_name}: expected {expected}, found {found}")]
    UnexpectedShape {
        type_name: String,
        expected: String,
        found: String,
    },
    #[error("{type_name}: missing field '{field}'")]
    MissingField { type_name: String, field: String },
    #[error("{type_name}: invalid field '{field}': {reason}")]
    InvalidField {
        type_name: String,
        field: String,
        reason: String,
    },
}

/// Generic property value (JSON-like but typed)
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(Vec<Value>),
    Object(BTreeMap<String, Value>),
}

/// Canonical bit pattern used for float equality and hashing
fn float_key(f: f64) -> u64 {
    if f == 0.0 {
        0.0f64.to_bits()
    } else if f.is_nan() {
        f64::NAN.to_bits()
    } else {
        f.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => float_key(*a) == float_key(*b),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Int(i) => i.hash(state),
            Value::Float(f) => float_key(*f).hash(state),
            Value::String(s) => s.hash(state),
            Value::Array(a) => a.hash(state),
            Value::Object(o) => o.hash(state),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) if !f.is_finite() => Err(S::Error::custom(format!(
                "cannot serialize non-finite float {f}"
            ))),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl Value {
    /// Get value as string reference
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get value as integer
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Get value as object reference
    pub fn as_object(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Check if value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Look up a field of an object value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    /// Require an object payload, naming the owning type on failure
    pub fn require_object(
        &self,
        type_name: &str,
    ) -> Result<&BTreeMap<String, Value>, CustomDataError> {
        self.as_object()
            .ok_or_else(|| CustomDataError::UnexpectedShape {
                type_name: type_name.to_string(),
                expected: "object".to_string(),
                found: self.kind().to_string(),
            })
    }

    /// Require a field of an object payload
    pub fn require_field(&self, type_name: &str, field: &str) -> Result<&Value, CustomDataError> {
        self.require_object(type_name)?
            .get(field)
            .ok_or_else(|| CustomDataError::MissingField {
                type_name: type_name.to_string(),
                field: field.to_string(),
            })
    }

    /// Require an integer field of an object payload
    pub fn require_int(&self, type_name: &str, field: &str) -> Result<i64, CustomDataError> {
        let value = self.require_field(type_name, field)?;
        value.as_int().ok_or_else(|| CustomDataError::InvalidField {
            type_name: type_name.to_string(),
            field: field.to_string(),
            reason: format!("expected int, found {}", value.kind()),
        })
    }

    /// Require a string field of an object payload
    pub fn require_str(&self, type_name: &str, field: &str) -> Result<&str, CustomDataError> {
        let value = self.require_field(type_name, field)?;
        value.as_string().ok_or_else(|| CustomDataError::InvalidField {
            type_name: type_name.to_string(),
            field: field.to_string(),
            reason: format!("expected string, found {}", value.kind()),
        })
    }
}

// Convenience conversions
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl<V: Into<Value>> FromIterator<(String, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Value::Object(iter.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &Value) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_value_roundtrip() {
        let value: Value = [
            ("name".to_string(), Value::String("Test".to_string())),
            ("count".to_string(), Value::Int(42)),
            ("enabled".to_string(), Value::Bool(true)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&value).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, parsed);
    }

    #[test]
    fn test_structural_equality_ignores_insertion_order() {
        let a: Value = [("x".to_string(), 1), ("y".to_string(), 2)]
            .into_iter()
            .collect();
        let b: Value = [("y".to_string(), 2), ("x".to_string(), 1)]
            .into_iter()
            .collect();

        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }

    #[test]
    fn test_float_equality_is_reflexive() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(hash_of(&nan), hash_of(&Value::Float(f64::NAN)));
        assert_eq!(Value::Float(0.0), Value::Float(-0.0));
        assert_eq!(hash_of(&Value::Float(0.0)), hash_of(&Value::Float(-0.0)));
    }

    #[test]
    fn test_int_and_float_are_distinct() {
        assert_ne!(Value::Int(1), Value::Float(1.0));
        let parsed: Value = serde_json::from_str("[1, 1.5]").unwrap();
        assert_eq!(parsed, Value::Array(vec![Value::Int(1), Value::Float(1.5)]));
    }

    #[test]
    fn test_non_finite_floats_do_not_serialize() {
        for f in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = serde_json::to_string(&Value::Float(f)).unwrap_err();
            assert!(err.to_string().contains("non-finite"), "{err}");
        }

        let nested: Value = [(
            "speeds".to_string(),
            Value::Array(vec![Value::Float(1.5), Value::Float(f64::NAN)]),
        )]
        .into_iter()
        .collect();
        assert!(serde_json::to_string(&nested).is_err());
        assert!(serde_json::to_value(&nested).is_err());

        let finite = Value::Array(vec![Value::Float(-0.25), Value::Null]);
        assert_eq!(serde_json::to_string(&finite).unwrap(), "[-0.25,null]");
    }

    #[test]
    fn test_require_helpers() {
        let value: Value = [("coins".to_string(), 3)].into_iter().collect();
        assert_eq!(value.require_int("Chest", "coins"), Ok(3));
        assert_eq!(
            value.require_int("Chest", "keys"),
            Err(CustomDataError::MissingField {
                type_name: "Chest".to_string(),
                field: "keys".to_string(),
            })
        );
        assert!(matches!(
            Value::Int(3).require_object("Chest"),
            Err(CustomDataError::UnexpectedShape { .. })
        ));
        assert!(matches!(
            value.require_str("Chest", "coins"),
            Err(CustomDataError::InvalidField { .. })
        ));
    }
}
