//! Datum - Document Values for Rows and Keys
//!
//! TigerStyle: Thin wrapper over JSON documents. Backends treat datums as
//! opaque; the only structure they rely on is field lookup and the canonical
//! primary-key string.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A structured document value used for rows and primary keys.
///
/// An absent row is expressed as `Option<Datum>::None`, never as a datum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Datum(Value);

impl Datum {
    /// Wrap a JSON value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Get a field of an object datum.
    ///
    /// Returns None if the datum is not an object, the field is missing, or the
    /// field holds `null`.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<Datum> {
        match self.0.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => Some(Self(value.clone())),
        }
    }

    /// Canonical primary-key string used for map lookup.
    ///
    /// Deterministic, and two datums share a string exactly when they are
    /// equal. The format itself is not part of the contract.
    #[must_use]
    pub fn print_primary(&self) -> String {
        normalize_zero(&self.0).to_string()
    }
}

/// Rewrite `-0.0` as `0.0`, which compare equal but render differently.
fn normalize_zero(value: &Value) -> Value {
    match value {
        Value::Number(number)
            if number.as_f64().map(f64::to_bits) == Some((-0.0_f64).to_bits()) =>
        {
            Value::from(0.0_f64)
        }
        Value::Array(items) => Value::Array(items.iter().map(normalize_zero).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(name, field)| (name.clone(), normalize_zero(field)))
                .collect(),
        ),
        other => other.clone(),
    }
}

impl From<Value> for Datum {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<i64> for Datum {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl From<&str> for Datum {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl fmt::Display for Datum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
