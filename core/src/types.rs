//! Body field model for JSON and form payloads.
//!
//! # Design
//! `FieldValue` is a closed set of JSON-shaped values. Because it is an owned
//! tree there are no cycles, so the only value JSON cannot represent is a
//! non-finite float; `to_json` rejects those instead of letting them degrade
//! to `null` the way `serde_json` would.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Map, Number, Value};

use crate::error::BuildError;

/// Header names to values, or query parameter names to values.
pub type StringMap = BTreeMap<String, String>;

/// Body fields for `RequestBuilder::build_json_or_form`.
pub type Fields = BTreeMap<String, FieldValue>;

/// A single body field value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Integers above `i64::MAX`.
    UInt(u64),
    Float(f64),
    String(String),
    List(Vec<FieldValue>),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// The string payload, if this is a `String` value. Form encoding keeps
    /// only these.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert to a `serde_json::Value`, failing on non-finite floats at any
    /// depth. `path` names the offending field in the error.
    fn to_json_at(&self, path: &str) -> Result<Value, BuildError> {
        Ok(match self {
            FieldValue::Null => Value::Null,
            FieldValue::Bool(b) => Value::Bool(*b),
            FieldValue::Int(i) => Value::Number((*i).into()),
            FieldValue::UInt(u) => Value::Number((*u).into()),
            FieldValue::Float(f) => match Number::from_f64(*f) {
                Some(n) => Value::Number(n),
                None => {
                    return Err(BuildError::Encoding(format!(
                        "field `{path}` is not a finite number ({f})"
                    )))
                }
            },
            FieldValue::String(s) => Value::String(s.clone()),
            FieldValue::List(items) => Value::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| item.to_json_at(&format!("{path}[{i}]")))
                    .collect::<Result<_, _>>()?,
            ),
            FieldValue::Map(map) => Value::Object(fields_to_json_at(map, path)?),
        })
    }

    pub fn to_json(&self) -> Result<Value, BuildError> {
        self.to_json_at("$")
    }
}

fn fields_to_json_at(
    fields: &BTreeMap<String, FieldValue>,
    path: &str,
) -> Result<Map<String, Value>, BuildError> {
    let mut object = Map::new();
    for (key, value) in fields {
        let value = value.to_json_at(&format!("{path}.{key}"))?;
        object.insert(key.clone(), value);
    }
    Ok(object)
}

/// Convert a whole field mapping into a JSON object.
pub fn fields_to_json(fields: &Fields) -> Result<Value, BuildError> {
    fields_to_json_at(fields, "$").map(Value::Object)
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i.into())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<u64> for FieldValue {
    fn from(u: u64) -> Self {
        match i64::try_from(u) {
            Ok(i) => FieldValue::Int(i),
            Err(_) => FieldValue::UInt(u),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FieldValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FieldValue::UInt(u)
                } else {
                    FieldValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FieldValue::String(s),
            Value::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            Value::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
