use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A single field value.
///
/// Serializes untagged, so the backing file holds plain JSON strings,
/// numbers, and arrays. Floats always serialize with a decimal point and
/// therefore reload as floats.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    List(Vec<Value>),
}

impl Value {
    /// Decode a persisted JSON value.
    ///
    /// Null, booleans, objects, and integers outside the `i64` range have
    /// no representation here and are rejected.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, TypeError> {
        match json {
            serde_json::Value::String(s) => Ok(Self::Str(s.clone())),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Int(i))
                } else if n.is_f64() {
                    n.as_f64().map(Self::Float).ok_or_else(|| {
                        TypeError::MalformedRecord(format!("unrepresentable number {n}"))
                    })
                } else {
                    Err(TypeError::MalformedRecord(format!(
                        "integer {n} out of range"
                    )))
                }
            }
            serde_json::Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::List),
            other => Err(TypeError::MalformedRecord(format!(
                "unsupported field value {other}"
            ))),
        }
    }

    /// Short name of the variant, for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "str",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::List(_) => "list",
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Literal form used inside a record's canonical string.
///
/// Strings are single-quoted with `\` and `'` escaped, floats always carry a
/// decimal point, lists render as `[a, b]`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => {
                f.write_str("'")?;
                for ch in s.chars() {
                    match ch {
                        '\\' => f.write_str("\\\\")?,
                        '\'' => f.write_str("\\'")?,
                        _ => write!(f, "{ch}")?,
                    }
                }
                f.write_str("'")
            }
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => {
                let text = x.to_string();
                if x.is_finite() && !text.contains('.') {
                    write!(f, "{text}.0")
                } else {
                    f.write_str(&text)
                }
            }
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
