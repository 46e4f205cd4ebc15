use serde::{Deserialize, Serialize};

/// Scalar type a variable slot or declared parameter may carry.
///
/// The textual names (`string`, `integer`, `float`, `boolean`) are the
/// only forms accepted in pattern declarations; anything else is an
/// unsupported type and is rejected when the capability is declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Integer,
    Float,
    Boolean,
}

impl ParamType {
    /// Parse a declared type name. Returns `None` for unrecognized names.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" => Some(Self::String),
            "integer" => Some(Self::Integer),
            "float" => Some(Self::Float),
            "boolean" => Some(Self::Boolean),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }

    /// JSON Schema type keyword for this parameter type.
    pub fn json_type(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Boolean => "boolean",
        }
    }

    /// Convert a raw path segment into a typed value.
    ///
    /// Conversion is strict: a non-numeric segment for an integer slot is
    /// an error, never a silent coercion or truncation.
    pub fn convert_text(&self, text: &str) -> Result<ArgValue, String> {
        match self {
            Self::String => Ok(ArgValue::Str(text.to_string())),
            Self::Integer => text
                .parse::<i64>()
                .map(ArgValue::Int)
                .map_err(|_| format!("expected integer, got {text:?}")),
            Self::Float => text
                .parse::<f64>()
                .map(ArgValue::Float)
                .map_err(|_| format!("expected float, got {text:?}")),
            Self::Boolean => match text {
                "true" => Ok(ArgValue::Bool(true)),
                "false" => Ok(ArgValue::Bool(false)),
                _ => Err(format!("expected boolean, got {text:?}")),
            },
        }
    }

    /// Convert a caller-supplied JSON value into a typed value.
    ///
    /// Same strictness as [`convert_text`](Self::convert_text): JSON
    /// numbers are not accepted for string slots, fractional numbers are
    /// not accepted for integer slots. Integers are accepted for float
    /// slots (the widening is exact for the JSON range we care about).
    pub fn convert_json(&self, value: &serde_json::Value) -> Result<ArgValue, String> {
        match self {
            Self::String => value
                .as_str()
                .map(|s| ArgValue::Str(s.to_string()))
                .ok_or_else(|| format!("expected string, got {}", json_kind(value))),
            Self::Integer => value
                .as_i64()
                .map(ArgValue::Int)
                .ok_or_else(|| format!("expected integer, got {}", json_kind(value))),
            Self::Float => value
                .as_f64()
                .map(ArgValue::Float)
                .ok_or_else(|| format!("expected float, got {}", json_kind(value))),
            Self::Boolean => value
                .as_bool()
                .map(ArgValue::Bool)
                .ok_or_else(|| format!("expected boolean, got {}", json_kind(value))),
        }
    }
}

/// A bound argument value as seen by a handler.
///
/// `Absent` marks an optional parameter the caller did not provide. It is
/// distinct from any zero value so handlers can tell "not provided" from
/// "provided empty".
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Absent,
}

impl ArgValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
