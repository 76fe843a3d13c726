//! Dynamically typed option payloads

use serde_json::Value;

use crate::error::OptionError;

/// A strongly-typed option value.
///
/// `Json` carries the payload of a custom option; an explicit JSON null
/// is a legitimate persisted state there, not "absent".
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Json(Value),
}

impl OptionValue {
    /// Get as bool, returning error if wrong type
    pub fn as_bool(&self) -> Result<bool, OptionError> {
        match self {
            OptionValue::Bool(v) => Ok(*v),
            other => Err(type_mismatch("bool", other)),
        }
    }

    /// Get as int, returning error if wrong type
    pub fn as_int(&self) -> Result<i64, OptionError> {
        match self {
            OptionValue::Int(v) => Ok(*v),
            other => Err(type_mismatch("int", other)),
        }
    }

    /// Get as float, returning error if wrong type
    pub fn as_float(&self) -> Result<f64, OptionError> {
        match self {
            OptionValue::Float(v) => Ok(*v),
            other => Err(type_mismatch("float", other)),
        }
    }

    /// Get as string, returning error if wrong type
    pub fn as_string(&self) -> Result<String, OptionError> {
        match self {
            OptionValue::String(v) => Ok(v.clone()),
            other => Err(type_mismatch("string", other)),
        }
    }

    /// Get the raw JSON payload of a custom option
    pub fn as_json(&self) -> Result<Value, OptionError> {
        match self {
            OptionValue::Json(v) => Ok(v.clone()),
            other => Err(type_mismatch("json", other)),
        }
    }

    /// Name of the carried type, for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Bool(_) => "bool",
            OptionValue::Int(_) => "int",
            OptionValue::Float(_) => "float",
            OptionValue::String(_) => "string",
            OptionValue::Json(_) => "json",
        }
    }

    /// Convert to the JSON representation used in config files
    pub fn to_json(&self) -> Value {
        match self {
            OptionValue::Bool(v) => Value::Bool(*v),
            OptionValue::Int(v) => Value::from(*v),
            OptionValue::Float(v) => Value::from(*v),
            OptionValue::String(v) => Value::String(v.clone()),
            OptionValue::Json(v) => v.clone(),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(v: bool) -> Self {
        OptionValue::Bool(v)
    }
}

impl From<i64> for OptionValue {
    fn from(v: i64) -> Self {
        OptionValue::Int(v)
    }
}

impl From<f64> for OptionValue {
    fn from(v: f64) -> Self {
        OptionValue::Float(v)
    }
}

impl From<&str> for OptionValue {
    fn from(v: &str) -> Self {
        OptionValue::String(v.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(v: String) -> Self {
        OptionValue::String(v)
    }
}

fn type_mismatch(expected: &'static str, found: &OptionValue) -> OptionError {
    OptionError::TypeMismatch {
        expected,
        found: found.type_name(),
    }
}
