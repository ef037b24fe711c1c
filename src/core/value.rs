//! Purpose: Tagged unions for query values and stored field shapes.
//! Exports: `ScalarValue`, `ScalarRef`, `FieldValue`.
//! Role: Lets the match predicate dispatch on an explicit tag instead of JSON duck typing.
//! Invariants: Only strings, `i64` integers and booleans are scalars.
//! Invariants: Equality never coerces across tags (`5` never equals `"5"` or `true`).
use std::fmt;

use serde_json::Value;

use super::error::{Error, ErrorKind};

/// A query value: the only types `filter`/`get` accept.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum ScalarValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// Borrowed view of a scalar, used when classifying stored record values.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScalarRef<'a> {
    Str(&'a str),
    Int(i64),
    Bool(bool),
}

/// Shape of a value stored under a record field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue<'a> {
    Scalar(ScalarRef<'a>),
    List(&'a [Value]),
    Other,
}

impl ScalarValue {
    pub fn as_scalar_ref(&self) -> ScalarRef<'_> {
        match self {
            ScalarValue::Str(text) => ScalarRef::Str(text),
            ScalarValue::Int(num) => ScalarRef::Int(*num),
            ScalarValue::Bool(flag) => ScalarRef::Bool(*flag),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ScalarValue::Str(text) => Value::String(text.clone()),
            ScalarValue::Int(num) => Value::from(*num),
            ScalarValue::Bool(flag) => Value::Bool(*flag),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Str(text) => write!(f, "{text:?}"),
            ScalarValue::Int(num) => write!(f, "{num}"),
            ScalarValue::Bool(flag) => write!(f, "{flag}"),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Str(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Str(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Bool(value)
    }
}

impl TryFrom<&Value> for ScalarValue {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match ScalarRef::from_json(value) {
            Some(scalar) => Ok(scalar.to_owned_value()),
            None => Err(Error::new(ErrorKind::InvalidValue)
                .with_message(format!(
                    "query value must be a string, integer or boolean (got {})",
                    json_type_name(value)
                ))
                .with_hint("Pass a scalar value such as \"abc\", 42 or true.")),
        }
    }
}

impl<'a> ScalarRef<'a> {
    pub fn from_json(value: &'a Value) -> Option<Self> {
        match value {
            Value::String(text) => Some(ScalarRef::Str(text)),
            Value::Bool(flag) => Some(ScalarRef::Bool(*flag)),
            Value::Number(num) => num.as_i64().map(ScalarRef::Int),
            _ => None,
        }
    }

    pub fn to_owned_value(self) -> ScalarValue {
        match self {
            ScalarRef::Str(text) => ScalarValue::Str(text.to_string()),
            ScalarRef::Int(num) => ScalarValue::Int(num),
            ScalarRef::Bool(flag) => ScalarValue::Bool(flag),
        }
    }
}

impl<'a> FieldValue<'a> {
    pub fn classify(value: &'a Value) -> Self {
        if let Value::Array(items) = value {
            return FieldValue::List(items);
        }
        match ScalarRef::from_json(value) {
            Some(scalar) => FieldValue::Scalar(scalar),
            None => FieldValue::Other,
        }
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(num) if num.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
