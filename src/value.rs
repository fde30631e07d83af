//! The values that templates operate on.
//!
//! Every [`Value`] is one of a closed set of kinds. Data from the host is
//! converted into a `Value` when it is inserted into a
//! [`Store`][`crate::Store`], and filters receive and return `Value`
//! instances directly.
mod ser;

pub use ser::to_value;

use crate::{filter::Filter, log::Error};
use std::{
    collections::HashMap,
    fmt::{Debug, Display, Formatter, Result},
    sync::Arc,
};

/// A dynamically typed value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Absence of a value, also produced by unbound identifiers and
    /// missing members.
    #[default]
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// A number that is not a number.
    NaN,
    String(String),
    Array(Vec<Value>),
    Object(HashMap<String, Value>),
    /// A callable registered by the host, usually a filter.
    Function(Function),
}

impl Value {
    /// Return the name of the kind of this [`Value`].
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::NaN => "NaN",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Function(_) => "function",
        }
    }

    /// Return true if this [`Value`] is [`Value::NaN`], or a float that is
    /// not a number.
    pub fn is_nan(&self) -> bool {
        match self {
            Value::NaN => true,
            Value::Float(float) => float.is_nan(),
            _ => false,
        }
    }

    /// Return the inner string slice, if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(string) => Some(string),
            _ => None,
        }
    }

    /// Return this [`Value`] with a float that is not a number replaced by
    /// [`Value::NaN`].
    pub fn normalize(self) -> Self {
        match self {
            Value::Float(float) if float.is_nan() => Value::NaN,
            value => value,
        }
    }
}

/// Writes the text that a [`Value`] renders as.
///
/// Null, NaN, arrays, objects and functions render as nothing. `true`
/// renders as `1` and `false` as nothing. Floats always contain a decimal
/// point.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Value::Boolean(true) => write!(f, "1"),
            Value::Integer(integer) => write!(f, "{integer}"),
            Value::Float(float) if float.is_nan() => Ok(()),
            Value::Float(float) if float.is_infinite() => {
                write!(f, "{}", if *float > 0.0 { "inf" } else { "-inf" })
            }
            Value::Float(float) => {
                let text = float.to_string();
                if text.contains('.') {
                    write!(f, "{text}")
                } else {
                    write!(f, "{text}.0")
                }
            }
            Value::String(string) => write!(f, "{string}"),
            Value::Null
            | Value::Boolean(false)
            | Value::NaN
            | Value::Array(_)
            | Value::Object(_)
            | Value::Function(_) => Ok(()),
        }
    }
}

/// A callable [`Value`].
#[derive(Clone)]
pub struct Function(Arc<dyn Filter>);

impl Function {
    /// Create a new [`Function`] from the given [`Filter`].
    pub fn new<T>(filter: T) -> Self
    where
        T: Filter + 'static,
    {
        Self(Arc::new(filter))
    }

    /// Invoke the [`Function`].
    ///
    /// # Errors
    ///
    /// Propagates any error returned by the underlying [`Filter`].
    #[inline]
    pub fn apply(&self, input: &Value, args: &[Value]) -> std::result::Result<Value, Error> {
        self.0.apply(input, args)
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(f, "Function")
    }
}

/// Two functions are equal when they share the same [`Filter`].
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

/// Describes where a [`Value`] came from.
///
/// An escape function may use this to decide which values need escaping.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Origin {
    /// Written directly in the template, as a literal or as content.
    Source,
    /// Computed, or provided by the host.
    Host,
}

/// A [`Value`] and the [`Origin`] it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged {
    pub value: Value,
    pub origin: Origin,
}

impl Tagged {
    /// Create a new [`Tagged`] value from the template source.
    #[inline]
    pub fn source(value: Value) -> Self {
        Self {
            value,
            origin: Origin::Source,
        }
    }

    /// Create a new [`Tagged`] value from the host.
    #[inline]
    pub fn host(value: Value) -> Self {
        Self {
            value,
            origin: Origin::Host,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

/// Integral floats become [`Value::Integer`], and a float that is not a
/// number becomes [`Value::NaN`].
impl From<f64> for Value {
    fn from(value: f64) -> Self {
        if value.is_nan() {
            Value::NaN
        } else if value.is_finite()
            && value.fract() == 0.0
            && value >= i64::MIN as f64
            && value < i64::MAX as f64
        {
            Value::Integer(value as i64)
        } else {
            Value::Float(value)
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl<T> From<Vec<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T> From<HashMap<String, T>> for Value
where
    T: Into<Value>,
{
    fn from(value: HashMap<String, T>) -> Self {
        Value::Object(value.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

impl From<Function> for Value {
    fn from(value: Function) -> Self {
        Value::Function(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(bool) => Value::Boolean(bool),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(integer) => Value::Integer(integer),
                None => number.as_f64().map_or(Value::NaN, Value::from),
            },
            serde_json::Value::String(string) => Value::String(string),
            serde_json::Value::Array(array) => {
                Value::Array(array.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(object) => {
                Value::Object(object.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
