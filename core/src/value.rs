//! Dynamically typed values produced by conversion.
//!
//! Every option, flag and argument binds to a [`Value`]. Parsers produce
//! values, validators inspect them, and command handlers read them back
//! through the invocation.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A converted value bound to an option, flag or argument slot.
///
/// # Examples
///
/// ```
/// use cmdtree_core::Value;
///
/// let v = Value::Int(42);
/// assert_eq!(v.as_int(), Some(42));
/// assert_eq!(v.to_string(), "42");
///
/// let list = Value::List(vec![Value::from("a"), Value::from("b")]);
/// assert_eq!(list.to_string(), "a, b");
/// ```
#[derive(Clone, Default)]
pub enum Value {
    /// No value (an optional slot left unset).
    #[default]
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Ordered sequence (repeatable options and variadic arguments).
    List(Vec<Value>),
    /// Any other type produced by a user-supplied parser.
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    /// Wraps an arbitrary value.
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Value::Custom(Arc::new(value))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Downcasts a [`Value::Custom`] payload.
    ///
    /// ```
    /// use cmdtree_core::Value;
    ///
    /// #[derive(Debug, PartialEq)]
    /// struct Port(u16);
    ///
    /// let v = Value::custom(Port(8080));
    /// assert_eq!(v.downcast_ref::<Port>(), Some(&Port(8080)));
    /// assert!(v.downcast_ref::<String>().is_none());
    /// ```
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(inner) => inner.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Int(i) => f.debug_tuple("Int").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            Value::Custom(_) => f.write_str("<custom>"),
        }
    }
}

/// Structural equality; custom payloads compare by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Custom(a), Value::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u16> for Value {
    fn from(i: u16) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<std::path::PathBuf> for Value {
    fn from(p: std::path::PathBuf) -> Self {
        Value::custom(p)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}
