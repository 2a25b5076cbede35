use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::shape::{self, Record, Shape};

/// A runtime value flowing through accessor-chain evaluation.
///
/// Scalars carry the data a predicate can compare against; `List` and `Map`
/// are the containers a chain fans out through; `Record` wraps a live domain
/// object whose own accessors can be invoked for the next path segment.
///
/// # Examples
///
/// ```
/// use tql_lang::Value;
/// use std::collections::BTreeMap;
///
/// let null = Value::Null;
/// let integer = Value::Integer(42);
/// let string = Value::String("hello".to_string());
/// let list = Value::List(vec![Value::Integer(1), Value::Integer(2)]);
///
/// let mut entries = BTreeMap::new();
/// entries.insert("key".to_string(), Value::String("value".to_string()));
/// let map = Value::Map(entries);
/// ```
#[derive(Clone)]
pub enum Value {
    /// Absent or null field value
    Null,

    /// Boolean
    Boolean(bool),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// Floating-point number
    Float(f64),

    /// UTF-8 string
    String(String),

    /// Multi-valued container; chain evaluation fans out over its elements
    List(Vec<Value>),

    /// Keyed container; traversed with map-keyed accessors
    Map(BTreeMap<String, Value>),

    /// A live domain object with its own shape and accessors
    Record(Rc<dyn Record>),

    /// Runtime type handle produced by the `_class` accessor
    Type(&'static Shape),
}

impl Value {
    /// Wrap a domain object for traversal by further accessor steps.
    pub fn record<R: Record>(record: R) -> Value {
        Value::Record(Rc::new(record))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The comparable string form of a scalar, `None` for nulls and
    /// containers (which never satisfy a textual predicate).
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Boolean(b) => Some(b.to_string()),
            Value::Integer(n) => Some(n.to_string()),
            Value::Float(n) => Some(n.to_string()),
            Value::String(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// The numeric form used by ordering operators, when the value has one.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Integer(n) => Some(Decimal::from(*n)),
            Value::Float(n) => Decimal::from_f64(*n),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The runtime shape of this value, as reported by the `_class` path.
    pub fn runtime_shape(&self) -> &'static Shape {
        match self {
            Value::Null => &shape::NULL,
            Value::Boolean(_) => &shape::BOOLEAN,
            Value::Integer(_) => &shape::INTEGER,
            Value::Float(_) => &shape::FLOAT,
            Value::String(_) => &shape::STRING,
            Value::List(_) => &shape::LIST,
            Value::Map(_) => &shape::MAP,
            Value::Record(r) => r.shape(),
            Value::Type(_) => &shape::TYPE,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            // Records compare by identity: two distinct objects are two
            // distinct candidates even when their fields agree.
            (Value::Record(a), Value::Record(b)) => Rc::ptr_eq(a, b),
            (Value::Type(a), Value::Type(b)) => std::ptr::eq(*a, *b),
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => write!(f, "Boolean({})", b),
            Value::Integer(n) => write!(f, "Integer({})", n),
            Value::Float(n) => write!(f, "Float({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(entries) => f.debug_tuple("Map").field(entries).finish(),
            Value::Record(r) => write!(f, "Record({})", r.shape().name),
            Value::Type(s) => write!(f, "Type({})", s.name),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
