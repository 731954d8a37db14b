//! The `Value` enum and its identity/display semantics.

use crate::object::{ArrayHandle, ListHandle, MapHandle, RecordHandle, TableHandle};
use crate::structured::StructuredValue;
use chrono::{DateTime, SecondsFormat, Utc};
use std::fmt;
use std::sync::Arc;

/// A value in the graph handed to the extraction engine.
///
/// Scalar variants are stored inline; structural variants hold a shared
/// handle, so the same node may be reachable through many paths
/// (including through itself).
#[derive(Clone)]
pub enum Value {
    /// Absent value
    Null,
    /// Boolean scalar
    Bool(bool),
    /// Integer scalar
    Int(i64),
    /// Floating-point scalar
    Float(f64),
    /// Text scalar
    Text(String),
    /// Temporal scalar (UTC instant)
    DateTime(DateTime<Utc>),
    /// Fixed-shape indexed node
    Array(ArrayHandle),
    /// Growable ordered sequence node
    List(ListHandle),
    /// Key-addressed node with unique text keys
    Map(MapHandle),
    /// Immutable named-field aggregate
    Record(RecordHandle),
    /// Ordered rows of uniformly-shaped records, addressed by key column
    Table(TableHandle),
    /// Opaque property-bearing host object
    Structured(Arc<dyn StructuredValue>),
}

/// The structural category of a value, used in placeholders and error
/// messages.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Text,
    DateTime,
    Array,
    List,
    Map,
    Record,
    Table,
    Structured,
}

impl ValueKind {
    /// Lowercase name of the shape
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::DateTime => "date",
            ValueKind::Array => "array",
            ValueKind::List => "list",
            ValueKind::Map => "map",
            ValueKind::Record => "record",
            ValueKind::Table => "table",
            ValueKind::Structured => "structured",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a structural node: the address of its shared allocation.
///
/// Two `Value`s with the same `ValueId` are the same node. Scalars have
/// no identity.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ValueId(pub(crate) usize);

impl ValueId {
    /// Raw address, used when formatting reference placeholders
    pub fn addr(self) -> usize {
        self.0
    }
}

impl Value {
    /// Shape of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::DateTime(_) => ValueKind::DateTime,
            Value::Array(_) => ValueKind::Array,
            Value::List(_) => ValueKind::List,
            Value::Map(_) => ValueKind::Map,
            Value::Record(_) => ValueKind::Record,
            Value::Table(_) => ValueKind::Table,
            Value::Structured(_) => ValueKind::Structured,
        }
    }

    /// Node identity, `None` for scalars.
    ///
    /// Stable across clones of the same handle; distinct nodes with equal
    /// contents have distinct identities.
    pub fn identity(&self) -> Option<ValueId> {
        match self {
            Value::Array(h) => Some(h.id()),
            Value::List(h) => Some(h.id()),
            Value::Map(h) => Some(h.id()),
            Value::Record(h) => Some(h.id()),
            Value::Table(h) => Some(h.id()),
            Value::Structured(o) => Some(ValueId(Arc::as_ptr(o) as *const () as usize)),
            _ => None,
        }
    }

    /// True for shapes that cannot participate in cycles
    pub fn is_scalar(&self) -> bool {
        self.identity().is_none()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Render a scalar as a JSON leaf. `None` for structural nodes and
    /// dates (dates are the date extractor's concern). Non-finite floats
    /// fall back to their textual form, since JSON has no NaN/Infinity.
    pub fn to_json_scalar(&self) -> Option<serde_json::Value> {
        match self {
            Value::Null => Some(serde_json::Value::Null),
            Value::Bool(b) => Some((*b).into()),
            Value::Int(i) => Some((*i).into()),
            Value::Float(x) => Some(
                serde_json::Number::from_f64(*x)
                    .map(serde_json::Value::Number)
                    .unwrap_or_else(|| serde_json::Value::String(x.to_string())),
            ),
            Value::Text(s) => Some(serde_json::Value::String(s.clone())),
            _ => None,
        }
    }

    /// Build a list value from items
    pub fn list<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::List(ListHandle::new(items.into_iter().collect()))
    }

    /// Build an array value from items
    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Value {
        Value::Array(ArrayHandle::new(items.into_iter().collect()))
    }

    /// Build a map value from entries, preserving insertion order
    pub fn map<K: Into<String>, I: IntoIterator<Item = (K, Value)>>(entries: I) -> Value {
        let map = MapHandle::new();
        for (key, value) in entries {
            map.insert(key, value);
        }
        Value::Map(map)
    }

    /// Wrap a host object behind the structured-value seam
    pub fn structured<S: StructuredValue + 'static>(object: S) -> Value {
        Value::Structured(Arc::new(object))
    }
}

/// Shallow textual form.
///
/// Never recurses into children: this form is what the engine substitutes
/// when the depth limit cuts a branch off, and the branch below may still
/// be cyclic. Structural nodes therefore print as `kind@address`.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => {
                f.write_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Structured(o) => {
                let addr = Arc::as_ptr(o) as *const () as usize;
                write!(f, "{}@{addr:x}", o.type_name())
            }
            node => {
                // identity() is Some for every structural variant
                let addr = node.identity().map(ValueId::addr).unwrap_or_default();
                write!(f, "{}@{addr:x}", node.kind())
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "Text({s:?})"),
            other => write!(f, "{other}"),
        }
    }
}

/// Scalars compare by value, structural nodes by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}
