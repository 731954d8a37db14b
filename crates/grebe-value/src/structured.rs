//! The structured-value seam.
//!
//! Arbitrary host objects enter the value graph through this trait; the
//! engine only ever sees named properties. How a host resolves a property
//! (a field, a computed getter, a remote call) is its own business —
//! accessors are allowed to block and allowed to fail.

use crate::error::ValueError;
use crate::value::Value;
use indexmap::IndexMap;
use parking_lot::RwLock;

/// A property-bearing host object.
///
/// Implementations must be `Send + Sync`: one converter serves concurrent
/// extraction calls and structured values are shared across them.
pub trait StructuredValue: Send + Sync {
    /// Host-level type name, used in placeholders and simplifier matching
    fn type_name(&self) -> &str;

    /// Names of the accessible properties, in presentation order
    fn property_names(&self) -> Vec<String>;

    /// Resolve one property
    fn property(&self, name: &str) -> Result<Value, ValueError>;

    /// Replace one property, returning the previous value. The default
    /// declares the object read-only.
    fn set_property(&self, name: &str, value: Value) -> Result<Value, ValueError> {
        let _ = (name, value);
        Err(ValueError::ReadOnly(self.type_name().to_string()))
    }
}

/// A writable bag of named properties, the stock [`StructuredValue`]
/// implementation. Property order is insertion order. Supports cyclic
/// self-references: wrap the bag's `Arc` in a `Value` and put that value
/// back into the bag.
pub struct PropertyBag {
    type_name: String,
    props: RwLock<IndexMap<String, Value>>,
}

impl PropertyBag {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            props: RwLock::new(IndexMap::new()),
        }
    }

    /// Add or replace a property, returning the previous value
    pub fn put(&self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.props.write().insert(name.into(), value)
    }
}

impl StructuredValue for PropertyBag {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn property_names(&self) -> Vec<String> {
        self.props.read().keys().cloned().collect()
    }

    fn property(&self, name: &str) -> Result<Value, ValueError> {
        self.props
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| ValueError::NoSuchProperty(name.to_string()))
    }

    /// Writes address existing properties only; an unknown name is a
    /// fault, not an insert.
    fn set_property(&self, name: &str, value: Value) -> Result<Value, ValueError> {
        let mut props = self.props.write();
        match props.get_mut(name) {
            Some(slot) => Ok(std::mem::replace(slot, value)),
            None => Err(ValueError::NoSuchProperty(name.to_string())),
        }
    }
}
