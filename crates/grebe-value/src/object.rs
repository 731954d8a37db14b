//! Structural nodes and their shared handles.
//!
//! Mutable nodes (arrays, lists, maps) live behind `Arc<RwLock<..>>`;
//! records and tables are immutable after construction and only need
//! `Arc`. Handle accessors that hand out children always clone the child
//! `Value` out under a short read lock — callers never hold a node lock
//! while recursing, which matters because a cyclic graph would otherwise
//! deadlock on itself.

use crate::error::ValueError;
use crate::value::{Value, ValueId};
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Handle to a fixed-shape indexed node. Slots can be overwritten but the
/// length is set at construction.
#[derive(Clone)]
pub struct ArrayHandle(Arc<RwLock<Vec<Value>>>);

impl ArrayHandle {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn id(&self) -> ValueId {
        ValueId(Arc::as_ptr(&self.0) as usize)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Overwrite a slot, returning the previous value. `None` when the
    /// index is out of range.
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut items = self.0.write();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }
}

/// Handle to a growable ordered sequence node.
#[derive(Clone)]
pub struct ListHandle(Arc<RwLock<Vec<Value>>>);

impl ListHandle {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn id(&self) -> ValueId {
        ValueId(Arc::as_ptr(&self.0) as usize)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    /// Overwrite a slot, returning the previous value. `None` when the
    /// index is out of range.
    pub fn set(&self, index: usize, value: Value) -> Option<Value> {
        let mut items = self.0.write();
        let slot = items.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    pub fn snapshot(&self) -> Vec<Value> {
        self.0.read().clone()
    }
}

/// Handle to a key-addressed node. Keys are unique text; insertion order
/// is preserved for iteration but carries no semantics.
#[derive(Clone, Default)]
pub struct MapHandle(Arc<RwLock<IndexMap<String, Value>>>);

impl MapHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(&self) -> ValueId {
        ValueId(Arc::as_ptr(&self.0) as usize)
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.0.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.read().contains_key(key)
    }

    /// Insert or replace, returning the previous value for the key
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.write().insert(key.into(), value)
    }

    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.0
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug)]
struct RecordNode {
    type_name: String,
    fields: IndexMap<String, Value>,
}

/// Handle to an immutable named-field aggregate.
///
/// Records themselves never change after construction, but their fields
/// may reference mutable nodes, so a record can still sit on a cycle.
#[derive(Clone, Debug)]
pub struct RecordHandle(Arc<RecordNode>);

impl RecordHandle {
    pub fn new<K: Into<String>>(
        type_name: impl Into<String>,
        fields: impl IntoIterator<Item = (K, Value)>,
    ) -> Self {
        Self(Arc::new(RecordNode {
            type_name: type_name.into(),
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }))
    }

    pub fn id(&self) -> ValueId {
        ValueId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn type_name(&self) -> &str {
        &self.0.type_name
    }

    pub fn len(&self) -> usize {
        self.0.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.fields.is_empty()
    }

    pub fn field_names(&self) -> Vec<String> {
        self.0.fields.keys().cloned().collect()
    }

    pub fn field(&self, name: &str) -> Option<Value> {
        self.0.fields.get(name).cloned()
    }

    pub fn snapshot(&self) -> Vec<(String, Value)> {
        self.0
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug)]
struct TableNode {
    key_column: String,
    rows: Vec<RecordHandle>,
}

/// Handle to an ordered collection of uniformly-shaped records, addressed
/// by the text value of one key column.
#[derive(Clone, Debug)]
pub struct TableHandle(Arc<TableNode>);

impl TableHandle {
    /// Build a table, validating that every row carries the same field
    /// set and a unique text value in the key column.
    pub fn new(
        key_column: impl Into<String>,
        rows: Vec<RecordHandle>,
    ) -> Result<Self, ValueError> {
        let key_column = key_column.into();
        if let Some(first) = rows.first() {
            let shape = first.field_names();
            for row in &rows {
                if row.field_names() != shape {
                    return Err(ValueError::TableNotUniform(format!(
                        "expected fields {:?}, found {:?}",
                        shape,
                        row.field_names()
                    )));
                }
            }
        }
        let mut seen = std::collections::HashSet::new();
        for row in &rows {
            match row.field(&key_column) {
                Some(Value::Text(key)) => {
                    if !seen.insert(key.clone()) {
                        return Err(ValueError::BadKeyColumn {
                            column: key_column,
                            reason: format!("duplicate key `{key}`"),
                        });
                    }
                }
                Some(other) => {
                    return Err(ValueError::BadKeyColumn {
                        column: key_column,
                        reason: format!("row key must be text, found {}", other.kind()),
                    });
                }
                None => {
                    return Err(ValueError::BadKeyColumn {
                        column: key_column,
                        reason: "missing in row".to_string(),
                    });
                }
            }
        }
        Ok(Self(Arc::new(TableNode { key_column, rows })))
    }

    pub fn id(&self) -> ValueId {
        ValueId(Arc::as_ptr(&self.0) as *const () as usize)
    }

    pub fn key_column(&self) -> &str {
        &self.0.key_column
    }

    pub fn len(&self) -> usize {
        self.0.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.rows.is_empty()
    }

    pub fn rows(&self) -> &[RecordHandle] {
        &self.0.rows
    }

    /// Rows paired with their key values, in row order
    pub fn entries(&self) -> Vec<(String, RecordHandle)> {
        self.0
            .rows
            .iter()
            .filter_map(|row| match row.field(&self.0.key_column) {
                Some(Value::Text(key)) => Some((key, row.clone())),
                _ => None, // unreachable: validated at construction
            })
            .collect()
    }

    pub fn row_by_key(&self, key: &str) -> Option<RecordHandle> {
        self.0
            .rows
            .iter()
            .find(|row| matches!(row.field(&self.0.key_column), Some(Value::Text(k)) if k == key))
            .cloned()
    }
}
