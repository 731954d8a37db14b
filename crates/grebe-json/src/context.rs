//! Per-call serialization context.
//!
//! One context is created at the start of each conversion call, threaded
//! `&mut` through every recursive extraction step, and dropped when the
//! call returns. Nothing here is shared between calls — isolation between
//! concurrent conversions on one converter falls out of the ownership
//! model rather than any synchronization.

use crate::error::ConvertError;
use crate::fault::ValueFaultHandler;
use grebe_value::{Value, ValueId};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Tracks the active ancestry chain, the visited identities on it, the
/// running node count and the effective limits of one conversion call.
///
/// `visited` holds only non-scalar ancestors: scalars cannot form cycles
/// and stay out of the cycle bookkeeping, though they still occupy a
/// call-stack entry and count toward the object total. Push and pop are
/// strict LIFO mirroring the recursion; popping out of order is a
/// programming error in an extractor, not a recoverable condition.
pub struct SerializationContext {
    visited: FxHashSet<ValueId>,
    call_stack: Vec<Value>,
    object_count: usize,
    max_depth: Option<usize>,
    max_collection_size: Option<usize>,
    max_objects: Option<usize>,
    fault_handler: Arc<dyn ValueFaultHandler>,
}

impl SerializationContext {
    pub fn new(
        max_depth: Option<usize>,
        max_collection_size: Option<usize>,
        max_objects: Option<usize>,
        fault_handler: Arc<dyn ValueFaultHandler>,
    ) -> Self {
        Self {
            visited: FxHashSet::default(),
            call_stack: Vec::new(),
            object_count: 0,
            max_depth,
            max_collection_size,
            max_objects,
            fault_handler,
        }
    }

    /// Enter a value: record it on the ancestry stack, add its identity
    /// to the cycle set when it has one, and count it.
    pub fn push(&mut self, value: &Value) {
        self.call_stack.push(value.clone());
        if let Some(id) = value.identity() {
            self.visited.insert(id);
        }
        self.object_count += 1;
    }

    /// Leave the topmost value, removing its identity from the cycle set
    pub fn pop(&mut self) -> Option<Value> {
        let value = self.call_stack.pop()?;
        if let Some(id) = value.identity() {
            self.visited.remove(&id);
        }
        Some(value)
    }

    /// Is this value already on the active ancestry chain?
    pub fn already_visited(&self, value: &Value) -> bool {
        value
            .identity()
            .is_some_and(|id| self.visited.contains(&id))
    }

    /// Current depth: the number of non-scalar ancestors
    pub fn depth(&self) -> usize {
        self.visited.len()
    }

    /// Nodes pushed so far during this call
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Would descending one more level exceed the depth limit?
    pub fn exceeded_max_depth(&self) -> bool {
        self.max_depth.is_some_and(|max| self.visited.len() > max)
    }

    /// Has the total node budget been spent?
    pub fn exceeded_max_objects(&self) -> bool {
        self.max_objects.is_some_and(|max| self.object_count > max)
    }

    /// Number of elements a collection of `len` may emit
    pub fn effective_collection_size(&self, len: usize) -> usize {
        match self.max_collection_size {
            Some(max) if len > max => max,
            _ => len,
        }
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn max_collection_size(&self) -> Option<usize> {
        self.max_collection_size
    }

    pub fn max_objects(&self) -> Option<usize> {
        self.max_objects
    }

    /// The fault-handling policy for this call
    pub fn fault_handler(&self) -> Arc<dyn ValueFaultHandler> {
        Arc::clone(&self.fault_handler)
    }

    /// Route a path fault through the policy. Used by extractors when a
    /// segment addresses the value itself; a suppressed target has no
    /// parent to omit it from, so suppression degrades to JSON null.
    pub fn handle_fault(
        &self,
        fault: ConvertError,
    ) -> Result<serde_json::Value, ConvertError> {
        debug_assert!(fault.is_path_fault(), "non-path fault offered to handler");
        Ok(self
            .fault_handler
            .handle(fault)?
            .unwrap_or(serde_json::Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fault::ThrowingValueFaultHandler;

    fn context(max_depth: Option<usize>) -> SerializationContext {
        SerializationContext::new(max_depth, None, None, Arc::new(ThrowingValueFaultHandler))
    }

    #[test]
    fn test_scalars_stay_out_of_the_cycle_set() {
        let mut cx = context(None);
        cx.push(&Value::from(1));
        cx.push(&Value::from("x"));
        assert_eq!(cx.depth(), 0);
        assert_eq!(cx.object_count(), 2);

        let list = Value::list([]);
        cx.push(&list);
        assert_eq!(cx.depth(), 1);
        assert!(cx.already_visited(&list));
    }

    #[test]
    fn test_push_pop_pairing_restores_the_cycle_set() {
        let mut cx = context(None);
        let map = Value::map([("k", Value::from(1))]);
        cx.push(&map);
        assert!(cx.already_visited(&map));
        cx.pop();
        assert!(!cx.already_visited(&map));
        assert_eq!(cx.depth(), 0);
        // object count is monotonic, pop never rewinds it
        assert_eq!(cx.object_count(), 1);
    }

    #[test]
    fn test_depth_counts_only_non_scalar_ancestors() {
        let mut cx = context(Some(1));
        cx.push(&Value::from(1));
        assert!(!cx.exceeded_max_depth());
        cx.push(&Value::list([]));
        assert!(!cx.exceeded_max_depth());
        cx.push(&Value::list([]));
        assert!(cx.exceeded_max_depth());
    }

    #[test]
    fn test_effective_collection_size() {
        let cx = SerializationContext::new(
            None,
            Some(3),
            None,
            Arc::new(ThrowingValueFaultHandler),
        );
        assert_eq!(cx.max_depth(), None);
        assert_eq!(cx.max_collection_size(), Some(3));
        assert_eq!(cx.max_objects(), None);
        assert_eq!(cx.effective_collection_size(2), 2);
        assert_eq!(cx.effective_collection_size(3), 3);
        assert_eq!(cx.effective_collection_size(10), 3);
        assert_eq!(context(None).effective_collection_size(10), 10);
    }
}
