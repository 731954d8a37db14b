//! The request seam.
//!
//! The object that originated a conversion call lives outside this crate
//! (it is parsed from wire input by the surrounding system); the engine
//! consumes it through [`JsonRequest`]. [`SerializeRequest`] is a
//! self-contained implementation for embedders and tests.

use crate::config::ConfigKey;
use crate::fault::{ThrowingValueFaultHandler, ValueFaultHandler};
use serde_json::json;
use std::sync::Arc;

/// What one conversion call needs from its originating request.
pub trait JsonRequest {
    /// Path segments addressing a nested value, outermost first. Empty
    /// for a full serialization.
    fn path_parts(&self) -> &[String];

    /// Per-call limit override for one dimension. `None` means "use the
    /// hard limit"; implementations must map a supplied `0` to `None`.
    fn limit(&self, key: ConfigKey) -> Option<usize>;

    /// The fault-handling policy for this call
    fn value_fault_handler(&self) -> Arc<dyn ValueFaultHandler>;

    /// The request's own JSON representation, echoed verbatim into the
    /// top-level response envelope.
    fn to_json(&self) -> serde_json::Value;
}

/// Builder-style [`JsonRequest`] for direct embedding.
///
/// Defaults: empty path, no limit overrides, throwing fault handler.
pub struct SerializeRequest {
    path: Vec<String>,
    max_depth: Option<usize>,
    max_collection_size: Option<usize>,
    max_objects: Option<usize>,
    fault_handler: Arc<dyn ValueFaultHandler>,
}

impl SerializeRequest {
    pub fn new() -> Self {
        Self {
            path: Vec::new(),
            max_depth: None,
            max_collection_size: None,
            max_objects: None,
            fault_handler: Arc::new(ThrowingValueFaultHandler),
        }
    }

    pub fn with_path<S: Into<String>, I: IntoIterator<Item = S>>(mut self, path: I) -> Self {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    /// `0` means "use the hard limit", matching the wire convention
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = nonzero(limit);
        self
    }

    pub fn with_max_collection_size(mut self, limit: usize) -> Self {
        self.max_collection_size = nonzero(limit);
        self
    }

    pub fn with_max_objects(mut self, limit: usize) -> Self {
        self.max_objects = nonzero(limit);
        self
    }

    pub fn with_fault_handler(mut self, handler: Arc<dyn ValueFaultHandler>) -> Self {
        self.fault_handler = handler;
        self
    }
}

impl Default for SerializeRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonRequest for SerializeRequest {
    fn path_parts(&self) -> &[String] {
        &self.path
    }

    fn limit(&self, key: ConfigKey) -> Option<usize> {
        match key {
            ConfigKey::MaxDepth => self.max_depth,
            ConfigKey::MaxCollectionSize => self.max_collection_size,
            ConfigKey::MaxObjects => self.max_objects,
        }
    }

    fn value_fault_handler(&self) -> Arc<dyn ValueFaultHandler> {
        Arc::clone(&self.fault_handler)
    }

    fn to_json(&self) -> serde_json::Value {
        json!({
            "path": self.path,
            "maxDepth": self.max_depth.unwrap_or(0),
            "maxCollectionSize": self.max_collection_size.unwrap_or(0),
            "maxObjects": self.max_objects.unwrap_or(0),
        })
    }
}

fn nonzero(limit: usize) -> Option<usize> {
    (limit != 0).then_some(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_override_means_use_hard_limit() {
        let request = SerializeRequest::new().with_max_depth(0).with_max_objects(7);
        assert_eq!(request.limit(ConfigKey::MaxDepth), None);
        assert_eq!(request.limit(ConfigKey::MaxObjects), Some(7));
    }

    #[test]
    fn test_json_echo_carries_path_and_limits() {
        let request = SerializeRequest::new()
            .with_path(["a", "b"])
            .with_max_collection_size(5);
        let echo = request.to_json();
        assert_eq!(echo["path"], json!(["a", "b"]));
        assert_eq!(echo["maxCollectionSize"], json!(5));
        assert_eq!(echo["maxDepth"], json!(0));
    }
}
