//! The conversion orchestrator.
//!
//! [`JsonConverter`] owns the extractor chain and the process-wide hard
//! limits. It is immutable after construction and safe to share across
//! concurrent conversion calls; everything call-scoped lives in the
//! [`SerializationContext`] each entry point creates and threads through
//! the recursion.

use crate::config::{ConfigKey, ProcessingConfig};
use crate::context::SerializationContext;
use crate::error::ConvertError;
use crate::extract::{
    ArrayExtractor, BeanExtractor, DateExtractor, Extracted, Extractor, ListExtractor,
    MapExtractor, RecordExtractor, TableExtractor, default_simplifiers,
};
use crate::parse::StringToValue;
use crate::request::JsonRequest;
use grebe_value::Value;
use serde_json::json;
use std::sync::Arc;

/// Converts value graphs into JSON trees through a chain of type-specific
/// extractors. Each extractor holds a reference back to the converter so
/// it can resolve nested values recursively within the same call context.
pub struct JsonConverter {
    handlers: Vec<Box<dyn Extractor>>,
    array_extractor: ArrayExtractor,
    parser: Arc<dyn StringToValue>,
    hard_limits: ProcessingConfig,
}

impl JsonConverter {
    /// Build a converter with the given write-path parser, hard limits
    /// and simplifier extractors. An empty simplifier list falls back to
    /// the built-in [`default_simplifiers`] set.
    pub fn new(
        parser: Arc<dyn StringToValue>,
        config: &ProcessingConfig,
        simplifiers: Vec<Box<dyn Extractor>>,
    ) -> Self {
        let mut handlers: Vec<Box<dyn Extractor>> = Vec::new();

        // TableExtractor must come before MapExtractor since tables are
        // map-shaped
        handlers.push(Box::new(TableExtractor));
        handlers.push(Box::new(RecordExtractor));

        // Collection handlers
        handlers.push(Box::new(ListExtractor));
        handlers.push(Box::new(MapExtractor));

        // Special, well-known types
        if simplifiers.is_empty() {
            handlers.extend(default_simplifiers());
        } else {
            handlers.extend(simplifiers);
        }

        // Special date handling
        handlers.push(Box::new(DateExtractor));

        // Must be last: the default property-by-property algorithm
        handlers.push(Box::new(BeanExtractor));

        Self {
            handlers,
            array_extractor: ArrayExtractor,
            parser,
            hard_limits: *config,
        }
    }

    /// Convert a value to its JSON response envelope.
    ///
    /// When `use_path` is set, the request's path is followed first and
    /// only the addressed inner value is serialized. The envelope pairs
    /// the computed tree with the request's own JSON echo:
    /// `{ "value": ..., "request": ... }`.
    pub fn convert_to_json(
        &self,
        value: &Value,
        request: &dyn JsonRequest,
        use_path: bool,
    ) -> Result<serde_json::Value, ConvertError> {
        let mut path = if use_path {
            reverse_path(request.path_parts())
        } else {
            Vec::new()
        };
        let result = self
            .extract_with_context(request, value, &mut path, true)?
            .into_json()?;
        Ok(json!({
            "value": result,
            "request": request.to_json(),
        }))
    }

    /// Extract a value under a fresh context scoped to this call.
    ///
    /// The context is a stack local of this function: it is discarded on
    /// every exit path and can never leak into another call.
    pub fn extract_with_context(
        &self,
        request: &dyn JsonRequest,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let mut cx = self.setup_context(request);
        self.extract(&mut cx, value, path, jsonify)
    }

    /// The recursive workhorse. Extractors call back into this for every
    /// child value, reusing the already-established context — creating a
    /// fresh one mid-call would blind cycle and limit tracking for the
    /// rest of the operation.
    pub fn extract(
        &self,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        if let Some(placeholder) = self.check_limits(cx, value) {
            return Ok(Extracted::Json(serde_json::Value::String(placeholder)));
        }
        cx.push(value);
        let result = self.dispatch(cx, value, path, jsonify);
        cx.pop();
        result
    }

    /// Write one slot of `owner`, returning the previous value. The
    /// write is dispatched to the owner's extractor exactly like reads
    /// are, and is single-level: no recursion, no context.
    pub fn set_value(
        &self,
        owner: &Value,
        attribute: &str,
        raw: &str,
    ) -> Result<Value, ConvertError> {
        if matches!(owner, Value::Array(_)) {
            return self
                .array_extractor
                .set_value(self.parser.as_ref(), owner, attribute, raw);
        }
        for handler in &self.handlers {
            if handler.can_set_value() && handler.matches(owner) {
                return handler.set_value(self.parser.as_ref(), owner, attribute, raw);
            }
        }
        Err(ConvertError::Internal(format!(
            "no writable extractor for {} value (attribute: {attribute}, value: {raw})",
            owner.kind()
        )))
    }

    fn dispatch(
        &self,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        if value.is_null() {
            // still pushed/popped so the bookkeeping stays consistent
            return Ok(if jsonify {
                Extracted::Json(serde_json::Value::Null)
            } else {
                Extracted::Native(Value::Null)
            });
        }
        if matches!(value, Value::Array(_)) {
            return self.array_extractor.extract(self, cx, value, path, jsonify);
        }
        for handler in &self.handlers {
            if handler.matches(value) {
                return handler.extract(self, cx, value, path, jsonify);
            }
        }
        // unreachable as long as the catch-all is registered last
        Err(ConvertError::Internal(format!(
            "no extractor for {} value (value: {value}, path: {path:?})",
            value.kind()
        )))
    }

    /// Limit checks happen before the node is entered. Any hit turns the
    /// whole branch into a string placeholder; limits never fail a call.
    fn check_limits(&self, cx: &SerializationContext, value: &Value) -> Option<String> {
        if cx.exceeded_max_depth() {
            tracing::debug!(
                target: "grebe::convert",
                depth = cx.depth(),
                "max depth reached, emitting textual placeholder"
            );
            return Some(value.to_string());
        }
        if let Some(id) = value.identity() {
            if cx.already_visited(value) {
                return Some(format!("[Reference {}@{:x}]", value.kind(), id.addr()));
            }
        }
        if cx.exceeded_max_objects() {
            return Some("[Object limit exceeded]".to_string());
        }
        None
    }

    fn setup_context(&self, request: &dyn JsonRequest) -> SerializationContext {
        let max_depth = effective_limit(
            request.limit(ConfigKey::MaxDepth),
            self.hard_limits.limit(ConfigKey::MaxDepth),
        );
        let max_collection_size = effective_limit(
            request.limit(ConfigKey::MaxCollectionSize),
            self.hard_limits.limit(ConfigKey::MaxCollectionSize),
        );
        let max_objects = effective_limit(
            request.limit(ConfigKey::MaxObjects),
            self.hard_limits.limit(ConfigKey::MaxObjects),
        );
        tracing::debug!(
            target: "grebe::convert",
            max_depth = ?max_depth,
            max_collection_size = ?max_collection_size,
            max_objects = ?max_objects,
            "serialization context ready"
        );
        SerializationContext::new(
            max_depth,
            max_collection_size,
            max_objects,
            request.value_fault_handler(),
        )
    }
}

/// Combine a per-call override with the hard limit: requests may lower a
/// limit but never raise it, and `None` is unlimited on either side.
fn effective_limit(requested: Option<usize>, hard: Option<usize>) -> Option<usize> {
    match (requested, hard) {
        (None, hard) => hard,
        (requested, None) => requested,
        (Some(requested), Some(hard)) => Some(requested.min(hard)),
    }
}

/// Reverse caller-order path segments into the pop-from-the-end stack the
/// extractors consume.
pub fn reverse_path(parts: &[String]) -> Vec<String> {
    parts.iter().rev().cloned().collect()
}
