//! Engine error types

use grebe_value::ValueError;
use thiserror::Error;

/// Errors raised during conversion, extraction and writes.
///
/// Limit conditions (depth, object count, collection size) are never
/// errors — they degrade to placeholders inside the engine. The variants
/// here split into path faults, which extractors offer to the injected
/// [`ValueFaultHandler`](crate::ValueFaultHandler), and everything else,
/// which propagates to the caller as-is.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A path segment named an attribute the value does not have
    #[error("attribute `{attribute}` not found on {kind} value")]
    AttributeNotFound {
        attribute: String,
        kind: &'static str,
    },

    /// A path segment indexed past the end of a sequence
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A path segment addressed a sequence but is not a number
    #[error("`{segment}` is not a valid index")]
    InvalidIndex { segment: String },

    /// A write was requested against a value that cannot be written
    #[error("{kind} values are read-only")]
    ReadOnly { kind: &'static str },

    /// A raw string could not be converted for the addressed slot
    #[error("cannot parse `{raw}` as {target}: {reason}")]
    ValueParse {
        raw: String,
        target: &'static str,
        reason: String,
    },

    /// A hard-limit configuration entry is not a non-negative integer
    #[error("invalid value `{value}` for config key {key}")]
    BadConfig { key: &'static str, value: String },

    /// A structured-value accessor failed
    #[error(transparent)]
    Value(#[from] ValueError),

    /// Dispatch invariant violation — a programming error, never retried
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConvertError {
    /// True for the conditions the fault handler is allowed to see:
    /// unresolvable path segments and failing property accessors.
    pub fn is_path_fault(&self) -> bool {
        matches!(
            self,
            ConvertError::AttributeNotFound { .. }
                | ConvertError::IndexOutOfRange { .. }
                | ConvertError::InvalidIndex { .. }
                | ConvertError::Value(_)
        )
    }
}
