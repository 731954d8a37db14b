//! Value model errors

use thiserror::Error;

/// Errors raised by the value model itself: property access failures on
/// structured objects and invariant violations during node construction.
#[derive(Debug, Error)]
pub enum ValueError {
    /// The named property does not exist on the structured object
    #[error("no such property `{0}`")]
    NoSuchProperty(String),

    /// The value does not support writes
    #[error("`{0}` values are read-only")]
    ReadOnly(String),

    /// Table rows do not share a single field set
    #[error("table rows are not uniform: {0}")]
    TableNotUniform(String),

    /// The table key column is missing, non-text or duplicated in a row
    #[error("bad key column `{column}`: {reason}")]
    BadKeyColumn { column: String, reason: String },

    /// A property accessor failed for a host-specific reason
    #[error("property access failed: {0}")]
    Access(String),
}
