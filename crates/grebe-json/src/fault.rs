//! Fault-handling policy seam.
//!
//! Unresolvable path segments and failing property accessors are not
//! decided by the engine: extractors route them through the handler the
//! request supplied, which either raises, substitutes a value, or
//! suppresses the branch. Limit conditions and internal errors never
//! reach a fault handler.

use crate::error::ConvertError;

/// Policy for surfacing path/attribute resolution faults.
pub trait ValueFaultHandler: Send + Sync {
    /// Decide what to do with a fault.
    ///
    /// `Ok(Some(v))` substitutes `v` for the unresolvable value,
    /// `Ok(None)` suppresses the branch (a faulting property is omitted
    /// from its parent object; a faulting path target degrades to JSON
    /// null), `Err` propagates to the caller.
    fn handle(&self, fault: ConvertError) -> Result<Option<serde_json::Value>, ConvertError>;
}

/// Propagates every fault to the caller. The default policy when a
/// request supplies none.
pub struct ThrowingValueFaultHandler;

impl ValueFaultHandler for ThrowingValueFaultHandler {
    fn handle(&self, fault: ConvertError) -> Result<Option<serde_json::Value>, ConvertError> {
        Err(fault)
    }
}

/// Suppresses every fault.
pub struct IgnoringValueFaultHandler;

impl ValueFaultHandler for IgnoringValueFaultHandler {
    fn handle(&self, fault: ConvertError) -> Result<Option<serde_json::Value>, ConvertError> {
        tracing::debug!(target: "grebe::convert", %fault, "fault suppressed");
        Ok(None)
    }
}
