//! Built-in simplifiers.
//!
//! Simplifiers are ordinary extractors registered between the collection
//! extractors and the date extractor. They give well-known host types a
//! compact rendering instead of the property-by-property form the
//! catch-all would produce. Callers replace the default set wholesale by
//! passing their own list at construction.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use grebe_value::Value;

/// Renders structured values of host type `url` as their `url` property
/// alone — a plain string leaf instead of a one-field object.
pub struct UrlSimplifier;

impl Extractor for UrlSimplifier {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::Structured(o) if o.type_name() == "url")
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::Structured(object) = value else {
            return Err(ConvertError::Internal(format!(
                "url simplifier dispatched on {} value",
                value.kind()
            )));
        };
        match object.property("url") {
            Ok(text) => converter.extract(cx, &text, path, jsonify),
            Err(fault) => path_fault(cx, fault.into()),
        }
    }
}
