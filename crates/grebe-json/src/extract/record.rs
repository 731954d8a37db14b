//! Record extractor.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use grebe_value::Value;

/// Handles named-field aggregates: the full form is a JSON object of all
/// fields, a path segment selects one field. Records are fixed-size
/// aggregates, not collections, so no size clamping applies — and they
/// are immutable, so no writes either.
pub struct RecordExtractor;

impl Extractor for RecordExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::Record(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::Record(record) = value else {
            return Err(ConvertError::Internal(format!(
                "record extractor dispatched on {} value",
                value.kind()
            )));
        };
        if let Some(segment) = path.pop() {
            return match record.field(&segment) {
                Some(child) => converter.extract(cx, &child, path, jsonify),
                None => path_fault(
                    cx,
                    ConvertError::AttributeNotFound {
                        attribute: segment,
                        kind: "record",
                    },
                ),
            };
        }
        if !jsonify {
            return Ok(Extracted::Native(value.clone()));
        }
        let mut out = serde_json::Map::with_capacity(record.len());
        for (name, child) in record.snapshot() {
            out.insert(name, converter.extract(cx, &child, path, true)?.into_json()?);
        }
        Ok(Extracted::Json(serde_json::Value::Object(out)))
    }
}
