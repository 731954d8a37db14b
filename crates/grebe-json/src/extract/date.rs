//! Temporal extractor.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use chrono::SecondsFormat;
use grebe_value::Value;

/// Handles temporal scalars: renders RFC 3339 text with millisecond
/// precision. The single navigable segment is `time`, which exposes the
/// instant as epoch milliseconds.
pub struct DateExtractor;

impl Extractor for DateExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::DateTime(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::DateTime(instant) = value else {
            return Err(ConvertError::Internal(format!(
                "date extractor dispatched on {} value",
                value.kind()
            )));
        };
        if let Some(segment) = path.pop() {
            if segment == "time" {
                let millis = Value::Int(instant.timestamp_millis());
                return converter.extract(cx, &millis, path, jsonify);
            }
            return path_fault(
                cx,
                ConvertError::AttributeNotFound {
                    attribute: segment,
                    kind: "date",
                },
            );
        }
        if !jsonify {
            return Ok(Extracted::Native(value.clone()));
        }
        Ok(Extracted::Json(serde_json::Value::String(
            instant.to_rfc3339_opts(SecondsFormat::Millis, true),
        )))
    }
}
