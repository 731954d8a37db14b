//! Sequence extractor.

use super::{Extracted, Extractor, extract_indexed, parse_index};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use crate::parse::StringToValue;
use grebe_value::Value;

/// Handles growable ordered sequences: serializes them as JSON arrays
/// (truncated to the effective collection size), descends by numeric
/// index, and writes existing slots by index.
pub struct ListExtractor;

impl Extractor for ListExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::List(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::List(list) = value else {
            return Err(ConvertError::Internal(format!(
                "list extractor dispatched on {} value",
                value.kind()
            )));
        };
        let items = list.snapshot();
        extract_indexed(converter, cx, value, &items, path, jsonify)
    }

    fn can_set_value(&self) -> bool {
        true
    }

    fn set_value(
        &self,
        parser: &dyn StringToValue,
        owner: &Value,
        attribute: &str,
        raw: &str,
    ) -> Result<Value, ConvertError> {
        let Value::List(list) = owner else {
            return Err(ConvertError::ReadOnly {
                kind: owner.kind().as_str(),
            });
        };
        let index = parse_index(attribute)?;
        let current = list.get(index).ok_or(ConvertError::IndexOutOfRange {
            index,
            len: list.len(),
        })?;
        let parsed = parser.convert(&current, raw)?;
        list.set(index, parsed).ok_or_else(|| {
            ConvertError::Internal(format!("list slot {index} vanished during write"))
        })
    }
}
