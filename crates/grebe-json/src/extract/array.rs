//! Array extractor.
//!
//! Arrays never go through the chain: they are a structurally uniform
//! shape of their own and the converter dispatches them here directly.

use super::{Extracted, Extractor, extract_indexed, parse_index};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use crate::parse::StringToValue;
use grebe_value::Value;

/// Handles fixed-shape indexed nodes: same addressing as lists, but the
/// length never changes and only existing slots can be overwritten.
pub struct ArrayExtractor;

impl Extractor for ArrayExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::Array(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::Array(array) = value else {
            return Err(ConvertError::Internal(format!(
                "array extractor dispatched on {} value",
                value.kind()
            )));
        };
        let items = array.snapshot();
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
        let Value::Array(array) = owner else {
            return Err(ConvertError::ReadOnly {
                kind: owner.kind().as_str(),
            });
        };
        let index = parse_index(attribute)?;
        let current = array.get(index).ok_or(ConvertError::IndexOutOfRange {
            index,
            len: array.len(),
        })?;
        let parsed = parser.convert(&current, raw)?;
        array.set(index, parsed).ok_or_else(|| {
            ConvertError::Internal(format!("array slot {index} vanished during write"))
        })
    }
}
