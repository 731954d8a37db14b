//! Mapping extractor.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use crate::parse::StringToValue;
use grebe_value::Value;

/// Handles key-addressed nodes: serializes them as JSON objects
/// (truncated to the first effective-size entries), descends by exact
/// key, and writes existing keys.
///
/// The predicate claims every map-shaped value, including tables — the
/// table extractor must be registered earlier to win them, which is what
/// keeps the chain's specificity ordering an enforced invariant rather
/// than a convention.
pub struct MapExtractor;

impl Extractor for MapExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::Map(_) | Value::Table(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::Map(map) = value else {
            return Err(ConvertError::Internal(format!(
                "{} value reached the map extractor; is the chain misordered?",
                value.kind()
            )));
        };
        if let Some(segment) = path.pop() {
            return match map.get(&segment) {
                Some(child) => converter.extract(cx, &child, path, jsonify),
                None => path_fault(
                    cx,
                    ConvertError::AttributeNotFound {
                        attribute: segment,
                        kind: "map",
                    },
                ),
            };
        }
        if !jsonify {
            return Ok(Extracted::Native(value.clone()));
        }
        let entries = map.snapshot();
        let len = cx.effective_collection_size(entries.len());
        let mut out = serde_json::Map::with_capacity(len);
        for (key, child) in entries.into_iter().take(len) {
            out.insert(key, converter.extract(cx, &child, path, true)?.into_json()?);
        }
        Ok(Extracted::Json(serde_json::Value::Object(out)))
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
        let Value::Map(map) = owner else {
            // map-shaped but not writable (tables land here via dispatch)
            return Err(ConvertError::ReadOnly {
                kind: owner.kind().as_str(),
            });
        };
        let current = map.get(attribute).ok_or_else(|| ConvertError::AttributeNotFound {
            attribute: attribute.to_string(),
            kind: "map",
        })?;
        let parsed = parser.convert(&current, raw)?;
        map.insert(attribute, parsed).ok_or_else(|| {
            ConvertError::Internal(format!("map key `{attribute}` vanished during write"))
        })
    }
}
