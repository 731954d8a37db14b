//! Tabular extractor.

use super::{Extracted, Extractor, path_fault};
use crate::context::SerializationContext;
use crate::convert::JsonConverter;
use crate::error::ConvertError;
use grebe_value::Value;

/// Handles tables: rows serialize as a JSON object keyed by each row's
/// key-column value (truncated to the effective collection size), and a
/// path segment selects the row with that key. Registered before the map
/// extractor because tables also satisfy the generic map shape.
///
/// Tables are read-only aggregates.
pub struct TableExtractor;

impl Extractor for TableExtractor {
    fn matches(&self, value: &Value) -> bool {
        matches!(value, Value::Table(_))
    }

    fn extract(
        &self,
        converter: &JsonConverter,
        cx: &mut SerializationContext,
        value: &Value,
        path: &mut Vec<String>,
        jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        let Value::Table(table) = value else {
            return Err(ConvertError::Internal(format!(
                "table extractor dispatched on {} value",
                value.kind()
            )));
        };
        if let Some(segment) = path.pop() {
            return match table.row_by_key(&segment) {
                Some(row) => converter.extract(cx, &Value::Record(row), path, jsonify),
                None => path_fault(
                    cx,
                    ConvertError::AttributeNotFound {
                        attribute: segment,
                        kind: "table",
                    },
                ),
            };
        }
        if !jsonify {
            return Ok(Extracted::Native(value.clone()));
        }
        let entries = table.entries();
        let len = cx.effective_collection_size(entries.len());
        let mut out = serde_json::Map::with_capacity(len);
        for (key, row) in entries.into_iter().take(len) {
            let rendered = converter
                .extract(cx, &Value::Record(row), path, true)?
                .into_json()?;
            out.insert(key, rendered);
        }
        Ok(Extracted::Json(serde_json::Value::Object(out)))
    }
}
