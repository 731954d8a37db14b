//! String→value conversion seam, used on the write path.
//!
//! Wire writes arrive as raw strings; something has to decide what value
//! a string becomes before it lands in the graph. That policy belongs to
//! the surrounding system, so the engine only defines the seam plus a
//! straightforward implementation that parses against the addressed
//! slot's current shape.

use crate::error::ConvertError;
use chrono::{DateTime, Utc};
use grebe_value::Value;

/// Convert a raw string into a value suitable for the addressed slot.
pub trait StringToValue: Send + Sync {
    /// `target` is the slot's current value, available as a shape hint.
    fn convert(&self, target: &Value, raw: &str) -> Result<Value, ConvertError>;
}

/// Parses the raw string according to the target slot's scalar kind.
/// Structural slots cannot be written from a string.
pub struct SimpleStringToValue;

impl StringToValue for SimpleStringToValue {
    fn convert(&self, target: &Value, raw: &str) -> Result<Value, ConvertError> {
        let parse_err = |reason: String| ConvertError::ValueParse {
            raw: raw.to_string(),
            target: target.kind().as_str(),
            reason,
        };
        match target {
            // a null slot carries no shape information, keep the text
            Value::Null | Value::Text(_) => Ok(Value::Text(raw.to_string())),
            Value::Bool(_) => raw
                .parse::<bool>()
                .map(Value::Bool)
                .map_err(|e| parse_err(e.to_string())),
            Value::Int(_) => raw
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|e| parse_err(e.to_string())),
            Value::Float(_) => raw
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| parse_err(e.to_string())),
            Value::DateTime(_) => DateTime::parse_from_rfc3339(raw)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| parse_err(e.to_string())),
            _ => Err(parse_err("structural slots cannot be written from a string".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parses_against_slot_kind() {
        let parser = SimpleStringToValue;
        assert_eq!(
            parser.convert(&Value::from(0), "42").unwrap(),
            Value::from(42)
        );
        assert_eq!(
            parser.convert(&Value::from(false), "true").unwrap(),
            Value::from(true)
        );
        assert_eq!(
            parser.convert(&Value::from(0.0), "2.5").unwrap(),
            Value::from(2.5)
        );
        assert_eq!(
            parser.convert(&Value::from("old"), "new").unwrap(),
            Value::from("new")
        );
    }

    #[test]
    fn test_parses_rfc3339_dates() {
        let parser = SimpleStringToValue;
        let slot = Value::DateTime(Utc::now());
        let parsed = parser.convert(&slot, "2026-08-30T12:00:00Z").unwrap();
        let expected = Utc.with_ymd_and_hms(2026, 8, 30, 12, 0, 0).unwrap();
        assert_eq!(parsed, Value::DateTime(expected));
    }

    #[test]
    fn test_rejects_unparseable_and_structural_targets() {
        let parser = SimpleStringToValue;
        assert!(matches!(
            parser.convert(&Value::from(0), "abc"),
            Err(ConvertError::ValueParse { .. })
        ));
        assert!(matches!(
            parser.convert(&Value::list([]), "[]"),
            Err(ConvertError::ValueParse { .. })
        ));
    }
}
