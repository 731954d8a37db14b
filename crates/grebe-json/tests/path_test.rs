//! Path navigation: partial extraction, fault-handler policy, native form.

use chrono::{TimeZone, Utc};
use grebe_json::{
    ConvertError, IgnoringValueFaultHandler, JsonConverter, ProcessingConfig, SerializeRequest,
    SimpleStringToValue, reverse_path,
};
use grebe_value::{PropertyBag, RecordHandle, StructuredValue, TableHandle, Value, ValueError};
use serde_json::json;
use std::sync::Arc;

fn converter() -> JsonConverter {
    JsonConverter::new(
        Arc::new(SimpleStringToValue),
        &ProcessingConfig::default(),
        Vec::new(),
    )
}

fn sample() -> Value {
    Value::map([(
        "a",
        Value::map([(
            "b",
            Value::list([Value::from(10), Value::from(20), Value::from(30)]),
        )]),
    )])
}

fn convert_path<const N: usize>(value: &Value, path: [&str; N]) -> Result<serde_json::Value, ConvertError> {
    let request = SerializeRequest::new().with_path(path);
    converter()
        .convert_to_json(value, &request, true)
        .map(|envelope| envelope["value"].clone())
}

#[test]
fn test_path_extracts_only_the_addressed_value() {
    assert_eq!(convert_path(&sample(), ["a", "b", "2"]).unwrap(), json!(30));
    assert_eq!(
        convert_path(&sample(), ["a", "b"]).unwrap(),
        json!([10, 20, 30])
    );
    assert_eq!(convert_path(&sample(), []).unwrap()["a"]["b"][0], json!(10));
}

#[test]
fn test_path_ignored_when_use_path_is_off() {
    let request = SerializeRequest::new().with_path(["a", "b", "2"]);
    let envelope = converter()
        .convert_to_json(&sample(), &request, false)
        .unwrap();
    assert_eq!(envelope["value"]["a"]["b"], json!([10, 20, 30]));
}

#[test]
fn test_unknown_key_raises_with_throwing_policy() {
    let err = convert_path(&sample(), ["nope"]).unwrap_err();
    assert!(
        matches!(&err, ConvertError::AttributeNotFound { attribute, .. } if attribute == "nope"),
        "got {err}"
    );
}

#[test]
fn test_unknown_key_degrades_with_ignoring_policy() {
    let request = SerializeRequest::new()
        .with_path(["nope"])
        .with_fault_handler(Arc::new(IgnoringValueFaultHandler));
    let envelope = converter()
        .convert_to_json(&sample(), &request, true)
        .unwrap();
    assert_eq!(envelope["value"], json!(null));
}

#[test]
fn test_bad_and_out_of_range_indexes_are_path_faults() {
    let err = convert_path(&sample(), ["a", "b", "seven"]).unwrap_err();
    assert!(matches!(err, ConvertError::InvalidIndex { .. }));

    let err = convert_path(&sample(), ["a", "b", "9"]).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::IndexOutOfRange { index: 9, len: 3 }
    ));
}

#[test]
fn test_path_cannot_descend_into_a_leaf() {
    let err = convert_path(&sample(), ["a", "b", "0", "deeper"]).unwrap_err();
    assert!(matches!(err, ConvertError::AttributeNotFound { .. }));
}

#[test]
fn test_path_through_record_and_table() {
    let rows = vec![
        RecordHandle::new(
            "metric",
            [("name", Value::from("cpu")), ("value", Value::from(97))],
        ),
        RecordHandle::new(
            "metric",
            [("name", Value::from("mem")), ("value", Value::from(60))],
        ),
    ];
    let table = Value::Table(TableHandle::new("name", rows).unwrap());
    assert_eq!(convert_path(&table, ["mem", "value"]).unwrap(), json!(60));

    let err = convert_path(&table, ["disk"]).unwrap_err();
    assert!(matches!(&err, ConvertError::AttributeNotFound { kind, .. } if *kind == "table"));
}

#[test]
fn test_path_through_structured_properties() {
    let inner = PropertyBag::new("disk");
    inner.put("size", Value::from(250));
    let outer = PropertyBag::new("host");
    outer.put("disk", Value::structured(inner));

    let value = Value::structured(outer);
    assert_eq!(convert_path(&value, ["disk", "size"]).unwrap(), json!(250));
}

#[test]
fn test_date_time_segment_exposes_epoch_millis() {
    let instant = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
    let date = Value::DateTime(instant);
    assert_eq!(
        convert_path(&date, ["time"]).unwrap(),
        json!(instant.timestamp_millis())
    );

    let err = convert_path(&date, ["year"]).unwrap_err();
    assert!(matches!(&err, ConvertError::AttributeNotFound { kind, .. } if *kind == "date"));
}

/// Structured value whose `bad` property always fails; proves that path
/// navigation never touches siblings of the addressed branch.
struct Flaky;

impl StructuredValue for Flaky {
    fn type_name(&self) -> &str {
        "flaky"
    }
    fn property_names(&self) -> Vec<String> {
        vec!["good".to_string(), "bad".to_string()]
    }
    fn property(&self, name: &str) -> Result<Value, ValueError> {
        match name {
            "good" => Ok(Value::from(1)),
            _ => Err(ValueError::Access("backend unavailable".to_string())),
        }
    }
}

#[test]
fn test_siblings_of_the_path_are_never_materialized() {
    // with the throwing policy, touching `bad` would fail the call
    assert_eq!(convert_path(&Value::structured(Flaky), ["good"]).unwrap(), json!(1));
}

#[test]
fn test_accessor_fault_policy_on_full_serialization() {
    // throwing: the accessor failure propagates
    let err = convert_path(&Value::structured(Flaky), []).unwrap_err();
    assert!(matches!(err, ConvertError::Value(_)));

    // ignoring: the failing property is omitted, the rest survives
    let request =
        SerializeRequest::new().with_fault_handler(Arc::new(IgnoringValueFaultHandler));
    let envelope = converter()
        .convert_to_json(&Value::structured(Flaky), &request, true)
        .unwrap();
    assert_eq!(envelope["value"], json!({"good": 1}));
}

#[test]
fn test_native_extraction_returns_the_addressed_node() {
    let value = sample();
    let request = SerializeRequest::new();
    let mut path = reverse_path(&["a".to_string(), "b".to_string()]);
    let native = converter()
        .extract_with_context(&request, &value, &mut path, false)
        .unwrap()
        .into_native()
        .unwrap();

    // same node, not a copy: compare identity through Value equality
    let Value::Map(outer) = &value else { unreachable!() };
    let Value::Map(a) = outer.get("a").unwrap() else { unreachable!() };
    assert_eq!(native, a.get("b").unwrap());
}
