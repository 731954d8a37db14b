//! Write path: set_value dispatch, round trips, read-only shapes.

use grebe_json::{
    ConvertError, JsonConverter, ProcessingConfig, SerializeRequest, SimpleStringToValue,
};
use grebe_value::{PropertyBag, RecordHandle, TableHandle, Value};
use serde_json::json;
use std::sync::Arc;

fn converter() -> JsonConverter {
    JsonConverter::new(
        Arc::new(SimpleStringToValue),
        &ProcessingConfig::default(),
        Vec::new(),
    )
}

fn convert(value: &Value) -> serde_json::Value {
    let envelope = converter()
        .convert_to_json(value, &SerializeRequest::new(), true)
        .unwrap();
    envelope["value"].clone()
}

#[test]
fn test_map_write_round_trips_and_returns_previous() {
    let map = Value::map([("size", Value::from(100))]);
    let previous = converter().set_value(&map, "size", "250").unwrap();
    assert_eq!(previous, Value::from(100));
    assert_eq!(convert(&map), json!({"size": 250}));
}

#[test]
fn test_map_write_requires_an_existing_key() {
    let map = Value::map([("size", Value::from(100))]);
    let err = converter().set_value(&map, "missing", "1").unwrap_err();
    assert!(matches!(err, ConvertError::AttributeNotFound { .. }));
}

#[test]
fn test_list_and_array_writes_by_index() {
    let list = Value::list([Value::from(1), Value::from(2)]);
    assert_eq!(converter().set_value(&list, "1", "9").unwrap(), Value::from(2));
    assert_eq!(convert(&list), json!([1, 9]));

    let array = Value::array([Value::from(false)]);
    assert_eq!(
        converter().set_value(&array, "0", "true").unwrap(),
        Value::from(false)
    );
    assert_eq!(convert(&array), json!([true]));
}

#[test]
fn test_out_of_range_write_fails() {
    let list = Value::list([Value::from(1)]);
    let err = converter().set_value(&list, "5", "9").unwrap_err();
    assert!(matches!(err, ConvertError::IndexOutOfRange { index: 5, len: 1 }));
}

#[test]
fn test_structured_write_goes_through_the_seam() {
    let bag = PropertyBag::new("host");
    bag.put("name", Value::from("alpha"));
    let value = Value::structured(bag);

    let previous = converter().set_value(&value, "name", "beta").unwrap();
    assert_eq!(previous, Value::from("alpha"));
    assert_eq!(convert(&value), json!({"name": "beta"}));
}

#[test]
fn test_write_parses_against_the_slot_kind() {
    let map = Value::map([("count", Value::from(1))]);
    let err = converter().set_value(&map, "count", "lots").unwrap_err();
    assert!(matches!(err, ConvertError::ValueParse { .. }));
}

#[test]
fn test_records_and_tables_are_read_only() {
    let record = Value::Record(RecordHandle::new("metric", [("v", Value::from(1))]));
    let err = converter().set_value(&record, "v", "2").unwrap_err();
    assert!(matches!(err, ConvertError::ReadOnly { kind: "record" }));

    let rows = vec![RecordHandle::new("metric", [("name", Value::from("cpu"))])];
    let table = Value::Table(TableHandle::new("name", rows).unwrap());
    let err = converter().set_value(&table, "cpu", "x").unwrap_err();
    assert!(matches!(err, ConvertError::ReadOnly { kind: "table" }));
}

#[test]
fn test_scalar_owners_cannot_be_written() {
    let err = converter().set_value(&Value::from(1), "x", "2").unwrap_err();
    assert!(matches!(err, ConvertError::ReadOnly { kind: "integer" }));
}
