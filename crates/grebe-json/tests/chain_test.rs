//! Extractor chain ordering: first match wins, specific shapes beat
//! generic ones, simplifiers slot between collections and dates, the
//! catch-all stays last, and arrays bypass the chain entirely.

use chrono::Utc;
use grebe_json::{
    ConvertError, Extracted, Extractor, JsonConverter, ProcessingConfig, SerializationContext,
    SerializeRequest, SimpleStringToValue,
};
use grebe_value::{PropertyBag, RecordHandle, TableHandle, Value};
use serde_json::json;
use std::sync::Arc;

/// Test simplifier claiming every value it is asked about.
struct ClaimAll;

impl Extractor for ClaimAll {
    fn matches(&self, _value: &Value) -> bool {
        true
    }

    fn extract(
        &self,
        _converter: &JsonConverter,
        _cx: &mut SerializationContext,
        _value: &Value,
        _path: &mut Vec<String>,
        _jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        Ok(Extracted::Json(json!("simplified")))
    }
}

/// Test simplifier claiming nothing, used to displace the default set.
struct ClaimNone;

impl Extractor for ClaimNone {
    fn matches(&self, _value: &Value) -> bool {
        false
    }

    fn extract(
        &self,
        _converter: &JsonConverter,
        _cx: &mut SerializationContext,
        _value: &Value,
        _path: &mut Vec<String>,
        _jsonify: bool,
    ) -> Result<Extracted, ConvertError> {
        unreachable!("ClaimNone never matches")
    }
}

fn convert_with(simplifiers: Vec<Box<dyn Extractor>>, value: &Value) -> serde_json::Value {
    let converter = JsonConverter::new(
        Arc::new(SimpleStringToValue),
        &ProcessingConfig::default(),
        simplifiers,
    );
    let envelope = converter
        .convert_to_json(value, &SerializeRequest::new(), true)
        .unwrap();
    envelope["value"].clone()
}

#[test]
fn test_simplifiers_lose_to_earlier_collection_extractors() {
    let map = Value::map([("k", Value::from(1))]);
    assert_eq!(
        convert_with(vec![Box::new(ClaimAll)], &map),
        json!({"k": 1})
    );

    let list = Value::list([Value::from(1)]);
    assert_eq!(convert_with(vec![Box::new(ClaimAll)], &list), json!([1]));
}

#[test]
fn test_simplifiers_beat_date_and_catch_all() {
    let date = Value::DateTime(Utc::now());
    assert_eq!(
        convert_with(vec![Box::new(ClaimAll)], &date),
        json!("simplified")
    );

    let bag = PropertyBag::new("host");
    bag.put("x", Value::from(1));
    assert_eq!(
        convert_with(vec![Box::new(ClaimAll)], &Value::structured(bag)),
        json!("simplified")
    );
}

#[test]
fn test_arrays_bypass_the_chain() {
    // even an everything-claiming simplifier never sees arrays
    let array = Value::array([Value::from(1), Value::from(2)]);
    assert_eq!(
        convert_with(vec![Box::new(ClaimAll)], &array),
        json!([1, 2])
    );
}

#[test]
fn test_tables_win_over_the_generic_map_shape() {
    let rows = vec![RecordHandle::new(
        "metric",
        [("name", Value::from("cpu")), ("value", Value::from(97))],
    )];
    let table = Value::Table(TableHandle::new("name", rows).unwrap());

    // keyed-row form proves the table extractor matched first
    assert_eq!(
        convert_with(Vec::new(), &table),
        json!({"cpu": {"name": "cpu", "value": 97}})
    );
}

#[test]
fn test_custom_simplifiers_replace_the_default_set() {
    let url = PropertyBag::new("url");
    url.put("url", Value::from("https://example.com"));
    let value = Value::structured(url);

    // default set: compact string form
    assert_eq!(convert_with(Vec::new(), &value), json!("https://example.com"));

    // custom set without the url simplifier: catch-all renders properties
    assert_eq!(
        convert_with(vec![Box::new(ClaimNone)], &value),
        json!({"url": "https://example.com"})
    );
}
