use std::sync::Arc;

use serde_json::json;
use valq::{KeyKind, Map, Query, Record, Value, eval, to_json};

#[test]
fn objects_become_string_keyed_maps() {
    let got = Value::from_json_str(r#"{"a": 1, "b": [true, null]}"#).unwrap();
    let want = Value::Map(
        Map::new(KeyKind::String)
            .with("a", 1)
            .with("b", vec![Value::Boolean(true), Value::Null]),
    );
    assert_eq!(got, want);
}

#[test]
fn numbers_keep_the_integer_float_split() {
    assert_eq!(Value::from_json_str("7").unwrap(), Value::Integer(7));
    assert_eq!(Value::from_json_str("1.5").unwrap(), Value::Float(1.5));
}

#[test]
fn decoded_documents_are_queryable() {
    let doc = Value::from_json_str(
        r#"{
            "name": "Stuff, Inc.",
            "people": [
                {"name": "Alice", "title": "CEO", "age": 35},
                {"name": "Bob", "title": "MGR", "age": 38},
                {"name": "Dave", "title": "CFO", "age": 49}
            ]
        }"#,
    )
    .unwrap();

    let q = Query::seq([
        Query::key("people"),
        Query::select(Query::seq([Query::key("title"), Query::eq("CEO")])),
        Query::each(Query::key("name")),
    ]);
    assert_eq!(eval(&q, doc).unwrap(), Value::Seq(vec!["Alice".into()]));
}

#[test]
fn records_serialize_as_objects() {
    let rec = Value::Record(Record::new().with("name", "Ada").with("age", 36));
    assert_eq!(to_json(&rec), json!({"name": "Ada", "age": 36}));
}

#[test]
fn non_string_map_keys_are_stringified() {
    let m = Value::Map(Map::new(KeyKind::Integer).with(10, "ten").with(12, "twelve"));
    assert_eq!(to_json(&m), json!({"10": "ten", "12": "twelve"}));
}

#[test]
fn references_are_followed() {
    let rec = Value::Ref(Arc::new(Value::Record(Record::new().with("a", 1))));
    assert_eq!(to_json(&rec), json!({"a": 1}));
}

#[test]
fn non_finite_floats_become_null() {
    assert_eq!(to_json(&Value::Float(f64::NAN)), serde_json::Value::Null);
    assert_eq!(to_json(&Value::Float(f64::INFINITY)), serde_json::Value::Null);
}

#[test]
fn string_keyed_data_round_trips() {
    let text = r#"{"a": [1, 2.5, "x"], "b": {"nested": true}, "c": null}"#;
    let parsed: serde_json::Value = serde_json::from_str(text).unwrap();
    let value = Value::from(parsed.clone());
    assert_eq!(to_json(&value), parsed);
}
