use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use valq::{EvalError, KeyKind, Map, Query, Record, Value, eval};

fn strings(items: &[&str]) -> Value {
    Value::Seq(items.iter().map(|s| Value::from(*s)).collect())
}

fn record() -> Value {
    Value::Record(Record::new().with("a", "foo").with("b", 17))
}

#[test]
fn key_on_a_scalar_is_a_shape_error() {
    let err = eval(&Query::key("a"), Value::Integer(3)).unwrap_err();
    assert!(matches!(err, EvalError::Shape { .. }));
    assert_eq!(err.to_string(), "value of type integer is not a record or map");
}

#[test]
fn non_string_key_on_a_record_is_a_key_type_error() {
    let err = eval(&Query::key(10), record()).unwrap_err();
    assert!(matches!(err, EvalError::KeyType { .. }));
    assert_eq!(err.to_string(), "integer key cannot be used with a record");
}

#[test]
fn wrong_key_kind_on_a_map_is_a_key_type_error() {
    let m = Value::Map(Map::new(KeyKind::Integer).with(10, "ten"));
    let err = eval(&Query::key("ten"), m).unwrap_err();
    assert!(matches!(err, EvalError::KeyType { .. }));
    assert_eq!(
        err.to_string(),
        "string key cannot be used with a map with integer keys",
    );
}

#[test]
fn index_on_a_non_sequence_is_a_shape_error() {
    let err = eval(&Query::index(0), record()).unwrap_err();
    assert!(matches!(err, EvalError::Shape { .. }));
    assert_eq!(err.to_string(), "value of type record is not a sequence");
}

#[test]
fn index_out_of_range_reports_offset_and_bounds() {
    let input = Value::Seq(vec![2.into(), 3.into(), 5.into(), 7.into(), 11.into(), 13.into()]);
    assert_eq!(eval(&Query::index(-1), input.clone()).unwrap(), Value::from(13));

    let err = eval(&Query::index(10), input.clone()).unwrap_err();
    assert!(matches!(err, EvalError::IndexOutOfRange { index: 10, len: 6 }));
    assert_eq!(err.to_string(), "index 10 is out of range for 0..6");

    // normalization happens before the bounds check
    let err = eval(&Query::index(-7), input).unwrap_err();
    assert!(matches!(err, EvalError::IndexOutOfRange { index: -1, len: 6 }));
}

#[test]
fn each_on_a_non_container_is_a_shape_error() {
    let err = eval(&Query::each(Query::This), Value::from("scalar")).unwrap_err();
    assert!(matches!(err, EvalError::Shape { .. }));
    assert_eq!(err.to_string(), "value of type string is not a sequence or map");
}

#[test]
fn select_predicate_must_yield_a_boolean() {
    let err = eval(&Query::select(Query::This), strings(&["pear"])).unwrap_err();
    assert!(matches!(err, EvalError::Predicate { found: "string" }));
    assert_eq!(err.to_string(), "select predicate yielded string, not boolean");
}

#[test]
fn each_failure_names_the_element() {
    let input = Value::Seq(vec![strings(&["inner"]), Value::Integer(5)]);
    let err = eval(&Query::each(Query::index(0)), input).unwrap_err();
    match &err {
        EvalError::Subquery { at, source } => {
            assert_eq!(at, "element 1");
            assert!(matches!(**source, EvalError::Shape { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(
        err.to_string(),
        "evaluating subquery element 1: value of type integer is not a sequence",
    );
}

#[test]
fn bind_failure_names_the_binding() {
    let q = Query::bind([("broken", Query::index(0))]);
    let err = eval(&q, record()).unwrap_err();
    match &err {
        EvalError::Subquery { at, source } => {
            assert_eq!(at, "\"broken\"");
            assert!(matches!(**source, EvalError::Shape { .. }));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    // the original error stays reachable through the standard source chain
    assert!(err.source().is_some());
}

#[test]
fn select_aborts_on_the_first_predicate_failure() {
    let count = Arc::new(AtomicUsize::new(0));
    let predicate = {
        let count = Arc::clone(&count);
        Query::try_func(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            Err(EvalError::transform("boom"))
        })
    };
    let err = eval(&Query::select(predicate), strings(&["a", "b", "c"])).unwrap_err();
    assert!(matches!(err, EvalError::Subquery { .. }));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn list_failure_names_the_position() {
    let q = Query::list([Query::key("a"), Query::index(3)]);
    let err = eval(&q, record()).unwrap_err();
    match err {
        EvalError::Subquery { at, .. } => assert_eq!(at, "element 1"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn transform_failure_propagates_verbatim() {
    let q = Query::try_func(|_| Err(EvalError::transform("I say no thank you sir")));
    let err = eval(&q, Value::Null).unwrap_err();
    assert!(matches!(err, EvalError::Transform(_)));
    assert_eq!(err.to_string(), "I say no thank you sir");
}

#[test]
fn ordering_against_an_incompatible_shape_fails() {
    let err = eval(&Query::lt(25), Value::from("pear")).unwrap_err();
    assert!(matches!(err, EvalError::Shape { .. }));
}
