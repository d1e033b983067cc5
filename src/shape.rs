//! Runtime shape classification and the container accessors built on it.
//!
//! Every shape decision a query makes goes through [`classify`]: one step
//! that maps a value onto the capability it offers (record, map, sequence, or
//! none of those), following reference indirection. The accessors here are
//! the only place lookup, indexing, and iteration rules live; the evaluator
//! never inspects value shapes on its own.

use crate::evaluator::EvalError;
use crate::value::{Map, MapKey, Record, Value};

/// The capability view of a value, after following references.
pub(crate) enum Shape<'a> {
    Record(&'a Record),
    Map(&'a Map),
    Seq(&'a [Value]),
    Other,
}

pub(crate) fn classify(value: &Value) -> Shape<'_> {
    match value {
        Value::Record(record) => Shape::Record(record),
        Value::Map(map) => Shape::Map(map),
        Value::Seq(items) => Shape::Seq(items),
        Value::Ref(inner) => classify(inner),
        _ => Shape::Other,
    }
}

/// Looks up one key against a record or map. A well-typed miss yields
/// `Null`; a key of the wrong kind, or a value that is neither a record nor
/// a map, is an error.
pub(crate) fn lookup(value: &Value, key: &MapKey) -> Result<Value, EvalError> {
    match classify(value) {
        Shape::Record(record) => match key {
            MapKey::String(name) => Ok(record.get(name).cloned().unwrap_or(Value::Null)),
            other => Err(EvalError::KeyType {
                key: other.kind().name(),
                container: "a record".to_string(),
            }),
        },
        Shape::Map(map) => {
            if key.kind() != map.key_kind() {
                return Err(EvalError::KeyType {
                    key: key.kind().name(),
                    container: format!("a map with {} keys", map.key_kind().name()),
                });
            }
            Ok(map.get(key).cloned().unwrap_or(Value::Null))
        }
        _ => Err(EvalError::Shape {
            wanted: "a record or map",
            found: value.type_name(),
        }),
    }
}

/// Selects the sequence element at `offset`, counting from the end when
/// negative.
pub(crate) fn element_at(value: &Value, offset: i64) -> Result<Value, EvalError> {
    let items = match classify(value) {
        Shape::Seq(items) => items,
        _ => {
            return Err(EvalError::Shape {
                wanted: "a sequence",
                found: value.type_name(),
            });
        }
    };
    let len = items.len();
    let normalized = if offset < 0 { offset + len as i64 } else { offset };
    if normalized < 0 || normalized >= len as i64 {
        return Err(EvalError::IndexOutOfRange {
            index: normalized,
            len,
        });
    }
    Ok(items[normalized as usize].clone())
}

/// The elements a traversal visits: sequence elements as-is, map entries as
/// `{key, value}` records.
pub(crate) fn elements(value: &Value) -> Result<Vec<Value>, EvalError> {
    match classify(value) {
        Shape::Seq(items) => Ok(items.to_vec()),
        Shape::Map(map) => Ok(map
            .iter()
            .map(|(k, v)| Value::entry(k.clone(), v.clone()))
            .collect()),
        _ => Err(EvalError::Shape {
            wanted: "a sequence or map",
            found: value.type_name(),
        }),
    }
}

/// The sequence items of a value, if it is sequence-shaped.
pub(crate) fn as_seq(value: &Value) -> Option<&[Value]> {
    match classify(value) {
        Shape::Seq(items) => Some(items),
        _ => None,
    }
}
