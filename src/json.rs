//! Conversions between [`Value`] and `serde_json::Value`.
//!
//! Decoded JSON is the common source of loosely structured input, so the
//! conversion in is lossless: objects become string-keyed maps, arrays
//! become sequences. The conversion out is lossy where JSON is narrower
//! than [`Value`]: records become objects, non-string map keys are
//! stringified, non-finite floats become null, and references are followed.

use crate::value::{KeyKind, Map, Value};

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Value {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::Null,
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => {
                let mut map = Map::new(KeyKind::String);
                for (k, v) in fields {
                    map.insert(k, Value::from(v));
                }
                Value::Map(map)
            }
        }
    }
}

impl Value {
    /// Parses JSON text into a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use valq::{eval, Query, Value};
    ///
    /// let doc = Value::from_json_str(r#"{"name": "Ada", "tags": ["a", "b"]}"#).unwrap();
    /// let q = Query::seq([Query::key("tags"), Query::index(-1)]);
    /// assert_eq!(eval(&q, doc).unwrap(), Value::String("b".into()));
    /// ```
    pub fn from_json_str(text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(text).map(Value::from)
    }
}

/// Converts a value to JSON, lossily where JSON is the narrower model.
pub fn to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Boolean(b) => serde_json::Value::Bool(*b),
        Value::Integer(n) => serde_json::Value::Number((*n).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Seq(items) => serde_json::Value::Array(items.iter().map(to_json).collect()),
        Value::Map(map) => {
            let mut obj = serde_json::Map::new();
            for (k, v) in map.iter() {
                obj.insert(k.to_string(), to_json(v));
            }
            serde_json::Value::Object(obj)
        }
        Value::Record(record) => {
            let mut obj = serde_json::Map::new();
            for (name, v) in record.fields() {
                obj.insert(name.to_string(), to_json(v));
            }
            serde_json::Value::Object(obj)
        }
        Value::Ref(inner) => to_json(inner),
    }
}
