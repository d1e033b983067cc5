use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A dynamically-shaped value traversed by queries.
///
/// This type covers the runtime shapes a query can walk: scalars, ordered
/// sequences, associative maps with a declared key type, and record-shaped
/// values with named fields. `Null` doubles as the "no value" marker produced
/// by a lookup that found nothing, which is distinct from an evaluation error.
///
/// # Shapes
///
/// - **Record**: a fixed set of named fields, like a struct. Looked up by
///   field name.
/// - **Map**: an open key/value container whose keys all share one
///   [`KeyKind`]. Looked up by a key of that kind.
/// - **Seq**: an ordered, indexable container.
/// - **Ref**: a shared reference to another value, followed transparently
///   whenever a query needs the referent's shape.
///
/// # Examples
///
/// ```
/// use valq::{Record, Value};
///
/// let seq = Value::Seq(vec![Value::from("a"), Value::from("b")]);
/// let rec = Value::Record(Record::new().with("name", "Ada").with("age", 36));
/// assert_eq!(rec.type_name(), "record");
/// assert_eq!(seq.type_name(), "sequence");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// The absence of a value. Also the result of a well-typed lookup miss.
    Null,

    /// A boolean.
    Boolean(bool),

    /// An integer, kept separate from floats.
    Integer(i64),

    /// A floating-point number.
    Float(f64),

    /// A UTF-8 string.
    String(String),

    /// An ordered sequence of values.
    Seq(Vec<Value>),

    /// An associative map with a declared key kind.
    Map(Map),

    /// A record with named fields in declaration order.
    Record(Record),

    /// A shared reference to another value.
    Ref(Arc<Value>),
}

impl Value {
    /// A human-readable name for the value's shape. References report the
    /// shape of their referent.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Seq(_) => "sequence",
            Value::Map(_) => "map",
            Value::Record(_) => "record",
            Value::Ref(inner) => inner.type_name(),
        }
    }

    /// True for `Null`, following references.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Ref(inner) => inner.is_null(),
            _ => false,
        }
    }

    /// The boolean payload, if this is a boolean. Follows references.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            Value::Ref(inner) => inner.as_boolean(),
            _ => None,
        }
    }

    /// The string payload, if this is a string. Follows references.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Ref(inner) => inner.as_str(),
            _ => None,
        }
    }

    /// The `{key, value}` record presented to sub-queries when iterating a
    /// map, so a sub-query can inspect either side of an entry.
    pub fn entry(key: impl Into<MapKey>, value: impl Into<Value>) -> Value {
        Value::Record(
            Record::new()
                .with("key", Value::from(key.into()))
                .with("value", value),
        )
    }
}

/// The kind of key a [`Map`] is declared to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Boolean,
    Integer,
    String,
}

impl KeyKind {
    pub fn name(self) -> &'static str {
        match self {
            KeyKind::Boolean => "boolean",
            KeyKind::Integer => "integer",
            KeyKind::String => "string",
        }
    }
}

/// A key in an associative [`Map`], and the key argument of a lookup query.
///
/// Lookups against a record require a `String` key; lookups against a map
/// require a key whose [`kind`](MapKey::kind) matches the map's declared
/// [`KeyKind`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Boolean(bool),
    Integer(i64),
    String(String),
}

impl MapKey {
    pub fn kind(&self) -> KeyKind {
        match self {
            MapKey::Boolean(_) => KeyKind::Boolean,
            MapKey::Integer(_) => KeyKind::Integer,
            MapKey::String(_) => KeyKind::String,
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapKey::Boolean(b) => write!(f, "{}", b),
            MapKey::Integer(n) => write!(f, "{}", n),
            MapKey::String(s) => f.write_str(s),
        }
    }
}

/// An associative container mapping keys of one declared [`KeyKind`] to
/// values. Entries iterate in key order, so traversals over a map are
/// deterministic.
///
/// # Examples
///
/// ```
/// use valq::{KeyKind, Map, Value};
///
/// let m = Map::new(KeyKind::String)
///     .with("oh", "bother")
///     .with("said", "pooh");
/// assert_eq!(m.get(&"oh".into()), Some(&Value::from("bother")));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    kind: KeyKind,
    entries: BTreeMap<MapKey, Value>,
}

impl Map {
    /// An empty map declared to hold keys of `kind`.
    pub fn new(kind: KeyKind) -> Map {
        Map {
            kind,
            entries: BTreeMap::new(),
        }
    }

    /// The declared key kind.
    pub fn key_kind(&self) -> KeyKind {
        self.kind
    }

    /// Inserts an entry, replacing any existing entry for the key.
    ///
    /// # Panics
    ///
    /// Panics if the key's kind does not match the map's declared kind; a
    /// mixed-kind map is a construction mistake, not runtime data.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: impl Into<Value>) -> &mut Map {
        let key = key.into();
        assert!(
            key.kind() == self.kind,
            "map declared {} keys, inserted a {} key",
            self.kind.name(),
            key.kind().name(),
        );
        self.entries.insert(key, value.into());
        self
    }

    /// Builder-style [`insert`](Map::insert).
    pub fn with(mut self, key: impl Into<MapKey>, value: impl Into<Value>) -> Map {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &MapKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Value)> {
        self.entries.iter()
    }
}

/// A record-shaped value: named fields in declaration order, like a struct.
///
/// # Examples
///
/// ```
/// use valq::{Record, Value};
///
/// let rec = Record::new().with("name", "Ada").with("age", 36);
/// assert_eq!(rec.get("name"), Some(&Value::from("Ada")));
/// assert_eq!(rec.get("missing"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    /// Sets a field, replacing the value if the name already exists.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Record {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
        self
    }

    /// Builder-style [`set`](Record::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Record {
        self.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Value {
        Value::Boolean(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Integer(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Value {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Value {
        Value::Map(m)
    }
}

impl From<Record> for Value {
    fn from(r: Record) -> Value {
        Value::Record(r)
    }
}

impl From<Arc<Value>> for Value {
    fn from(shared: Arc<Value>) -> Value {
        Value::Ref(shared)
    }
}

impl From<MapKey> for Value {
    fn from(key: MapKey) -> Value {
        match key {
            MapKey::Boolean(b) => Value::Boolean(b),
            MapKey::Integer(n) => Value::Integer(n),
            MapKey::String(s) => Value::String(s),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Value {
        Value::Seq(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Value {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl From<bool> for MapKey {
    fn from(b: bool) -> MapKey {
        MapKey::Boolean(b)
    }
}

impl From<i32> for MapKey {
    fn from(n: i32) -> MapKey {
        MapKey::Integer(n as i64)
    }
}

impl From<i64> for MapKey {
    fn from(n: i64) -> MapKey {
        MapKey::Integer(n)
    }
}

impl From<&str> for MapKey {
    fn from(s: &str) -> MapKey {
        MapKey::String(s.to_string())
    }
}

impl From<String> for MapKey {
    fn from(s: String) -> MapKey {
        MapKey::String(s)
    }
}
