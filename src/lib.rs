//! # valq - composable queries over dynamically-shaped values
//!
//! A query describes a sequence of steps through the structure of a compound
//! value (record, map, sequence). Evaluating the query against a value walks
//! the value's runtime shape and produces a derived value, without
//! shape-specific traversal code at the call site.
//!
//! Decoding loosely structured data such as JSON often produces deeply
//! nested dynamic structures that are inconvenient to pick apart by hand. A
//! query extracts just the pieces relevant to the task, and the same query
//! can safely inspect differently-typed values that share a shape.
//!
//! ## Queries
//!
//! - To fetch a named field from a record, or an entry from a map, use
//!   [`Query::key`] (or [`Query::path`] for a chain of lookups).
//! - To index into a sequence, use [`Query::index`].
//! - To walk sequentially into a value, use [`Query::seq`].
//! - To apply a sub-query to every element, use [`Query::each`].
//! - To filter elements by a predicate, use [`Query::select`].
//! - To bind several sub-queries to names, use [`Query::bind`].
//! - To apply a function to a value, use [`Query::func`] or
//!   [`Query::try_func`].
//! - To collect sub-query results, use [`Query::list`], or [`Query::cat`] to
//!   flatten sequence-valued results.
//! - To take the first usable result of several sub-queries, use
//!   [`Query::or`].
//!
//! Queries are immutable values: build once, evaluate any number of times.
//!
//! ## Examples
//!
//! ```
//! use valq::{eval, Query, Record, Value};
//!
//! let input = Value::Seq(vec![
//!     Value::Record(Record::new().with("name", "aardvark").with("alive", true)),
//!     Value::Record(Record::new().with("name", "alice").with("employed", false)),
//!     Value::Record(Record::new().with("name", "bob").with("employed", true)),
//!     Value::Record(Record::new().with("name", "boar").with("alive", false)),
//! ]);
//!
//! // Keep the elements whose boolean property is true, whichever field
//! // carries it, and pull out their names.
//! let query = Query::seq([
//!     Query::select(Query::or([Query::key("alive"), Query::key("employed")])),
//!     Query::each(Query::key("name")),
//! ]);
//!
//! let names = eval(&query, input).unwrap();
//! assert_eq!(names, Value::Seq(vec!["aardvark".into(), "bob".into()]));
//! ```

pub mod evaluator;
pub mod funcs;
pub mod json;
pub mod query;
mod shape;
pub mod value;

pub use evaluator::{EvalError, eval};
pub use json::to_json;
pub use query::{CmpOp, Query, Transform};
pub use value::{KeyKind, Map, MapKey, Record, Value};
