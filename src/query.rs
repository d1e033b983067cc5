//! The query combinators.
//!
//! A [`Query`] is an immutable, side-effect-free description of a traversal.
//! Building one never evaluates anything; the same tree can be evaluated any
//! number of times, against any number of inputs, concurrently. Combinators
//! compose: a query that extracts executive names from a company record is
//! just a [`Seq`](Query::Seq) of a lookup, a [`Select`](Query::Select), and
//! an [`Each`](Query::Each).
//!
//! # Examples
//!
//! ```
//! use valq::{eval, Query, Record, Value};
//!
//! let company = Value::Record(
//!     Record::new().with("name", "Stuff, Inc.").with(
//!         "people",
//!         vec![
//!             Value::Record(Record::new().with("name", "Alice").with("title", "CEO")),
//!             Value::Record(Record::new().with("name", "Bob").with("title", "MGR")),
//!             Value::Record(Record::new().with("name", "Dave").with("title", "CFO")),
//!         ],
//!     ),
//! );
//!
//! // The names of people whose title is "CxO".
//! let execs = Query::seq([
//!     Query::key("people"),
//!     Query::select(Query::seq([
//!         Query::key("title"),
//!         Query::func(|v| {
//!             let is_exec = v
//!                 .as_str()
//!                 .is_some_and(|s| s.len() == 3 && s.starts_with('C') && s.ends_with('O'));
//!             Value::Boolean(is_exec)
//!         }),
//!     ])),
//!     Query::each(Query::key("name")),
//! ]);
//!
//! let got = eval(&execs, company).unwrap();
//! assert_eq!(got, Value::Seq(vec!["Alice".into(), "Dave".into()]));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::evaluator::EvalError;
use crate::value::{MapKey, Value};

/// One step of a traversal. See the constructor methods for the usual way to
/// build each variant.
#[derive(Debug, Clone)]
pub enum Query {
    /// Yields the current value unchanged. Identity for [`Seq`](Query::Seq).
    This,

    /// Ignores the current value and yields a fixed value captured at
    /// construction. Never fails.
    Const(Value),

    /// Left-to-right composition: each step receives the previous step's
    /// result. An empty `Seq` behaves like [`This`](Query::This); the first
    /// failing step aborts the rest.
    Seq(Vec<Query>),

    /// Looks up a field of a record or an entry of a map. A well-typed miss
    /// yields `Null` rather than failing.
    Key(MapKey),

    /// Applies the sub-query to every element of a sequence or map,
    /// collecting the results into a sequence. Map elements are presented as
    /// `{key, value}` entry records.
    Each(Box<Query>),

    /// Keeps the elements of a sequence or map for which the predicate
    /// yields `true`, in input order, with their original values. The
    /// predicate must yield a boolean.
    Select(Box<Query>),

    /// Evaluates each named sub-query against the same current value and
    /// collects the results into a string-keyed map. A lookup miss binds
    /// `Null`; a genuine failure aborts and names the binding.
    Bind(Vec<(String, Query)>),

    /// Applies a caller-supplied transform to the current value.
    Func(Transform),

    /// Selects a sequence element by position; negative offsets count from
    /// the end.
    Index(i64),

    /// Tries candidates left to right against the same current value and
    /// yields the first non-error, non-`Null` result, never evaluating the
    /// rest. Candidate errors are swallowed; if nothing wins, yields `Null`.
    Or(Vec<Query>),

    /// Evaluates every sub-query against the same current value and collects
    /// the results, in order, into a sequence.
    List(Vec<Query>),

    /// Like [`List`](Query::List), but sequence-shaped results are spliced
    /// in flat (one level only).
    Cat(Vec<Query>),

    /// Compares the current value against a fixed operand, yielding a
    /// boolean. Mixed integer/float operands compare exactly; strings
    /// compare lexicographically.
    Compare(CmpOp, Value),
}

impl Query {
    /// A query that always yields `value`.
    pub fn constant(value: impl Into<Value>) -> Query {
        Query::Const(value.into())
    }

    /// Composes `steps` left to right.
    pub fn seq(steps: impl IntoIterator<Item = Query>) -> Query {
        Query::Seq(steps.into_iter().collect())
    }

    /// A single key lookup.
    pub fn key(key: impl Into<MapKey>) -> Query {
        Query::Key(key.into())
    }

    /// A left-to-right path of key lookups, one per key.
    pub fn path<K: Into<MapKey>>(keys: impl IntoIterator<Item = K>) -> Query {
        Query::Seq(keys.into_iter().map(|k| Query::Key(k.into())).collect())
    }

    /// Applies `sub` to every element of the current container.
    pub fn each(sub: Query) -> Query {
        Query::Each(Box::new(sub))
    }

    /// Filters the current container by `predicate`.
    pub fn select(predicate: Query) -> Query {
        Query::Select(Box::new(predicate))
    }

    /// Binds each name to its sub-query's result.
    pub fn bind<N: Into<String>>(bindings: impl IntoIterator<Item = (N, Query)>) -> Query {
        Query::Bind(
            bindings
                .into_iter()
                .map(|(name, sub)| (name.into(), sub))
                .collect(),
        )
    }

    /// Wraps a pure transform function.
    pub fn func(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Query {
        Query::Func(Transform::pure(f))
    }

    /// Wraps a transform function that can fail.
    pub fn try_func(
        f: impl Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Query {
        Query::Func(Transform::fallible(f))
    }

    /// Selects the element at `offset`, counting from the end when negative.
    pub fn index(offset: i64) -> Query {
        Query::Index(offset)
    }

    /// Tries `candidates` in order, yielding the first usable result.
    pub fn or(candidates: impl IntoIterator<Item = Query>) -> Query {
        Query::Or(candidates.into_iter().collect())
    }

    /// Collects every sub-query's result into a sequence.
    pub fn list(subs: impl IntoIterator<Item = Query>) -> Query {
        Query::List(subs.into_iter().collect())
    }

    /// Collects every sub-query's result, splicing sequence-shaped results
    /// in flat.
    pub fn cat(subs: impl IntoIterator<Item = Query>) -> Query {
        Query::Cat(subs.into_iter().collect())
    }

    /// True when the current value equals `operand`.
    pub fn eq(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Eq, operand.into())
    }

    /// True when the current value differs from `operand`.
    pub fn ne(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Ne, operand.into())
    }

    /// True when the current value orders before `operand`.
    pub fn lt(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Lt, operand.into())
    }

    /// True when the current value orders before or equal to `operand`.
    pub fn le(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Le, operand.into())
    }

    /// True when the current value orders after `operand`.
    pub fn gt(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Gt, operand.into())
    }

    /// True when the current value orders after or equal to `operand`.
    pub fn ge(operand: impl Into<Value>) -> Query {
        Query::Compare(CmpOp::Ge, operand.into())
    }
}

/// A comparison applied by [`Query::Compare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

/// A caller-supplied transform function, in one of the two accepted shapes:
/// plain `value -> value`, or `value -> value-or-error`. The constructors
/// are the two shapes, so an unsupported signature is rejected when the
/// query is built, not when it runs.
///
/// The current value is passed to the function as-is, including `Null`;
/// transforms decide for themselves how to treat absence.
///
/// Transforms must be free of shared mutable state to keep the query tree
/// reusable across concurrent evaluations.
#[derive(Clone)]
pub enum Transform {
    /// `value -> value`; cannot fail.
    Pure(Arc<dyn Fn(Value) -> Value + Send + Sync>),

    /// `value -> value-or-error`; the error propagates as the step's error.
    Fallible(Arc<dyn Fn(Value) -> Result<Value, EvalError> + Send + Sync>),
}

impl Transform {
    pub fn pure(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Transform {
        Transform::Pure(Arc::new(f))
    }

    pub fn fallible(
        f: impl Fn(Value) -> Result<Value, EvalError> + Send + Sync + 'static,
    ) -> Transform {
        Transform::Fallible(Arc::new(f))
    }

    pub(crate) fn apply(&self, value: Value) -> Result<Value, EvalError> {
        match self {
            Transform::Pure(f) => Ok(f(value)),
            Transform::Fallible(f) => f(value),
        }
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transform::Pure(_) => f.write_str("Transform::Pure(..)"),
            Transform::Fallible(_) => f.write_str("Transform::Fallible(..)"),
        }
    }
}
