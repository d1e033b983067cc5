//! Ready-made transform queries for common predicates.

use regex::Regex;

use crate::evaluator::EvalError;
use crate::query::Query;
use crate::value::Value;

/// A transform that reports whether the current value is the absence marker,
/// as a boolean.
pub fn is_null() -> Query {
    Query::func(|v| Value::Boolean(v.is_null()))
}

/// A transform that reports whether the current value is present, as a
/// boolean.
pub fn not_null() -> Query {
    Query::func(|v| Value::Boolean(!v.is_null()))
}

/// A transform that reports whether the current string value matches
/// `pattern`, as a boolean. The pattern is compiled here, so a bad pattern
/// fails when the query is built rather than when it runs; a non-string
/// input fails the evaluation step.
///
/// # Examples
///
/// ```
/// use valq::{eval, funcs, Query, Value};
///
/// let words = Value::Seq(vec!["pear".into(), "plum".into(), "cherry".into()]);
/// let q = Query::select(funcs::matches("^p").unwrap());
/// assert_eq!(
///     eval(&q, words).unwrap(),
///     Value::Seq(vec!["pear".into(), "plum".into()]),
/// );
/// ```
pub fn matches(pattern: &str) -> Result<Query, regex::Error> {
    let re = Regex::new(pattern)?;
    Ok(Query::try_func(move |v| match v.as_str() {
        Some(s) => Ok(Value::Boolean(re.is_match(s))),
        None => Err(EvalError::transform(format!(
            "matches requires a string, got {}",
            v.type_name()
        ))),
    }))
}
