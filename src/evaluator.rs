//! Query evaluation.
//!
//! [`eval`] wraps the input in a root cell and walks the combinator tree
//! recursively. Evaluation is synchronous, single-threaded, and free of I/O;
//! its cost is proportional to the input's shape. Every combinator except
//! `Or` fails fast, propagating the first error with no partial result.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use rust_decimal::{Decimal, prelude::FromPrimitive};

use crate::query::{CmpOp, Query};
use crate::shape;
use crate::value::{KeyKind, Map, Value};

/// Evaluates `query` against `input` and returns the value it describes.
///
/// The same query may be evaluated repeatedly and concurrently; it holds no
/// evaluation state, and re-evaluating against the same input yields the
/// same result.
///
/// # Examples
///
/// ```
/// use valq::{eval, Query, Record, Value};
///
/// let rec = Value::Record(Record::new().with("a", "foo").with("b", 17));
/// assert_eq!(eval(&Query::key("a"), rec.clone()).unwrap(), Value::from("foo"));
/// // A missing field is not an error, it is the absence marker.
/// assert_eq!(eval(&Query::key("z"), rec).unwrap(), Value::Null);
/// ```
pub fn eval(query: &Query, input: impl Into<Value>) -> Result<Value, EvalError> {
    let root = Cell::root(input.into());
    let result = query.eval_at(&root)?;
    drop(root);
    match Rc::try_unwrap(result) {
        Ok(cell) => Ok(cell.value),
        Err(shared) => Ok(shared.value.clone()),
    }
}

/// Errors produced while evaluating a query against a value.
///
/// Queries are not validated ahead of time; an ill-fitting query surfaces
/// here, when it meets real data.
#[derive(Debug, Clone)]
pub enum EvalError {
    /// The value's runtime shape does not support the requested operation.
    Shape {
        wanted: &'static str,
        found: &'static str,
    },

    /// A lookup key's kind is unusable with the container it was applied to.
    KeyType {
        key: &'static str,
        container: String,
    },

    /// A normalized index fell outside the sequence bounds.
    IndexOutOfRange { index: i64, len: usize },

    /// A select predicate produced something other than a boolean.
    Predicate { found: &'static str },

    /// A named or positional sub-query failed; wraps the original error.
    Subquery { at: String, source: Box<EvalError> },

    /// A caller-supplied transform reported a failure.
    Transform(String),
}

impl EvalError {
    /// A transform failure carrying `message`, for use inside fallible
    /// transforms.
    pub fn transform(message: impl Into<String>) -> EvalError {
        EvalError::Transform(message.into())
    }

    fn named(name: &str, source: EvalError) -> EvalError {
        EvalError::Subquery {
            at: format!("\"{}\"", name),
            source: Box::new(source),
        }
    }

    fn element(index: usize, source: EvalError) -> EvalError {
        EvalError::Subquery {
            at: format!("element {}", index),
            source: Box::new(source),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::Shape { wanted, found } => {
                write!(f, "value of type {} is not {}", found, wanted)
            }
            EvalError::KeyType { key, container } => {
                write!(f, "{} key cannot be used with {}", key, container)
            }
            EvalError::IndexOutOfRange { index, len } => {
                write!(f, "index {} is out of range for 0..{}", index, len)
            }
            EvalError::Predicate { found } => {
                write!(f, "select predicate yielded {}, not boolean", found)
            }
            EvalError::Subquery { at, source } => {
                write!(f, "evaluating subquery {}: {}", at, source)
            }
            EvalError::Transform(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EvalError::Subquery { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Carries the current value through an evaluation, with a link to the value
/// it was produced from. Cells are per-evaluation and never outlive the
/// [`eval`] call that created them.
#[derive(Debug)]
struct Cell {
    value: Value,
    #[allow(dead_code)]
    parent: Option<Rc<Cell>>,
}

impl Cell {
    fn root(value: Value) -> Rc<Cell> {
        Rc::new(Cell {
            value,
            parent: None,
        })
    }

    fn push(parent: &Rc<Cell>, value: Value) -> Rc<Cell> {
        Rc::new(Cell {
            value,
            parent: Some(Rc::clone(parent)),
        })
    }
}

impl Query {
    fn eval_at(&self, at: &Rc<Cell>) -> Result<Rc<Cell>, EvalError> {
        match self {
            Query::This => Ok(Rc::clone(at)),

            Query::Const(value) => Ok(Cell::root(value.clone())),

            Query::Seq(steps) => {
                let mut current = Rc::clone(at);
                for step in steps {
                    current = step.eval_at(&current)?;
                }
                Ok(current)
            }

            Query::Key(key) => Ok(Cell::push(at, shape::lookup(&at.value, key)?)),

            Query::Each(sub) => {
                let mut results = Vec::new();
                for (i, elem) in shape::elements(&at.value)?.into_iter().enumerate() {
                    let cell = Cell::push(at, elem);
                    let next = sub
                        .eval_at(&cell)
                        .map_err(|e| EvalError::element(i, e))?;
                    results.push(next.value.clone());
                }
                Ok(Cell::push(at, Value::Seq(results)))
            }

            Query::Select(predicate) => {
                let mut kept = Vec::new();
                for (i, elem) in shape::elements(&at.value)?.into_iter().enumerate() {
                    let cell = Cell::push(at, elem.clone());
                    let verdict = predicate
                        .eval_at(&cell)
                        .map_err(|e| EvalError::element(i, e))?;
                    match verdict.value.as_boolean() {
                        // keep the element, not the predicate's result
                        Some(true) => kept.push(elem),
                        Some(false) => {}
                        None => {
                            return Err(EvalError::Predicate {
                                found: verdict.value.type_name(),
                            });
                        }
                    }
                }
                Ok(Cell::push(at, Value::Seq(kept)))
            }

            Query::Bind(bindings) => {
                let mut bound = Map::new(KeyKind::String);
                for (name, sub) in bindings {
                    let cell = sub
                        .eval_at(at)
                        .map_err(|e| EvalError::named(name, e))?;
                    bound.insert(name.as_str(), cell.value.clone());
                }
                Ok(Cell::push(at, Value::Map(bound)))
            }

            Query::Func(transform) => Ok(Cell::push(at, transform.apply(at.value.clone())?)),

            Query::Index(offset) => Ok(Cell::push(at, shape::element_at(&at.value, *offset)?)),

            Query::Or(candidates) => {
                for candidate in candidates {
                    if let Ok(cell) = candidate.eval_at(at) {
                        if !cell.value.is_null() {
                            return Ok(Cell::push(at, cell.value.clone()));
                        }
                    }
                }
                Ok(Cell::push(at, Value::Null))
            }

            Query::List(subs) => {
                let mut results = Vec::new();
                for (i, sub) in subs.iter().enumerate() {
                    let cell = sub.eval_at(at).map_err(|e| EvalError::element(i, e))?;
                    results.push(cell.value.clone());
                }
                Ok(Cell::push(at, Value::Seq(results)))
            }

            Query::Cat(subs) => {
                let mut results = Vec::new();
                for (i, sub) in subs.iter().enumerate() {
                    let cell = sub.eval_at(at).map_err(|e| EvalError::element(i, e))?;
                    match shape::as_seq(&cell.value) {
                        Some(items) => results.extend(items.iter().cloned()),
                        None => results.push(cell.value.clone()),
                    }
                }
                Ok(Cell::push(at, Value::Seq(results)))
            }

            Query::Compare(op, operand) => {
                let verdict = compare(*op, &at.value, operand)?;
                Ok(Cell::push(at, Value::Boolean(verdict)))
            }
        }
    }
}

fn compare(op: CmpOp, left: &Value, right: &Value) -> Result<bool, EvalError> {
    if let Value::Ref(inner) = left {
        return compare(op, inner, right);
    }
    if let Value::Ref(inner) = right {
        return compare(op, left, inner);
    }
    match op {
        CmpOp::Eq => Ok(equal(left, right)),
        CmpOp::Ne => Ok(!equal(left, right)),
        CmpOp::Lt => Ok(order(left, right)? == Ordering::Less),
        CmpOp::Le => Ok(order(left, right)? != Ordering::Greater),
        CmpOp::Gt => Ok(order(left, right)? == Ordering::Greater),
        CmpOp::Ge => Ok(order(left, right)? != Ordering::Less),
    }
}

fn equal(left: &Value, right: &Value) -> bool {
    match (numeric(left), numeric(right)) {
        (Some(a), Some(b)) => a == b,
        _ => left == right,
    }
}

fn order(left: &Value, right: &Value) -> Result<Ordering, EvalError> {
    if let (Some(a), Some(b)) = (numeric(left), numeric(right)) {
        return Ok(a.cmp(&b));
    }
    if let (Value::String(a), Value::String(b)) = (left, right) {
        return Ok(a.cmp(b));
    }
    Err(EvalError::Shape {
        wanted: "orderable against the comparison operand",
        found: left.type_name(),
    })
}

// Exact mixed integer/float comparison; NaN and infinities have no decimal
// form and never order.
fn numeric(value: &Value) -> Option<Decimal> {
    match value {
        Value::Integer(n) => Decimal::from_i64(*n),
        Value::Float(n) => Decimal::from_f64(*n),
        _ => None,
    }
}
