use std::fmt;

use serde::{Deserialize, Serialize};

use crate::interpreter::{EvalError, List};

/// A node of the expression tree.
///
/// Not `Clone`. A value lives in exactly one place (the evaluator's working value or
/// one slot of a list) and only ever moves; dropping it frees everything it owns.
#[derive(PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum Value {
    Number(i64),
    Error(EvalError),
    Symbol(String),

    /// `( ... )`, applied when evaluated
    Sexpr(List),
    /// `{ ... }`, data until handed to `eval`
    Qexpr(List),
}

impl Value {
    pub fn number(n: i64) -> Value { Value::Number(n) }

    pub fn error(error: EvalError) -> Value { Value::Error(error) }

    pub fn symbol(name: impl Into<String>) -> Value { Value::Symbol(name.into()) }

    /// `Value::sexpr(List::new())` is the empty evaluable list.
    pub fn sexpr(cells: impl Into<List>) -> Value { Value::Sexpr(cells.into()) }

    pub fn qexpr(cells: impl Into<List>) -> Value { Value::Qexpr(cells.into()) }

    pub fn is_error(&self) -> bool { matches!(self, Value::Error(_)) }

    pub fn into_number(self) -> Option<i64> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn into_qexpr(self) -> Option<List> {
        match self {
            Value::Qexpr(list) => Some(list),
            _ => None,
        }
    }

    /// Name used in type error messages.
    pub fn type_name(&self) -> &'static str {
        match *self {
            Value::Number(_) => "Number",
            Value::Error(_) => "Error",
            Value::Symbol(_) => "Symbol",
            Value::Sexpr(_) => "S-Expression",
            Value::Qexpr(_) => "Q-Expression",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Number(val) => write!(f, "{}", val),
            Value::Error(ref err) => write!(f, "Error: {}", err),
            Value::Symbol(ref name) => write!(f, "{}", name),
            Value::Sexpr(ref list) => list.fmt_cells(f, '(', ')'),
            Value::Qexpr(ref list) => list.fmt_cells(f, '{', '}'),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Error(ref err) => write!(f, "Error({:?}: {:?})", err.kind, err.message),
            _ => write!(f, "{}", self),
        }
    }
}
