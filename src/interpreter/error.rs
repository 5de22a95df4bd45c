use std::fmt;

use serde::{Deserialize, Serialize};

/// What went wrong. Every kind is terminal: the evaluator never retries or recovers.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
pub enum ErrorKind {
    /// numeric literal failed to parse or overflowed
    InvalidNumber,
    /// an evaluable list did not start with a symbol
    UnboundLeadingSymbol,
    UnknownFunction,
    ArityError,
    TypeError,
    /// `first` / `rest` on `{}`
    EmptyListError,
    DivisionByZero,
    /// checked i64 arithmetic failed
    Overflow,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct EvalError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EvalError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> EvalError { EvalError { kind, message: message.into() } }

    pub fn division_by_zero() -> EvalError { EvalError::new(ErrorKind::DivisionByZero, "Division by zero.") }

    pub fn overflow() -> EvalError { EvalError::new(ErrorKind::Overflow, "Integer overflow.") }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.message) }
}

/// Builds a `Value::Error` of the given kind with a formatted message.
#[macro_export]
macro_rules! eval_error {
    ($kind:ident, $($arg:tt)*) => (
        $crate::interpreter::Value::Error($crate::interpreter::EvalError::new(
            $crate::interpreter::ErrorKind::$kind,
            format!($($arg)*),
        ))
    )
}

/// Returns an error value from the enclosing function unless `$cond` holds.
/// Whatever the function owns (its argument list included) is dropped on the way out.
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $kind:ident, $($arg:tt)*) => (
        if !$cond {
            return $crate::eval_error!($kind, $($arg)*);
        }
    )
}
