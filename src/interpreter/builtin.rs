//! The fixed set of functions an S-expression can call.
//!
//! Each builtin takes ownership of its already evaluated arguments. On success they
//! are consumed into the result; on a failed check they are dropped along with the
//! function's frame, so either way the argument list is released exactly once.

use phf::phf_map;
use tracing::trace;

use crate::interpreter::{eval, EvalError, List, Value};
use crate::{ensure, eval_error};

macro_rules! try_or_return_error {
    ($inp:expr) => {
        match $inp {
            Ok(v) => v,
            Err(e) => return e,
        }
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Builtin {
    List,
    First,
    Rest,
    Eval,
    Conj,
    Arith(Op),
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

pub static BUILTINS: phf::Map<&'static str, Builtin> = phf_map! {
    "list" => Builtin::List,
    "first" => Builtin::First,
    "rest" => Builtin::Rest,
    "eval" => Builtin::Eval,
    "conj" => Builtin::Conj,
    "+" => Builtin::Arith(Op::Add),
    "-" => Builtin::Arith(Op::Sub),
    "*" => Builtin::Arith(Op::Mul),
    "/" => Builtin::Arith(Op::Div),
    "%" => Builtin::Arith(Op::Rem),
};

/// Looks `name` up and applies it to `args`.
pub fn call(name: &str, args: List) -> Value {
    match BUILTINS.get(name) {
        Some(builtin) => builtin.apply(args),
        None => eval_error!(UnknownFunction, "Unknown function!"),
    }
}

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::List => "list",
            Builtin::First => "first",
            Builtin::Rest => "rest",
            Builtin::Eval => "eval",
            Builtin::Conj => "conj",
            Builtin::Arith(op) => op.symbol(),
        }
    }

    pub fn apply(self, args: List) -> Value {
        trace!("apply {} / {:?}", self.name(), args);
        match self {
            Builtin::List => Value::Qexpr(args),
            Builtin::First => builtin_first(args),
            Builtin::Rest => builtin_rest(args),
            Builtin::Eval => builtin_eval(args),
            Builtin::Conj => builtin_conj(args),
            Builtin::Arith(op) => builtin_op(op, args),
        }
    }
}

impl Op {
    pub fn symbol(self) -> &'static str {
        match self {
            Op::Add => "+",
            Op::Sub => "-",
            Op::Mul => "*",
            Op::Div => "/",
            Op::Rem => "%",
        }
    }

    /// Division and remainder truncate toward zero, so `%` takes the dividend's sign.
    pub fn apply(self, x: i64, y: i64) -> Result<i64, EvalError> {
        let result = match self {
            Op::Add => x.checked_add(y),
            Op::Sub => x.checked_sub(y),
            Op::Mul => x.checked_mul(y),
            Op::Div | Op::Rem if y == 0 => return Err(EvalError::division_by_zero()),
            Op::Div => x.checked_div(y),
            Op::Rem => x.checked_rem(y),
        };
        result.ok_or_else(EvalError::overflow)
    }
}

/// Unpacks the single Q-expression argument of `first`, `rest` and `eval`.
fn single_qexpr(name: &str, args: List) -> Result<List, Value> {
    if args.len() != 1 {
        return Err(eval_error!(ArityError, "Function '{}' passed {} arguments, expected 1.", name, args.len()));
    }
    match args.take_at(0) {
        Value::Qexpr(list) => Ok(list),
        other => Err(eval_error!(TypeError, "Function '{}' passed {} for argument 1, expected Q-Expression.", name, other.type_name())),
    }
}

fn builtin_first(args: List) -> Value {
    let mut list = try_or_return_error!(single_qexpr("first", args));
    ensure!(!list.is_empty(), EmptyListError, "Function 'first' passed {{}}.");
    list.truncate(1);
    Value::Qexpr(list)
}

fn builtin_rest(args: List) -> Value {
    let mut list = try_or_return_error!(single_qexpr("rest", args));
    ensure!(!list.is_empty(), EmptyListError, "Function 'rest' passed {{}}.");
    list.remove_at(0);
    Value::Qexpr(list)
}

fn builtin_eval(args: List) -> Value {
    let list = try_or_return_error!(single_qexpr("eval", args));
    eval(Value::Sexpr(list))
}

fn builtin_conj(args: List) -> Value {
    ensure!(!args.is_empty(), ArityError, "Function 'conj' passed 0 arguments, expected at least 1.");
    if let Some((i, arg)) = args.iter().enumerate().find(|(_, arg)| !matches!(arg, Value::Qexpr(_))) {
        return eval_error!(TypeError, "Function 'conj' passed {} for argument {}, expected Q-Expression.", arg.type_name(), i + 1);
    }

    let mut lists = args.into_iter().filter_map(Value::into_qexpr);
    let first = lists.next().unwrap_or_default();
    Value::Qexpr(lists.fold(first, List::join))
}

fn builtin_op(op: Op, args: List) -> Value {
    ensure!(!args.is_empty(), ArityError, "Function '{}' passed 0 arguments, expected at least 1.", op.symbol());
    ensure!(args.iter().all(|arg| matches!(arg, Value::Number(_))), TypeError, "Cannot operate on non-number.");

    let numbers: Vec<i64> = args.into_iter().filter_map(Value::into_number).collect();
    let result = match (op, numbers.as_slice()) {
        (Op::Sub, [x]) => x.checked_neg().ok_or_else(EvalError::overflow),
        (_, [x, rest @ ..]) => rest.iter().try_fold(*x, |acc, &y| op.apply(acc, y)),
        (_, []) => return eval_error!(ArityError, "Function '{}' passed 0 arguments, expected at least 1.", op.symbol()),
    };
    match result {
        Ok(n) => Value::Number(n),
        Err(err) => Value::error(err),
    }
}
