use tracing::{debug, trace};

use crate::eval_error;
use crate::interpreter::{builtin, List, Value};

/// Reduces a value. Everything but an S-expression is already reduced.
pub fn eval(value: Value) -> Value {
    match value {
        Value::Sexpr(list) => eval_sexpr(list),
        _ => value,
    }
}

fn eval_sexpr(list: List) -> Value {
    let mut cells: List = list.into_iter().map(eval).collect();
    trace!("eval sexpr / cells {:?}", cells);

    // the leftmost error wins and everything else in the list is dropped
    if let Some(index) = cells.iter().position(Value::is_error) {
        let error = cells.take_at(index);
        debug!("eval sexpr / short-circuit on {:?}", error);
        return error;
    }

    match cells.len() {
        0 => Value::Sexpr(cells),
        1 => cells.take_at(0),
        _ => match cells.remove_at(0) {
            Value::Symbol(name) => {
                debug!("eval sexpr / call {} with {} args", name, cells.len());
                builtin::call(&name, cells)
            }
            head => {
                debug!("eval sexpr / head {:?} is not a symbol", head);
                eval_error!(UnboundLeadingSymbol, "S-Expression does not start with symbol.")
            }
        },
    }
}
