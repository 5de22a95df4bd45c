pub mod builtin;
pub mod error;
pub mod evaluator;
pub mod json;
pub mod list;
pub mod read;
pub mod value;


pub use builtin::{Builtin, Op, BUILTINS};
pub use error::{ErrorKind, EvalError};
pub use evaluator::eval;
pub use list::List;
pub use read::read;
pub use value::Value;

use crate::reader::{parser, AstNode, ReadError};

pub fn parse_code(src: &str) -> Result<AstNode, ReadError> { parser::parse(src) }

/// Reads and reduces an already parsed tree.
pub fn run(node: &AstNode) -> Value { eval(read(node)) }

/// Parses and evaluates one line. Evaluation failures come back as `Ok(Value::Error(_))`;
/// only text that does not match the grammar is an `Err`.
pub fn execute(src: &str) -> Result<Value, ReadError> {
    let ast = parse_code(src)?;
    Ok(run(&ast))
}
