use crate::eval_error;
use crate::interpreter::{List, Value};
use crate::reader::AstNode;

/// Shapes a syntax tree into a value tree. Nothing is evaluated here; a bad number
/// literal becomes an embedded error that surfaces once the evaluator reaches it.
pub fn read(node: &AstNode) -> Value {
    if node.tag.contains("number") {
        return read_number(&node.contents);
    }
    if node.tag.contains("symbol") {
        return Value::symbol(node.contents.as_str());
    }
    if node.tag.contains("qexpr") {
        return Value::qexpr(read_cells(node));
    }
    // root, sexpr or any other grouping node
    Value::sexpr(read_cells(node))
}

fn read_number(text: &str) -> Value {
    match text.parse::<i64>() {
        Ok(n) => Value::number(n),
        Err(_) => eval_error!(InvalidNumber, "Invalid number"),
    }
}

fn read_cells(node: &AstNode) -> List {
    node.children
        .iter()
        .filter(|child| !is_structural(child))
        .map(read)
        .fold(List::new(), List::append)
}

fn is_structural(node: &AstNode) -> bool { matches!(node.contents.as_str(), "(" | ")" | "{" | "}") || node.tag == "regex" }
