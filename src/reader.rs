//! Text to generic syntax tree.
//!
//! The tree mirrors what a grammar-combinator parser hands back: every node carries
//! the rule tag it matched, its literal text and its children, delimiters included.
//! Turning that tree into values is the interpreter's job.

pub mod parser;

use std::fmt;

pub use parser::{parse, AstNode, MAX_PARSE_DEPTH};

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ReadError {
    pub message: String,
    /// byte offset into the source
    pub offset: usize,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "ReadError at {}: {}", self.offset, self.message) }
}

impl std::error::Error for ReadError {}
