//! An interpreter for a small Lisp with two list forms: `( ... )` is applied when
//! evaluated, `{ ... }` stays data until passed to `eval`.
//!
//! ```text
//! + 1 (* 2 3)          => 7
//! first {1 2 3}        => {1}
//! eval (conj {+ 1} {2}) => 3
//! ```

pub mod interpreter;
pub mod reader;
