use std::fmt;
use std::slice;
use std::vec;

use serde::{Deserialize, Serialize};

use crate::interpreter::Value;

/// Cell storage shared by `Value::Sexpr` and `Value::Qexpr`.
///
/// Moving a `List` from one variant to the other never touches its cells. Every
/// mutation moves values in or out; nothing is copied.
#[derive(PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct List {
    cells: Vec<Value>,
}

impl List {
    pub fn new() -> List { List { cells: Vec::new() } }

    pub fn from_vec(cells: Vec<Value>) -> List { List { cells } }

    pub fn len(&self) -> usize { self.cells.len() }

    pub fn is_empty(&self) -> bool { self.cells.is_empty() }

    pub fn iter(&self) -> slice::Iter<'_, Value> { self.cells.iter() }

    /// (a b) + c => (a b c)
    pub fn append(mut self, value: Value) -> List {
        self.cells.push(value);
        self
    }

    /// Moves the cell at `index` out, shifting the later cells down by one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove_at(&mut self, index: usize) -> Value { self.cells.remove(index) }

    /// `remove_at` for a list that is not needed afterwards: the other cells are dropped with it.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn take_at(mut self, index: usize) -> Value { self.remove_at(index) }

    /// Moves every cell of `other` to the end of `self`, then drops the emptied `other`.
    pub fn join(mut self, mut other: List) -> List {
        self.cells.append(&mut other.cells);
        self
    }

    /// Drops every cell after the first `len`.
    pub fn truncate(&mut self, len: usize) { self.cells.truncate(len) }

    pub fn into_vec(self) -> Vec<Value> { self.cells }

    pub(crate) fn fmt_cells(&self, f: &mut fmt::Formatter, open: char, close: char) -> fmt::Result {
        write!(f, "{}", open)?;
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", cell)?;
        }
        write!(f, "{}", close)
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter { self.cells.into_iter() }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter { self.cells.iter() }
}

impl From<Vec<Value>> for List {
    fn from(cells: Vec<Value>) -> Self { List::from_vec(cells) }
}

impl FromIterator<Value> for List {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self { List::from_vec(iter.into_iter().collect()) }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { f.debug_list().entries(self.cells.iter()).finish() }
}
