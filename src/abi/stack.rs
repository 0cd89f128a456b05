//! Operand stack access.

use super::Raw;

/// The live call frame of raw 64-bit cells.
///
/// The embedding VM pre-populates it with the caller's arguments and drains
/// the pushed results afterwards.
pub trait Stack {
    fn push(&mut self, value: Raw);

    /// Pop the most recently pushed cell, or `None` when empty.
    fn pop(&mut self) -> Option<Raw>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A [`Stack`] backed by a vector.
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct SliceStack {
    cells: Vec<Raw>,
}

impl SliceStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cells: Vec::with_capacity(capacity),
        }
    }

    /// The cells from bottom to top.
    pub fn as_slice(&self) -> &[Raw] {
        &self.cells
    }

    /// Consume the stack, returning the cells from bottom to top.
    pub fn into_vec(self) -> Vec<Raw> {
        self.cells
    }
}

impl Stack for SliceStack {
    fn push(&mut self, value: Raw) {
        self.cells.push(value);
    }

    fn pop(&mut self) -> Option<Raw> {
        self.cells.pop()
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

impl From<Vec<Raw>> for SliceStack {
    fn from(cells: Vec<Raw>) -> Self {
        Self { cells }
    }
}
