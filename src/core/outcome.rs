//! # Outcomes
//!
//! Every activation of the selection engine ends in exactly one `Outcome`.
//! The navigator turns these into tree traversal:
//!
//! ```text
//! Descend  →  push frame, show children
//! Ascend   →  pop frame, show siblings again (or leave past the root)
//! Confirm  →  done, hand the value back
//! ```

/// What the user was looking at when an outcome fired.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    /// The highlighted candidate. `None` when the filtered list was empty
    /// or the cursor sat on the search line.
    pub value: Option<T>,
    /// Position of `value` in the filtered list.
    pub index: Option<usize>,
    /// The full, unfiltered candidate set of the activation.
    pub candidates: Vec<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ascend(Selection<T>),
    Descend(Selection<T>),
    Confirm(Selection<T>),
}

impl<T> Outcome<T> {
    pub fn selection(&self) -> &Selection<T> {
        match self {
            Outcome::Ascend(s) | Outcome::Descend(s) | Outcome::Confirm(s) => s,
        }
    }

    pub fn into_selection(self) -> Selection<T> {
        match self {
            Outcome::Ascend(s) | Outcome::Descend(s) | Outcome::Confirm(s) => s,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Ascend(_) => "ascend",
            Outcome::Descend(_) => "descend",
            Outcome::Confirm(_) => "confirm",
        }
    }
}
