//! # Navigation Stack
//!
//! Drives the selection engine repeatedly and turns its Descend/Ascend
//! outcomes into tree traversal.
//!
//! ```text
//! root list ──Descend(a)──▶ children(a) ──Descend(b)──▶ children(b)
//!    ▲                          ▲                           │
//!    └───────Ascend─────────────┴──────────Ascend───────────┘
//!
//! frames: []                 [(a, i)]                 [(a, i), (b, j)]
//! ```
//!
//! Each frame remembers the node that was descended into and the index that
//! was highlighted at the time. Sibling lists are recomputed on the way back
//! up, never cached; the root level is the only list kept for the whole
//! traversal.

use log::{debug, info, warn};

use super::error::BrowseError;
use super::listing::Tree;
use super::outcome::{Outcome, Selection};
use super::selector::{DEFAULT_MAX_VISIBLE_ROWS, SelectOptions, Selector};
use super::terminal::{Terminal, acknowledge};

struct Frame<I> {
    node: I,
    index: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Navigator {
    selector: Selector,
    max_visible_rows: u16,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Selector::default(), DEFAULT_MAX_VISIBLE_ROWS)
    }
}

impl Navigator {
    pub fn new(selector: Selector, max_visible_rows: u16) -> Self {
        Self {
            selector,
            max_visible_rows,
        }
    }

    /// Browse `tree` starting from `root`.
    ///
    /// Returns the confirmed node, or `None` once the user ascends from the
    /// root level.
    pub async fn traverse<T, R>(
        &self,
        terminal: &mut T,
        tree: &R,
        root: Vec<R::Item>,
        initial_index: usize,
    ) -> Result<Option<R::Item>, BrowseError>
    where
        T: Terminal + ?Sized,
        R: Tree + ?Sized,
    {
        let mut frames: Vec<Frame<R::Item>> = Vec::new();
        let mut listing = root.clone();
        let mut index = initial_index;

        loop {
            let options = SelectOptions {
                allow_navigation: true,
                max_visible_rows: self.max_visible_rows,
                initial_index: index,
            };
            let outcome = self.selector.run(terminal, tree, listing, &options).await?;

            match outcome {
                Outcome::Confirm(selection) => {
                    info!("Traversal confirmed at depth {}", frames.len());
                    return Ok(selection.value);
                }
                Outcome::Descend(selection) => {
                    let at = position_in_candidates(&selection);
                    let Some(node) = selection.value else {
                        listing = selection.candidates;
                        index = at;
                        continue;
                    };

                    match tree.expand(&node, &selection.candidates) {
                        Ok(children) => {
                            debug!(
                                "Descended to depth {} ({} children)",
                                frames.len() + 1,
                                children.len()
                            );
                            frames.push(Frame { node, index: at });
                            listing = children;
                            index = 0;
                        }
                        Err(err) => {
                            recover(terminal, tree, err)?;
                            listing = selection.candidates;
                            index = at;
                        }
                    }
                }
                Outcome::Ascend(selection) => {
                    let Some(frame) = frames.pop() else {
                        info!("Ascended past the root, ending traversal");
                        return Ok(None);
                    };

                    let restored = match frames.last() {
                        None => Ok(root.clone()),
                        Some(parent) => tree.collapse(&parent.node, &selection.candidates),
                    };

                    match restored {
                        Ok(siblings) => {
                            debug!("Ascended to depth {}", frames.len());
                            index = frame.index;
                            listing = siblings;
                        }
                        Err(err) => {
                            recover(terminal, tree, err)?;
                            frames.push(frame);
                            index = position_in_candidates(&selection);
                            listing = selection.candidates;
                        }
                    }
                }
            }
        }
    }
}

/// Where the highlighted value sits in the unfiltered candidates, so the
/// same node is highlighted when that list is shown again.
fn position_in_candidates<I: PartialEq>(selection: &Selection<I>) -> usize {
    selection
        .value
        .as_ref()
        .and_then(|value| selection.candidates.iter().position(|c| c == value))
        .or(selection.index)
        .unwrap_or(0)
}

/// Acknowledge a recoverable failure, or hand it back to the caller.
fn recover<T, R>(terminal: &mut T, tree: &R, error: BrowseError) -> Result<(), BrowseError>
where
    T: Terminal + ?Sized,
    R: Tree + ?Sized,
{
    match tree.recovery_notice(&error) {
        Some(notice) => {
            warn!("Recovering from {error}");
            acknowledge(terminal, &notice)?;
            Ok(())
        }
        None => Err(error),
    }
}
