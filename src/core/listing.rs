//! # Listing Policies
//!
//! A `Listing` tells the selection engine how to filter, display and gate a
//! flat list of candidates. A `Tree` adds the two navigation policies the
//! navigator needs to turn that list into a browsable hierarchy.
//!
//! Specializations (filesystem browser, object inspector) are nothing more
//! than implementations of these two traits.

use async_trait::async_trait;

use super::error::BrowseError;

#[async_trait]
pub trait Listing: Send + Sync {
    type Item: Clone + PartialEq + Send + Sync;

    /// Return the candidates matching `query`.
    ///
    /// Always called with the original, unfiltered candidates of the current
    /// activation, never with the output of a previous call.
    async fn filter(&self, query: &str, candidates: &[Self::Item]) -> Vec<Self::Item>;

    /// Display text for `item` at `index` in the filtered list. May span
    /// several lines.
    fn format(&self, item: &Self::Item, index: usize) -> String;

    /// Whether Enter may confirm `item`.
    fn can_select(&self, item: &Self::Item) -> bool;

    /// Whether Right may descend into `item`.
    fn can_descend(&self, _item: &Self::Item) -> bool {
        false
    }
}

pub trait Tree: Listing {
    /// Children of `node`. `siblings` is the list `node` was chosen from.
    fn expand(
        &self,
        node: &Self::Item,
        siblings: &[Self::Item],
    ) -> Result<Vec<Self::Item>, BrowseError>;

    /// Recompute the list that contains the level being ascended from.
    /// `parent` is the node whose children that list is; `siblings` is the
    /// list the user is leaving.
    fn collapse(
        &self,
        parent: &Self::Item,
        siblings: &[Self::Item],
    ) -> Result<Vec<Self::Item>, BrowseError>;

    /// Notice to show when `error` should be acknowledged and survived
    /// instead of ending the traversal. `None` propagates the error.
    fn recovery_notice(&self, _error: &BrowseError) -> Option<String> {
        None
    }
}

/// Case-insensitive substring match, the matching rule every built-in
/// listing uses.
pub fn matches_query(text: &str, query: &str) -> bool {
    query.is_empty() || text.to_lowercase().contains(&query.to_lowercase())
}

/// A plain list of strings: filterable, every entry selectable, nothing
/// descendable.
#[derive(Debug, Clone, Default)]
pub struct TextList;

#[async_trait]
impl Listing for TextList {
    type Item = String;

    async fn filter(&self, query: &str, candidates: &[String]) -> Vec<String> {
        candidates
            .iter()
            .filter(|c| matches_query(c, query))
            .cloned()
            .collect()
    }

    fn format(&self, item: &String, _index: usize) -> String {
        item.clone()
    }

    fn can_select(&self, _item: &String) -> bool {
        true
    }
}
