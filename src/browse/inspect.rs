//! # Object Inspector
//!
//! Browse a value graph with the navigator. Values describe themselves
//! through [`Inspect`]; the inspector never assumes a particular
//! introspection mechanism.
//!
//! ```text
//! Null        → "Null"                      (informational)
//! Leaf        → "<text>"                    (informational)
//! Sequence    → "0. <summary>", ...         (each descendable)
//! Composite   → "<name> - <summary>", ...   (each descendable)
//! ```
//!
//! Nothing is selectable: a session only ends when the user ascends past the
//! root.

use async_trait::async_trait;
use log::info;
use std::marker::PhantomData;

use crate::core::config::DEFAULT_MAX_DEPTH;
use crate::core::error::BrowseError;
use crate::core::listing::{Listing, Tree, matches_query};
use crate::core::navigator::Navigator;
use crate::core::terminal::Terminal;

/// How a value presents itself to the inspector. Recomputed on every visit.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape<V> {
    Null,
    /// Strings and scalar values: shown, never entered.
    Leaf(String),
    Sequence(Vec<V>),
    /// Named fields in declaration order.
    Composite(Vec<(String, V)>),
}

/// Field-enumeration capability for inspectable values.
pub trait Inspect: Clone + PartialEq + Send + Sync + 'static {
    fn shape(&self) -> Shape<Self>;

    /// One-line description used in element and field entries.
    fn summary(&self) -> String;
}

fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

impl Inspect for serde_json::Value {
    fn shape(&self) -> Shape<Self> {
        use serde_json::Value;
        match self {
            Value::Null => Shape::Null,
            Value::Bool(b) => Shape::Leaf(b.to_string()),
            Value::Number(n) => Shape::Leaf(n.to_string()),
            Value::String(s) => Shape::Leaf(s.clone()),
            Value::Array(items) => Shape::Sequence(items.clone()),
            Value::Object(map) => Shape::Composite(
                map.iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            ),
        }
    }

    fn summary(&self) -> String {
        use serde_json::Value;
        match self {
            Value::Null => "null".to_string(),
            Value::String(s) => s.clone(),
            Value::Array(items) => format!("[{}]", count(items.len(), "item")),
            Value::Object(map) => format!("{{{}}}", count(map.len(), "field")),
            other => other.to_string(),
        }
    }
}

impl Inspect for toml::Value {
    fn shape(&self) -> Shape<Self> {
        use toml::Value;
        match self {
            Value::String(s) => Shape::Leaf(s.clone()),
            Value::Array(items) => Shape::Sequence(items.clone()),
            Value::Table(table) => Shape::Composite(
                table
                    .iter()
                    .map(|(name, value)| (name.clone(), value.clone()))
                    .collect(),
            ),
            other => Shape::Leaf(other.to_string()),
        }
    }

    fn summary(&self) -> String {
        use toml::Value;
        match self {
            Value::String(s) => s.clone(),
            Value::Array(items) => format!("[{}]", count(items.len(), "item")),
            Value::Table(table) => format!("{{{}}}", count(table.len(), "field")),
            other => other.to_string(),
        }
    }
}

/// One line of the inspector. `depth` is how many descents it takes to reach
/// the entry from the inspected root.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<V> {
    Info(String),
    /// `index` is the element's position in its sequence, kept when the
    /// list is filtered.
    Element { index: usize, value: V, depth: usize },
    Field { name: String, value: V, depth: usize },
}

/// Entries describing `value`, which sits `depth` descents below the root.
pub fn entries<V: Inspect>(value: &V, depth: usize) -> Vec<Entry<V>> {
    let depth = depth + 1;
    match value.shape() {
        Shape::Null => vec![Entry::Info("Null".to_string())],
        Shape::Leaf(text) => vec![Entry::Info(text)],
        Shape::Sequence(items) if items.is_empty() => vec![Entry::Info("Empty".to_string())],
        Shape::Sequence(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| Entry::Element { index, value, depth })
            .collect(),
        Shape::Composite(fields) if fields.is_empty() => vec![Entry::Info("Empty".to_string())],
        Shape::Composite(fields) => fields
            .into_iter()
            .map(|(name, value)| Entry::Field { name, value, depth })
            .collect(),
    }
}

/// Inspector policies for the navigator.
pub struct Inspector<V> {
    max_depth: usize,
    _values: PhantomData<fn() -> V>,
}

impl<V: Inspect> Default for Inspector<V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl<V: Inspect> Inspector<V> {
    /// Entries deeper than `max_depth` cannot be entered, which bounds
    /// traversal of self-referencing graphs.
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            _values: PhantomData,
        }
    }

    /// Browse `value` until the user ascends past the root.
    pub async fn inspect<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        navigator: &Navigator,
        value: &V,
    ) -> Result<(), BrowseError> {
        let root = entries(value, 0);
        info!("Inspecting value with {} root entries", root.len());
        navigator.traverse(terminal, self, root, 0).await?;
        Ok(())
    }

    fn children(&self, entry: &Entry<V>) -> Vec<Entry<V>> {
        match entry {
            Entry::Info(_) => Vec::new(),
            Entry::Element { value, depth, .. } | Entry::Field { value, depth, .. } => {
                entries(value, *depth)
            }
        }
    }
}

#[async_trait]
impl<V: Inspect> Listing for Inspector<V> {
    type Item = Entry<V>;

    async fn filter(&self, query: &str, candidates: &[Entry<V>]) -> Vec<Entry<V>> {
        candidates
            .iter()
            .filter(|entry| match entry {
                Entry::Info(text) => matches_query(text, query),
                Entry::Element { value, .. } => matches_query(&value.summary(), query),
                Entry::Field { name, .. } => matches_query(name, query),
            })
            .cloned()
            .collect()
    }

    fn format(&self, item: &Entry<V>, _index: usize) -> String {
        match item {
            Entry::Info(text) => text.clone(),
            Entry::Element { index, value, .. } => format!("{index}. {}", value.summary()),
            Entry::Field { name, value, .. } => format!("{name} - {}", value.summary()),
        }
    }

    fn can_select(&self, _item: &Entry<V>) -> bool {
        false
    }

    fn can_descend(&self, item: &Entry<V>) -> bool {
        match item {
            Entry::Info(_) => false,
            Entry::Element { depth, .. } | Entry::Field { depth, .. } => *depth < self.max_depth,
        }
    }
}

impl<V: Inspect> Tree for Inspector<V> {
    fn expand(
        &self,
        node: &Entry<V>,
        _siblings: &[Entry<V>],
    ) -> Result<Vec<Entry<V>>, BrowseError> {
        Ok(self.children(node))
    }

    fn collapse(
        &self,
        parent: &Entry<V>,
        _siblings: &[Entry<V>],
    ) -> Result<Vec<Entry<V>>, BrowseError> {
        Ok(self.children(parent))
    }
}
