//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use async_trait::async_trait;
use glob::Pattern;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::browse::fs::{ACCESS_DENIED_NOTICE, Enumerate, EntryKind};
use crate::core::error::BrowseError;
use crate::core::listing::{Listing, Tree, matches_query};
use crate::core::terminal::{Color, Key, Terminal};

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Keystrokes for typing `text` into the search line.
pub fn typed(text: &str) -> Vec<Key> {
    text.chars().map(Key::Char).collect()
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    ch: char,
    inverted: bool,
}

impl Cell {
    const BLANK: Cell = Cell {
        ch: ' ',
        inverted: false,
    };
}

/// An in-memory screen fed from a fixed key script.
///
/// Text wraps at the window width. Cells written while colors are set are
/// marked inverted. Reading past the end of the script fails with
/// `UnexpectedEof`, which ends any session that is still waiting for input.
pub struct ScriptedTerminal {
    width: u16,
    keys: VecDeque<Key>,
    grid: Vec<Vec<Cell>>,
    row: u16,
    column: u16,
    colors: Option<(Color, Color)>,
    last_colors: Option<(Color, Color)>,
    cursor_visible: bool,
    clears: usize,
    transcript: String,
}

impl ScriptedTerminal {
    pub fn new(width: u16, keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            width,
            keys: keys.into_iter().collect(),
            grid: Vec::new(),
            row: 0,
            column: 0,
            colors: None,
            last_colors: None,
            cursor_visible: true,
            clears: 0,
            transcript: String::new(),
        }
    }

    /// Text on `row`, without trailing blanks.
    pub fn line(&self, row: u16) -> String {
        self.grid
            .get(row as usize)
            .map(|cells| {
                let text: String = cells.iter().map(|c| c.ch).collect();
                text.trim_end().to_string()
            })
            .unwrap_or_default()
    }

    /// Rows holding at least one cell drawn in highlight colors.
    pub fn inverted_rows(&self) -> Vec<u16> {
        self.grid
            .iter()
            .enumerate()
            .filter(|(_, cells)| cells.iter().any(|c| c.inverted))
            .map(|(row, _)| row as u16)
            .collect()
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Colors currently in effect.
    pub fn colors(&self) -> Option<(Color, Color)> {
        self.colors
    }

    /// Colors passed to the most recent `set_colors` call.
    pub fn last_colors(&self) -> Option<(Color, Color)> {
        self.last_colors
    }

    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }

    /// Everything ever written, clears notwithstanding.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    fn put(&mut self, ch: char) {
        if self.column >= self.width {
            self.row += 1;
            self.column = 0;
        }
        let (row, column) = (self.row as usize, self.column as usize);
        if self.grid.len() <= row {
            self.grid.resize(row + 1, Vec::new());
        }
        let cells = &mut self.grid[row];
        if cells.len() <= column {
            cells.resize(column + 1, Cell::BLANK);
        }
        cells[column] = Cell {
            ch,
            inverted: self.colors.is_some(),
        };
        self.column += 1;
    }
}

impl Terminal for ScriptedTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted"))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        for ch in text.chars() {
            match ch {
                '\n' => {
                    self.row += 1;
                    self.column = 0;
                }
                '\r' => self.column = 0,
                _ => self.put(ch),
            }
        }
        Ok(())
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.grid.clear();
        self.row = 0;
        self.column = 0;
        self.clears += 1;
        Ok(())
    }

    fn cursor_row(&self) -> io::Result<u16> {
        Ok(self.row)
    }

    fn set_cursor_row(&mut self, row: u16) -> io::Result<()> {
        self.row = row;
        Ok(())
    }

    fn cursor_column(&self) -> io::Result<u16> {
        Ok(self.column)
    }

    fn set_cursor_column(&mut self, column: u16) -> io::Result<()> {
        self.column = column;
        Ok(())
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.column = column;
        self.row = row;
        Ok(())
    }

    fn window_width(&self) -> io::Result<u16> {
        Ok(self.width)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()> {
        self.colors = Some((foreground, background));
        self.last_colors = self.colors;
        Ok(())
    }

    fn reset_colors(&mut self) -> io::Result<()> {
        self.colors = None;
        Ok(())
    }
}

/// A string listing with swappable gates that records every filter call as
/// `(query, number of candidates received)`.
pub struct TestListing {
    pub selectable: fn(&String) -> bool,
    pub descendable: fn(&String) -> bool,
    pub queries: Mutex<Vec<(String, usize)>>,
}

impl Default for TestListing {
    fn default() -> Self {
        Self {
            selectable: |_| true,
            descendable: |_| false,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl TestListing {
    pub fn queries(&self) -> Vec<(String, usize)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl Listing for TestListing {
    type Item = String;

    async fn filter(&self, query: &str, candidates: &[String]) -> Vec<String> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), candidates.len()));
        candidates
            .iter()
            .filter(|c| matches_query(c, query))
            .cloned()
            .collect()
    }

    fn format(&self, item: &String, _index: usize) -> String {
        item.clone()
    }

    fn can_select(&self, item: &String) -> bool {
        (self.selectable)(item)
    }

    fn can_descend(&self, item: &String) -> bool {
        (self.descendable)(item)
    }
}

/// A tree of string nodes. Nodes with children (or a scripted failure) are
/// descendable; every other node is a selectable leaf.
#[derive(Default)]
pub struct MapTree {
    children: HashMap<String, Vec<String>>,
    denied_expand: HashSet<String>,
    denied_collapse: HashSet<String>,
    broken_expand: HashSet<String>,
    collapsed: Mutex<Vec<String>>,
}

impl MapTree {
    pub fn with(mut self, node: &str, children: &[&str]) -> Self {
        self.children.insert(node.to_string(), strings(children));
        self
    }

    pub fn deny_expand(mut self, node: &str) -> Self {
        self.denied_expand.insert(node.to_string());
        self
    }

    pub fn deny_collapse(mut self, node: &str) -> Self {
        self.denied_collapse.insert(node.to_string());
        self
    }

    /// Expanding `node` fails with an error that has no recovery notice.
    pub fn break_expand(mut self, node: &str) -> Self {
        self.broken_expand.insert(node.to_string());
        self
    }

    /// Parents passed to `collapse`, in call order.
    pub fn collapsed(&self) -> Vec<String> {
        self.collapsed.lock().unwrap().clone()
    }

    fn children_of(&self, node: &str) -> Vec<String> {
        self.children.get(node).cloned().unwrap_or_default()
    }
}

#[async_trait]
impl Listing for MapTree {
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

    fn can_select(&self, item: &String) -> bool {
        !self.can_descend(item)
    }

    fn can_descend(&self, item: &String) -> bool {
        self.children.contains_key(item)
            || self.denied_expand.contains(item)
            || self.broken_expand.contains(item)
    }
}

impl Tree for MapTree {
    fn expand(&self, node: &String, _siblings: &[String]) -> Result<Vec<String>, BrowseError> {
        if self.broken_expand.contains(node) {
            return Err(BrowseError::Enumeration {
                path: PathBuf::from(node),
                source: io::Error::other("device went away"),
            });
        }
        if self.denied_expand.contains(node) {
            return Err(BrowseError::AccessDenied(PathBuf::from(node)));
        }
        Ok(self.children_of(node))
    }

    fn collapse(&self, parent: &String, _siblings: &[String]) -> Result<Vec<String>, BrowseError> {
        self.collapsed.lock().unwrap().push(parent.clone());
        if self.denied_collapse.contains(parent) {
            return Err(BrowseError::AccessDenied(PathBuf::from(parent)));
        }
        Ok(self.children_of(parent))
    }

    fn recovery_notice(&self, error: &BrowseError) -> Option<String> {
        error
            .is_access_denied()
            .then(|| ACCESS_DENIED_NOTICE.to_string())
    }
}

/// An in-memory directory tree. Denied directories still exist, but listing
/// them fails with `AccessDenied`.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    dirs: BTreeSet<PathBuf>,
    files: BTreeSet<PathBuf>,
    denied: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn dir(mut self, path: &str) -> Self {
        self.dirs.insert(PathBuf::from(path));
        self
    }

    pub fn file(mut self, path: &str) -> Self {
        self.files.insert(PathBuf::from(path));
        self
    }

    pub fn deny(mut self, path: &str) -> Self {
        self.denied.insert(PathBuf::from(path));
        self
    }

    fn check(&self, path: &Path) -> Result<(), BrowseError> {
        if self.denied.contains(path) {
            return Err(BrowseError::AccessDenied(path.to_path_buf()));
        }
        Ok(())
    }

    /// Immediate children of `path` from `set`, deliberately unsorted.
    fn children_in(set: &BTreeSet<PathBuf>, path: &Path) -> Vec<PathBuf> {
        set.iter()
            .rev()
            .filter(|p| p.parent() == Some(path))
            .cloned()
            .collect()
    }
}

impl Enumerate for MemoryFs {
    fn subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>, BrowseError> {
        self.check(path)?;
        Ok(Self::children_in(&self.dirs, path))
    }

    fn files(&self, path: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, BrowseError> {
        self.check(path)?;
        Ok(Self::children_in(&self.files, path)
            .into_iter()
            .filter(|p| {
                p.file_name()
                    .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
            })
            .collect())
    }

    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent().map(Path::to_path_buf)
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        if self.dirs.contains(path) {
            Some(EntryKind::Directory)
        } else if self.files.contains(path) {
            Some(EntryKind::File)
        } else {
            None
        }
    }
}
