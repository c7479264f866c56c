//! # Filesystem Browser
//!
//! Browse directories (directory mode) or directories plus files matching a
//! glob pattern (file mode) with the navigator.
//!
//! Listing order is fixed: directories first, then files, each group
//! ascending by full path.
//!
//! Failure policy:
//! - anything that fails while building the root level propagates before the
//!   terminal is touched
//! - `AccessDenied` below the root shows a notice, waits for one key and keeps
//!   the user where they were

use async_trait::async_trait;
use glob::Pattern;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::BrowseMode;
use crate::core::error::BrowseError;
use crate::core::listing::{Listing, Tree, matches_query};
use crate::core::navigator::Navigator;
use crate::core::terminal::Terminal;

pub const ACCESS_DENIED_NOTICE: &str =
    "Access Denied. Press any key to return to parent directory...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// Directory enumeration port.
pub trait Enumerate: Send + Sync {
    /// Immediate subdirectories of `path`, in any order.
    fn subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>, BrowseError>;

    /// Immediate files of `path` whose file name matches `pattern`, in any order.
    fn files(&self, path: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, BrowseError>;

    fn parent(&self, path: &Path) -> Option<PathBuf>;

    /// `None` when nothing exists at `path`.
    fn kind(&self, path: &Path) -> Option<EntryKind>;
}

/// The real filesystem via `std::fs`. Symlinks are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl StdFs {
    fn entries(path: &Path) -> Result<Vec<PathBuf>, BrowseError> {
        let read = fs::read_dir(path).map_err(|e| BrowseError::from_enumeration(path, e))?;
        read.map(|entry| {
            entry
                .map(|e| e.path())
                .map_err(|e| BrowseError::from_enumeration(path, e))
        })
        .collect()
    }
}

impl Enumerate for StdFs {
    fn subdirectories(&self, path: &Path) -> Result<Vec<PathBuf>, BrowseError> {
        Ok(Self::entries(path)?
            .into_iter()
            .filter(|p| p.is_dir())
            .collect())
    }

    fn files(&self, path: &Path, pattern: &Pattern) -> Result<Vec<PathBuf>, BrowseError> {
        Ok(Self::entries(path)?
            .into_iter()
            .filter(|p| p.is_file())
            .filter(|p| {
                p.file_name()
                    .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
            })
            .collect())
    }

    fn parent(&self, path: &Path) -> Option<PathBuf> {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
    }

    fn kind(&self, path: &Path) -> Option<EntryKind> {
        let meta = fs::metadata(path).ok()?;
        Some(if meta.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        })
    }
}

#[derive(Debug, Clone)]
enum Mode {
    Directories,
    Files(Pattern),
}

/// Filesystem policies for the navigator.
pub struct FsBrowser<E: Enumerate> {
    port: E,
    mode: Mode,
}

impl<E: Enumerate> FsBrowser<E> {
    /// Browse directories only; every directory can be chosen.
    pub fn directories(port: E) -> Self {
        Self {
            port,
            mode: Mode::Directories,
        }
    }

    /// Browse directories and the files matching `pattern`; only files can
    /// be chosen.
    pub fn files(port: E, pattern: Pattern) -> Self {
        Self {
            port,
            mode: Mode::Files(pattern),
        }
    }

    pub fn with_mode(port: E, mode: BrowseMode, pattern: Pattern) -> Self {
        match mode {
            BrowseMode::Directories => Self::directories(port),
            BrowseMode::Files => Self::files(port, pattern),
        }
    }

    /// Candidates of the root level for `path`.
    ///
    /// Directory mode starts from the directory itself; file mode starts
    /// from its children.
    pub fn root(&self, path: &Path) -> Result<Vec<PathBuf>, BrowseError> {
        if self.port.kind(path) != Some(EntryKind::Directory) {
            return Err(BrowseError::Enumeration {
                path: path.to_path_buf(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }
        match self.mode {
            Mode::Directories => Ok(vec![path.to_path_buf()]),
            Mode::Files(_) => self.children(path),
        }
    }

    /// Run a browsing session rooted at `path`.
    ///
    /// In file mode a file path opens its directory with the file
    /// highlighted.
    pub async fn browse<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        navigator: &Navigator,
        path: &Path,
    ) -> Result<Option<PathBuf>, BrowseError> {
        let (dir, focus) = self.starting_point(path);
        let root = self.root(&dir)?;
        let index = focus
            .and_then(|file| root.iter().position(|entry| *entry == file))
            .unwrap_or(0);

        info!("Browsing {} ({} root entries)", dir.display(), root.len());
        navigator.traverse(terminal, self, root, index).await
    }

    fn starting_point(&self, path: &Path) -> (PathBuf, Option<PathBuf>) {
        let is_file = self.port.kind(path) == Some(EntryKind::File);
        if let Mode::Files(_) = self.mode
            && is_file
            && let Some(dir) = self.port.parent(path)
        {
            return (dir, Some(path.to_path_buf()));
        }
        (path.to_path_buf(), None)
    }

    fn children(&self, dir: &Path) -> Result<Vec<PathBuf>, BrowseError> {
        let mut entries = self.port.subdirectories(dir)?;
        entries.sort();

        if let Mode::Files(pattern) = &self.mode {
            let mut files = self.port.files(dir, pattern)?;
            files.sort();
            entries.extend(files);
        }

        debug!("{} has {} entries", dir.display(), entries.len());
        Ok(entries)
    }
}

#[async_trait]
impl<E: Enumerate> Listing for FsBrowser<E> {
    type Item = PathBuf;

    async fn filter(&self, query: &str, candidates: &[PathBuf]) -> Vec<PathBuf> {
        candidates
            .iter()
            .filter(|p| matches_query(&p.display().to_string(), query))
            .cloned()
            .collect()
    }

    fn format(&self, item: &PathBuf, _index: usize) -> String {
        item.display().to_string()
    }

    fn can_select(&self, item: &PathBuf) -> bool {
        match self.mode {
            Mode::Directories => true,
            Mode::Files(_) => self.port.kind(item) == Some(EntryKind::File),
        }
    }

    fn can_descend(&self, item: &PathBuf) -> bool {
        match self.mode {
            Mode::Directories => true,
            Mode::Files(_) => self.port.kind(item) == Some(EntryKind::Directory),
        }
    }
}

impl<E: Enumerate> Tree for FsBrowser<E> {
    fn expand(&self, node: &PathBuf, _siblings: &[PathBuf]) -> Result<Vec<PathBuf>, BrowseError> {
        self.children(node)
    }

    fn collapse(
        &self,
        parent: &PathBuf,
        _siblings: &[PathBuf],
    ) -> Result<Vec<PathBuf>, BrowseError> {
        self.children(parent)
    }

    fn recovery_notice(&self, error: &BrowseError) -> Option<String> {
        error
            .is_access_denied()
            .then(|| ACCESS_DENIED_NOTICE.to_string())
    }
}
