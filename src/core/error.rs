use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors that can end or interrupt a browsing session.
///
/// Empty result sets and the user backing out of the root are not errors;
/// they surface as `Ok` values.
#[derive(Debug)]
pub enum BrowseError {
    /// The OS refused to enumerate a directory. Recoverable below the root.
    AccessDenied(PathBuf),
    /// Any other enumeration failure (missing path, I/O error). Not recoverable.
    Enumeration { path: PathBuf, source: io::Error },
    /// The terminal port failed, or the user interrupted with Ctrl+C.
    Terminal(io::Error),
}

impl BrowseError {
    /// Classify an enumeration failure for `path`.
    pub fn from_enumeration(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            BrowseError::AccessDenied(path)
        } else {
            BrowseError::Enumeration { path, source }
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, BrowseError::AccessDenied(_))
    }
}

impl fmt::Display for BrowseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowseError::AccessDenied(path) => write!(f, "access denied: {}", path.display()),
            BrowseError::Enumeration { path, source } => {
                write!(f, "failed to enumerate {}: {source}", path.display())
            }
            BrowseError::Terminal(e) => write!(f, "terminal error: {e}"),
        }
    }
}

impl std::error::Error for BrowseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowseError::AccessDenied(_) => None,
            BrowseError::Enumeration { source, .. } => Some(source),
            BrowseError::Terminal(e) => Some(e),
        }
    }
}

impl From<io::Error> for BrowseError {
    fn from(e: io::Error) -> Self {
        BrowseError::Terminal(e)
    }
}
