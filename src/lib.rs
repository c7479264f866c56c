//! Burrow: interactive terminal selection, navigation and browsing.

use clap::ValueEnum;

pub mod browse;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// What the filesystem browser lists and lets the user choose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum BrowseMode {
    /// Directories only; any directory can be chosen.
    #[default]
    Directories,
    /// Directories and matching files; only files can be chosen.
    Files,
}
