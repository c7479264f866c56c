//! # Core Selection Logic
//!
//! The selection engine and the navigation stack. Knows nothing about any
//! specific terminal library or data source: both arrive through traits.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │          CORE           │
//!                    │      (this module)      │
//!                    │                         │
//!                    │  • Selector (one list)  │
//!                    │  • Navigator (a stack)  │
//!                    │  • Listing / Tree       │
//!                    │                         │
//!                    │   Terminal is a port.   │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │ Filesystem │      │   Object   │
//!     │  Adapter   │      │  Browser   │      │ Inspector  │
//!     │(crossterm) │      │  (Tree)    │      │  (Tree)    │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`selector`]: one interactive pass over a candidate list
//! - [`navigator`]: descend/ascend over a [`listing::Tree`]
//! - [`terminal`]: the terminal port and key model
//! - [`config`]: `~/.burrow/config.toml` and its override hierarchy

pub mod config;
pub mod error;
pub mod listing;
pub mod navigator;
pub mod outcome;
pub mod selector;
pub mod terminal;
