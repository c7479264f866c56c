//! # Browsers
//!
//! Ready-made [`Tree`](crate::core::listing::Tree) implementations:
//!
//! - [`fs`]: directories and files through an enumeration port
//! - [`inspect`]: value graphs through the [`inspect::Inspect`] capability

pub mod fs;
pub mod inspect;
