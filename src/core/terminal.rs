//! # Terminal Port
//!
//! The primitive operations the selection engine needs from a terminal.
//! Rows and columns are zero-based. Every call returns `io::Result`; the
//! engine treats any failure as fatal and propagates it.
//!
//! The production adapter lives in `crate::tui`; tests drive the engine with
//! an in-memory screen (`crate::test_support::ScriptedTerminal`).

use serde::{Deserialize, Serialize};
use std::io;

/// A single keystroke, already decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Enter,
    Backspace,
    /// A literal character. Only printable characters edit the search buffer.
    Char(char),
    /// Anything the engine has no binding for (Esc, Tab, function keys, ...).
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
    Grey,
    DarkGrey,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
}

pub trait Terminal {
    /// Block until one keystroke is available.
    fn read_key(&mut self) -> io::Result<Key>;

    /// Write `text` at the cursor, advancing it.
    fn write(&mut self, text: &str) -> io::Result<()>;

    /// Write `text` and move the cursor to column 0 of the next row.
    fn write_line(&mut self, text: &str) -> io::Result<()>;

    /// Clear everything and move the cursor to the top-left corner.
    fn clear_screen(&mut self) -> io::Result<()>;

    fn cursor_row(&self) -> io::Result<u16>;
    fn set_cursor_row(&mut self, row: u16) -> io::Result<()>;
    fn cursor_column(&self) -> io::Result<u16>;
    fn set_cursor_column(&mut self, column: u16) -> io::Result<()>;
    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()>;

    fn window_width(&self) -> io::Result<u16>;

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()>;
    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()>;
    fn reset_colors(&mut self) -> io::Result<()>;
}

/// Show a blocking notice and wait for a single acknowledgement keystroke.
pub fn acknowledge<T: Terminal + ?Sized>(terminal: &mut T, message: &str) -> io::Result<()> {
    terminal.reset_colors()?;
    terminal.clear_screen()?;
    terminal.write_line(message)?;
    terminal.read_key()?;
    Ok(())
}
