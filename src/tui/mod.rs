//! # TUI Adapter
//!
//! The crossterm implementation of the terminal port. This is the only
//! module that knows about crossterm.
//!
//! ## Cursor Tracking
//!
//! The engine asks for the cursor row after every clear. Querying the real
//! terminal for it is a round trip through stdin, so the adapter keeps a
//! shadow cursor instead: every write advances it the way the terminal wraps
//! text, and every move sets it.

mod event;

use log::info;
use std::io::{self, Stdout, Write, stdout};

use crossterm::cursor::{Hide, MoveTo, MoveToColumn, MoveToNextLine, MoveToRow, Show};
use crossterm::style::{self, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self as term, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use unicode_width::UnicodeWidthChar;

use crate::core::terminal::{Color, Key, Terminal};

/// Raw mode on an alternate screen for as long as it lives.
struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        term::enable_raw_mode()?;
        if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
            let _ = term::disable_raw_mode();
            return Err(e);
        }
        info!("Terminal modes enabled (raw, alternate screen)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), ResetColor, Show, LeaveAlternateScreen);
        let _ = term::disable_raw_mode();
    }
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Black => style::Color::Black,
        Color::White => style::Color::White,
        Color::Grey => style::Color::Grey,
        Color::DarkGrey => style::Color::DarkGrey,
        Color::Red => style::Color::Red,
        Color::Green => style::Color::Green,
        Color::Yellow => style::Color::Yellow,
        Color::Blue => style::Color::Blue,
        Color::Magenta => style::Color::Magenta,
        Color::Cyan => style::Color::Cyan,
    }
}

/// The real terminal. The screen is restored when this is dropped.
pub struct CrosstermTerminal {
    out: Stdout,
    row: u16,
    column: u16,
    _mode: TerminalModeGuard,
}

impl CrosstermTerminal {
    pub fn open() -> io::Result<Self> {
        let mode = TerminalModeGuard::new()?;
        let mut out = stdout();
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        Ok(Self {
            out,
            row: 0,
            column: 0,
            _mode: mode,
        })
    }

    pub fn window_height(&self) -> io::Result<u16> {
        term::size().map(|(_, rows)| rows)
    }

    /// Advance the shadow cursor over `text` as the terminal would.
    fn advance(&mut self, text: &str) -> io::Result<()> {
        let (width, height) = term::size()?;
        let bottom = height.saturating_sub(1);
        for ch in text.chars() {
            if ch == '\n' {
                self.row = (self.row + 1).min(bottom);
                self.column = 0;
                continue;
            }
            let w = ch.width().unwrap_or(0) as u16;
            if self.column + w > width {
                self.row = (self.row + 1).min(bottom);
                self.column = 0;
            }
            self.column += w;
        }
        Ok(())
    }
}

impl Terminal for CrosstermTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        self.out.flush()?;
        event::read_key()
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        // Raw mode does not return the carriage on a bare line feed
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                queue!(self.out, MoveToNextLine(1))?;
            }
            queue!(self.out, Print(line))?;
        }
        self.advance(text)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        execute!(self.out, Clear(ClearType::All), MoveTo(0, 0))?;
        self.row = 0;
        self.column = 0;
        Ok(())
    }

    fn cursor_row(&self) -> io::Result<u16> {
        Ok(self.row)
    }

    fn set_cursor_row(&mut self, row: u16) -> io::Result<()> {
        queue!(self.out, MoveToRow(row))?;
        self.row = row;
        Ok(())
    }

    fn cursor_column(&self) -> io::Result<u16> {
        Ok(self.column)
    }

    fn set_cursor_column(&mut self, column: u16) -> io::Result<()> {
        queue!(self.out, MoveToColumn(column))?;
        self.column = column;
        Ok(())
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(column, row))?;
        self.row = row;
        self.column = column;
        Ok(())
    }

    fn window_width(&self) -> io::Result<u16> {
        term::size().map(|(columns, _)| columns)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, Show)
        } else {
            queue!(self.out, Hide)
        }
    }

    fn set_colors(&mut self, foreground: Color, background: Color) -> io::Result<()> {
        queue!(
            self.out,
            SetForegroundColor(to_crossterm(foreground)),
            SetBackgroundColor(to_crossterm(background))
        )
    }

    fn reset_colors(&mut self) -> io::Result<()> {
        queue!(self.out, ResetColor)
    }
}
