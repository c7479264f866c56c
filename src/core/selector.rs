//! # Selection Engine
//!
//! One interactive pass over a flat candidate list: a search line at a fixed
//! anchor row, the filtered entries drawn below it, and a highlight moved by
//! direct cursor-row arithmetic.
//!
//! ```text
//! row anchor      │ search buffer▏
//! row anchor + 1  │ entry 0
//! row anchor + 2  │ entry 1 (line 1)       ← entries may span several rows
//! row anchor + 3  │ entry 1 (line 2)
//! row anchor + 4  │ entry 2                ← highlighted (inverted colors)
//!                 │ ...                    ← up to max_visible_rows rows
//! ```
//!
//! The highlight is always derived from the cursor row, and the cursor always
//! sits on the top row of the highlighted entry, or on the anchor row when
//! nothing is highlighted.

use log::debug;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::error::BrowseError;
use super::listing::Listing;
use super::outcome::{Outcome, Selection};
use super::terminal::{Color, Key, Terminal};

pub const DEFAULT_MAX_VISIBLE_ROWS: u16 = 100;

/// Colors used to draw the highlighted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub foreground: Color,
    pub background: Color,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            foreground: Color::Black,
            background: Color::White,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Whether Left/Right produce Ascend/Descend outcomes.
    pub allow_navigation: bool,
    /// Height of the entry window below the search line. Must be positive.
    pub max_visible_rows: u16,
    /// Entry highlighted before the first key is read (clamped).
    pub initial_index: usize,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            allow_navigation: false,
            max_visible_rows: DEFAULT_MAX_VISIBLE_ROWS,
            initial_index: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Selector {
    style: HighlightStyle,
}

impl Selector {
    pub fn new(style: HighlightStyle) -> Self {
        Self { style }
    }

    /// Run one activation until the user ascends, descends or confirms.
    ///
    /// Colors are reset and the cursor made visible on every exit path,
    /// including errors.
    pub async fn run<T, L>(
        &self,
        terminal: &mut T,
        listing: &L,
        candidates: Vec<L::Item>,
        options: &SelectOptions,
    ) -> Result<Outcome<L::Item>, BrowseError>
    where
        T: Terminal + ?Sized,
        L: Listing + ?Sized,
    {
        assert!(options.max_visible_rows > 0, "max_visible_rows must be positive");

        let mut guard = RestoreGuard(terminal);
        let mut session = Session::open(&mut *guard.0, listing, candidates, options, self.style)?;
        let outcome = session.drive().await?;
        debug!(
            "Selection ended with {} (index={:?})",
            outcome.label(),
            outcome.selection().index
        );
        Ok(outcome)
    }

    /// Flat selection without navigation: returns the confirmed candidate.
    pub async fn select<T, L>(
        &self,
        terminal: &mut T,
        listing: &L,
        candidates: Vec<L::Item>,
        max_visible_rows: u16,
    ) -> Result<Option<L::Item>, BrowseError>
    where
        T: Terminal + ?Sized,
        L: Listing + ?Sized,
    {
        let options = SelectOptions {
            allow_navigation: false,
            max_visible_rows,
            initial_index: 0,
        };
        match self.run(terminal, listing, candidates, &options).await? {
            Outcome::Confirm(selection) => Ok(selection.value),
            // Navigation is off, so only Confirm comes back.
            _ => Ok(None),
        }
    }
}

/// Resets colors and shows the cursor when the activation ends.
struct RestoreGuard<'a, T: Terminal + ?Sized>(&'a mut T);

impl<T: Terminal + ?Sized> Drop for RestoreGuard<'_, T> {
    fn drop(&mut self) {
        let _ = self.0.reset_colors();
        let _ = self.0.set_cursor_visible(true);
    }
}

/// A drawn entry and the number of rows it occupies.
struct Rendered<I> {
    item: I,
    rows: u16,
}

struct Session<'a, T: Terminal + ?Sized, L: Listing + ?Sized> {
    term: &'a mut T,
    listing: &'a L,
    /// The unfiltered candidates; every filter pass starts from these.
    candidates: Vec<L::Item>,
    style: HighlightStyle,
    allow_navigation: bool,
    max_rows: u16,
    width: u16,
    anchor: u16,
    search: String,
    visible: Vec<Rendered<L::Item>>,
    cursor: u16,
    highlight: Option<usize>,
}

impl<'a, T: Terminal + ?Sized, L: Listing + ?Sized> Session<'a, T, L> {
    fn open(
        term: &'a mut T,
        listing: &'a L,
        candidates: Vec<L::Item>,
        options: &SelectOptions,
        style: HighlightStyle,
    ) -> Result<Self, BrowseError> {
        term.clear_screen()?;
        let anchor = term.cursor_row()?;
        let width = term.window_width()?;

        let mut session = Self {
            term,
            listing,
            candidates,
            style,
            allow_navigation: options.allow_navigation,
            max_rows: options.max_visible_rows,
            width,
            anchor,
            search: String::new(),
            visible: Vec::new(),
            cursor: anchor,
            highlight: None,
        };

        session.draw_search_line()?;
        let initial = session.candidates.clone();
        session.render(initial)?;

        if !session.visible.is_empty() {
            let index = options.initial_index.min(session.visible.len() - 1);
            session.cursor = session.top_row(index);
            session.highlight_at_cursor()?;
        }

        Ok(session)
    }

    async fn drive(&mut self) -> Result<Outcome<L::Item>, BrowseError> {
        loop {
            match self.term.read_key()? {
                Key::Left => {
                    if self.allow_navigation {
                        return Ok(Outcome::Ascend(self.take_selection()));
                    }
                }
                Key::Right => {
                    if self.on_anchor() {
                        continue;
                    }
                    let descendable = self
                        .highlighted()
                        .is_some_and(|item| self.listing.can_descend(item));
                    if self.allow_navigation && descendable {
                        return Ok(Outcome::Descend(self.take_selection()));
                    }
                }
                Key::Enter => {
                    if self.on_anchor() {
                        continue;
                    }
                    if self.highlighted().is_some_and(|item| self.listing.can_select(item)) {
                        self.term.set_cursor_visible(true)?;
                        self.term.clear_screen()?;
                        return Ok(Outcome::Confirm(self.take_selection()));
                    }
                }
                Key::Up => self.move_up()?,
                Key::Down => self.move_down()?,
                Key::Backspace => {
                    self.search.pop();
                    self.refilter().await?;
                }
                Key::Char(c) if !c.is_control() => {
                    self.search.push(c);
                    self.refilter().await?;
                }
                _ => {}
            }
        }
    }

    fn on_anchor(&self) -> bool {
        self.cursor == self.anchor
    }

    fn highlighted(&self) -> Option<&L::Item> {
        self.highlight
            .and_then(|index| self.visible.get(index))
            .map(|entry| &entry.item)
    }

    fn take_selection(&mut self) -> Selection<L::Item> {
        Selection {
            value: self.highlighted().cloned(),
            index: self.highlight,
            candidates: std::mem::take(&mut self.candidates),
        }
    }

    /// Top row of the visible entry at `index`.
    fn top_row(&self, index: usize) -> u16 {
        let above = total_rows(&self.visible[..index]);
        self.anchor.saturating_add(1).saturating_add(above)
    }

    /// Last row occupied by the visible block.
    fn block_bottom(&self) -> u16 {
        self.anchor.saturating_add(total_rows(&self.visible))
    }

    fn move_up(&mut self) -> Result<(), BrowseError> {
        if self.visible.is_empty() {
            return Ok(());
        }
        self.unhighlight()?;

        let first = self.anchor + 1;
        let last = self.visible.len() - 1;
        self.cursor = if self.cursor <= first {
            first
        } else if self.cursor > self.block_bottom() {
            self.top_row(last)
        } else {
            match self.highlight {
                Some(i) if i > 0 => self.cursor - self.visible[i - 1].rows,
                _ => first,
            }
        };

        self.highlight_at_cursor()
    }

    fn move_down(&mut self) -> Result<(), BrowseError> {
        if self.visible.is_empty() {
            return Ok(());
        }
        self.unhighlight()?;

        let first = self.anchor + 1;
        let last = self.visible.len() - 1;
        self.cursor = if self.cursor < first {
            first
        } else {
            match self.highlight {
                Some(i) if i < last => self.cursor.saturating_add(self.visible[i].rows),
                _ => self.top_row(last),
            }
        };

        self.highlight_at_cursor()
    }

    fn highlight_at_cursor(&mut self) -> Result<(), BrowseError> {
        self.highlight =
            entry_at_row(self.visible.iter().map(|e| e.rows), self.anchor, self.cursor);
        if let Some(index) = self.highlight {
            self.term.set_cursor_visible(false)?;
            self.paint(index, true)?;
        }
        Ok(())
    }

    fn unhighlight(&mut self) -> Result<(), BrowseError> {
        if let Some(index) = self.highlight {
            self.paint(index, false)?;
        }
        Ok(())
    }

    /// Redraw one entry in place, highlighted or not, through the formatter.
    fn paint(&mut self, index: usize, highlighted: bool) -> Result<(), BrowseError> {
        let top = self.top_row(index);
        let entry = &self.visible[index];
        let text = self.listing.format(&entry.item, index);
        let rows = entry.rows;

        if highlighted {
            self.term.set_colors(self.style.foreground, self.style.background)?;
        }
        draw_text(&mut *self.term, top, &text, self.width, rows)?;
        if highlighted {
            self.term.reset_colors()?;
        }

        self.term.set_cursor_position(0, self.cursor)?;
        Ok(())
    }

    /// Re-run the filter against the original candidates and redraw.
    async fn refilter(&mut self) -> Result<(), BrowseError> {
        self.highlight = None;
        self.cursor = self.anchor;
        self.blank_window()?;

        let filtered = self.listing.filter(&self.search, &self.candidates).await;
        debug!(
            "Filter {:?} kept {} of {} candidates",
            self.search,
            filtered.len(),
            self.candidates.len()
        );

        self.render(filtered)?;
        self.draw_search_line()?;
        self.term.set_cursor_visible(true)?;
        Ok(())
    }

    fn blank_window(&mut self) -> Result<(), BrowseError> {
        let blank = " ".repeat(self.width as usize);
        let bottom = self.anchor.saturating_add(self.max_rows);
        for row in self.anchor + 1..=bottom {
            self.term.set_cursor_position(0, row)?;
            self.term.write(&blank)?;
        }
        Ok(())
    }

    /// Lay out and draw `items` below the anchor while they fit the window.
    /// An entry taller than the window is clipped to it.
    fn render(&mut self, items: Vec<L::Item>) -> Result<(), BrowseError> {
        self.visible.clear();
        let mut used: u16 = 0;

        for (index, item) in items.into_iter().enumerate() {
            let text = self.listing.format(&item, index);
            let rows = measure_rows(&text, self.width).min(self.max_rows);
            if !self.visible.is_empty() && used.saturating_add(rows) > self.max_rows {
                break;
            }

            let top = self.anchor.saturating_add(1).saturating_add(used);
            draw_text(&mut *self.term, top, &text, self.width, rows)?;
            used = used.saturating_add(rows);
            self.visible.push(Rendered { item, rows });
        }

        self.term.set_cursor_position(0, self.anchor)?;
        Ok(())
    }

    fn draw_search_line(&mut self) -> Result<(), BrowseError> {
        self.term.set_cursor_position(0, self.anchor)?;
        self.term.write(&" ".repeat(self.width as usize))?;
        self.term.set_cursor_position(0, self.anchor)?;
        self.term.write(&self.search)?;
        Ok(())
    }
}

/// Split formatter output into the lines it is drawn as.
fn display_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Rows one display line occupies once the terminal wraps it at `width`.
fn line_rows(line: &str, width: u16) -> usize {
    if width == 0 {
        return 1;
    }
    line.width().div_ceil(width as usize).max(1)
}

/// Number of terminal rows `text` occupies: one per line break, plus soft
/// wraps at the window width. Always at least 1; saturates at `u16::MAX`.
pub fn measure_rows(text: &str, width: u16) -> u16 {
    let total: usize = display_lines(text).map(|line| line_rows(line, width)).sum();
    u16::try_from(total.max(1)).unwrap_or(u16::MAX)
}

fn total_rows<I>(entries: &[Rendered<I>]) -> u16 {
    entries.iter().fold(0u16, |sum, e| sum.saturating_add(e.rows))
}

/// Longest prefix of `line` that fits in `columns` display columns.
fn clip_columns(line: &str, columns: usize) -> &str {
    let mut used = 0;
    for (at, ch) in line.char_indices() {
        used += ch.width().unwrap_or(0);
        if used > columns {
            return &line[..at];
        }
    }
    line
}

/// Index of the entry covering `cursor`, accumulating entry heights from the
/// row below `anchor`. Rows past the block clamp to the last entry; the anchor
/// row itself maps to no entry.
pub fn entry_at_row(
    rows: impl IntoIterator<Item = u16>,
    anchor: u16,
    cursor: u16,
) -> Option<usize> {
    if cursor <= anchor {
        return None;
    }
    let mut bottom = anchor;
    let mut last = None;
    for (index, height) in rows.into_iter().enumerate() {
        bottom = bottom.saturating_add(height);
        last = Some(index);
        if bottom >= cursor {
            return Some(index);
        }
    }
    last
}

/// Draw `text` from row `top`, using at most `max_rows` rows.
fn draw_text<T: Terminal + ?Sized>(
    term: &mut T,
    top: u16,
    text: &str,
    width: u16,
    max_rows: u16,
) -> Result<(), BrowseError> {
    let mut remaining = max_rows as usize;
    let mut row = top;
    for line in display_lines(text) {
        if remaining == 0 {
            break;
        }
        let rows = line_rows(line, width).min(remaining);
        let shown = if width == 0 {
            line
        } else {
            clip_columns(line, rows * width as usize)
        };
        term.set_cursor_position(0, row)?;
        term.write(shown)?;
        remaining -= rows;
        row = row.saturating_add(rows as u16);
    }
    Ok(())
}
