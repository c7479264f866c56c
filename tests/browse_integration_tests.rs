//! End-to-end sessions against a real directory tree.

use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

use burrow::browse::fs::{FsBrowser, StdFs};
use burrow::browse::inspect::Inspector;
use burrow::core::navigator::Navigator;
use burrow::core::terminal::{Color, Key, Terminal};
use glob::Pattern;

/// Replays keys and keeps everything written as plain text.
struct ReplayTerminal {
    keys: VecDeque<Key>,
    written: String,
    row: u16,
    column: u16,
}

impl ReplayTerminal {
    fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            written: String::new(),
            row: 0,
            column: 0,
        }
    }
}

impl Terminal for ReplayTerminal {
    fn read_key(&mut self) -> io::Result<Key> {
        self.keys
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "no more keys"))
    }
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.written.push_str(text);
        Ok(())
    }
    fn write_line(&mut self, text: &str) -> io::Result<()> {
        self.written.push_str(text);
        self.written.push('\n');
        Ok(())
    }
    fn clear_screen(&mut self) -> io::Result<()> {
        self.row = 0;
        self.column = 0;
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
        Ok(200)
    }
    fn set_cursor_visible(&mut self, _visible: bool) -> io::Result<()> {
        Ok(())
    }
    fn set_colors(&mut self, _foreground: Color, _background: Color) -> io::Result<()> {
        Ok(())
    }
    fn reset_colors(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn touch(path: &Path) {
    fs::write(path, "").unwrap();
}

#[tokio::test]
async fn test_directory_mode_on_real_tree() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("alpha").join("inner")).unwrap();
    fs::create_dir(dir.path().join("beta")).unwrap();
    touch(&dir.path().join("ignored.txt"));

    let keys = [
        Key::Right, // into the root directory: alpha, beta
        Key::Right, // into alpha: inner
        Key::Left,  // back: alpha highlighted
        Key::Down,  // beta
        Key::Enter,
    ];
    let mut term = ReplayTerminal::new(keys);

    let chosen = FsBrowser::directories(StdFs)
        .browse(&mut term, &Navigator::default(), dir.path())
        .await
        .unwrap();

    assert_eq!(chosen, Some(dir.path().join("beta")));
    assert!(term.written.contains("inner"));
    assert!(!term.written.contains("ignored.txt"));
}

#[tokio::test]
async fn test_file_mode_with_pattern_on_real_tree() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    touch(&dir.path().join("sub").join("deep.txt"));
    touch(&dir.path().join("a.txt"));
    touch(&dir.path().join("b.md"));

    let keys = [
        Key::Right, // into sub
        Key::Left,  // back to the root list
        Key::Down,  // a.txt
        Key::Enter,
    ];
    let mut term = ReplayTerminal::new(keys);

    let chosen = FsBrowser::files(StdFs, Pattern::new("*.txt").unwrap())
        .browse(&mut term, &Navigator::default(), dir.path())
        .await
        .unwrap();

    assert_eq!(chosen, Some(dir.path().join("a.txt")));
    assert!(term.written.contains("deep.txt"));
    assert!(!term.written.contains("b.md"));
}

#[tokio::test]
async fn test_missing_directory_fails_before_drawing() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("gone");
    let mut term = ReplayTerminal::new([Key::Enter]);

    let result = FsBrowser::directories(StdFs)
        .browse(&mut term, &Navigator::default(), &missing)
        .await;

    assert!(result.is_err());
    assert!(term.written.is_empty());
    assert_eq!(term.keys.len(), 1);
}

#[tokio::test]
async fn test_inspect_document_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    fs::write(&path, r#"{"name": "burrow", "tags": ["fs", "json"]}"#).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let keys = [Key::Down, Key::Right, Key::Left, Key::Left];
    let mut term = ReplayTerminal::new(keys);

    Inspector::default()
        .inspect(&mut term, &Navigator::default(), &value)
        .await
        .unwrap();

    assert!(term.written.contains("tags - [2 items]"));
    assert!(term.written.contains("1. json"));
    assert!(term.keys.is_empty());
}
