//! Rope storage for the note text
//!
//! Offsets are char indices. A line's length never counts its newline.

use ropey::Rope;
use std::fmt;
use std::ops::Range;

#[derive(Debug, Default)]
pub struct Buffer {
    rope: Rope,
    dirty: bool,
}

impl Buffer {
    pub fn from_str(text: &str) -> Self {
        Self { rope: Rope::from_str(text), dirty: false }
    }

    /// Edited since load or the last save
    pub fn is_modified(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let end = range.end.min(self.len_chars());
        range.start.min(end)..end
    }

    /// Chars in `range`, clamped to the text
    pub fn slice(&self, range: Range<usize>) -> String {
        self.rope.slice(self.clamp(range)).to_string()
    }

    pub fn insert(&mut self, at: usize, text: &str) {
        self.rope.insert(at.min(self.len_chars()), text);
        self.dirty = true;
    }

    pub fn delete(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        if !range.is_empty() {
            self.rope.remove(range);
            self.dirty = true;
        }
    }

    /// Text of a line, empty past the last one
    pub fn line(&self, idx: usize) -> String {
        if idx >= self.line_count() {
            return String::new();
        }
        let mut line = self.rope.line(idx).to_string();
        if line.ends_with('\n') {
            line.pop();
        }
        line
    }

    pub fn line_len(&self, idx: usize) -> usize {
        if idx >= self.line_count() {
            return 0;
        }
        let line = self.rope.line(idx);
        match line.len_chars() {
            n if n > 0 && line.char(n - 1) == '\n' => n - 1,
            n => n,
        }
    }

    /// Offset of `col` in `line`. Columns clamp to the line end, lines past
    /// the last one map to the end of the text.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.line_count() {
            return self.len_chars();
        }
        self.rope.line_to_char(line) + col.min(self.line_len(line))
    }

    pub fn char_to_line_col(&self, idx: usize) -> (usize, usize) {
        let idx = idx.min(self.len_chars());
        let line = self.rope.char_to_line(idx);
        (line, idx - self.rope.line_to_char(line))
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.rope, f)
    }
}
