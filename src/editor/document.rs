//! The note being edited: text, cursor and undo history

use crate::buffer::Buffer;
use crate::slash::{DocumentHandle, ListKind, MarkKind};

use super::block::{continuation_prefix, heading_prefix, parse_block, Block, RULE};
use super::{Cursor, History, Operation, Position};

/// A markdown-flavoured note with a single cursor
#[derive(Debug, Default)]
pub struct Document {
    buffer: Buffer,
    cursor: Cursor,
    history: History,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load text with the cursor at the end of the first line
    pub fn from_text(text: &str) -> Self {
        let buffer = Buffer::from_str(text);
        let col = buffer.line_len(0);
        Self {
            buffer,
            cursor: Cursor::at(0, col),
            history: History::new(),
        }
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line(&self, line_idx: usize) -> String {
        self.buffer.line(line_idx)
    }

    /// Text to quote for a favorite verse: the selection, or else the
    /// cursor line without its block prefix
    pub fn quoted_text(&self) -> String {
        if let Some((start, end)) = self.cursor.selection_bounds() {
            return self.buffer.slice(self.char_index(start)..self.char_index(end)).trim().to_string();
        }
        let line = self.line(self.cursor.line);
        let (_, prefix_len) = parse_block(&line);
        line.chars().skip(prefix_len).collect::<String>().trim().to_string()
    }

    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    pub fn mark_saved(&mut self) {
        self.buffer.mark_saved();
    }

    /// Break the current typing run into its own undo unit
    pub fn break_undo_group(&mut self) {
        self.history.maybe_break_group();
    }

    fn cursor_pos(&self) -> Position {
        self.cursor.position()
    }

    fn char_index(&self, pos: Position) -> usize {
        self.buffer.line_col_to_char(pos.line, pos.col)
    }

    fn place_cursor(&mut self, pos: Position) {
        let line = pos.line.min(self.buffer.line_count().saturating_sub(1));
        let col = pos.col.min(self.buffer.line_len(line));
        self.cursor.set(line, col);
    }

    // === Recorded edits ===

    fn insert_recorded(&mut self, idx: usize, text: &str, before: Position, after: Position) {
        if text.is_empty() {
            return;
        }
        self.buffer.insert(idx, text);
        self.history.record_insert(idx, text.to_string(), before, after);
    }

    fn delete_recorded(&mut self, start: usize, end: usize, before: Position, after: Position) {
        if start >= end {
            return;
        }
        let text = self.buffer.slice(start..end);
        self.buffer.delete(start..end);
        self.history.record_delete(start, text, before, after);
    }

    /// Delete the selection, if any. Returns true if text was removed.
    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.cursor.selection_bounds() else {
            return false;
        };
        let before = self.cursor_pos();
        let (s, e) = (self.char_index(start), self.char_index(end));
        self.delete_recorded(s, e, before, start);
        self.cursor.set(start.line, start.col);
        self.history.maybe_break_group();
        true
    }

    // === Typing ===

    /// Insert text at the cursor, replacing the selection
    pub fn insert_text(&mut self, text: &str) {
        self.delete_selection();

        let before = self.cursor_pos();
        let idx = self.char_index(before);
        let mut after = before;
        for c in text.chars() {
            if c == '\n' {
                after.line += 1;
                after.col = 0;
            } else {
                after.col += 1;
            }
        }
        self.insert_recorded(idx, text, before, after);
        self.cursor.set(after.line, after.col);
    }

    pub fn insert_char(&mut self, c: char) {
        self.insert_text(&c.to_string());
    }

    /// Break the line. List items continue onto the new line; Enter on an
    /// empty list item ends the list instead.
    pub fn insert_newline(&mut self) {
        self.history.maybe_break_group();
        self.delete_selection();

        let line_idx = self.cursor.line;
        let line = self.line(line_idx);
        let (block, prefix_len) = parse_block(&line);

        match continuation_prefix(block) {
            Some(_) if line.chars().count() == prefix_len => {
                self.replace_prefix(line_idx, prefix_len, "");
            }
            Some(prefix) if self.cursor.col >= prefix_len => {
                self.insert_text(&format!("\n{}", prefix));
            }
            _ => self.insert_text("\n"),
        }
        self.history.maybe_break_group();
    }

    pub fn backspace(&mut self) {
        if self.delete_selection() {
            return;
        }
        let before = self.cursor_pos();
        let idx = self.char_index(before);
        if idx == 0 {
            return;
        }
        let (line, col) = self.buffer.char_to_line_col(idx - 1);
        let after = Position::new(line, col);
        self.delete_recorded(idx - 1, idx, before, after);
        self.cursor.set(line, col);
    }

    pub fn delete_forward(&mut self) {
        if self.delete_selection() {
            return;
        }
        let pos = self.cursor_pos();
        let idx = self.char_index(pos);
        if idx < self.buffer.len_chars() {
            self.delete_recorded(idx, idx + 1, pos, pos);
        }
    }

    // === Movement ===

    pub fn move_left(&mut self, extend: bool) {
        let (line, col) = if self.cursor.col > 0 {
            (self.cursor.line, self.cursor.col - 1)
        } else if self.cursor.line > 0 {
            let prev = self.cursor.line - 1;
            (prev, self.buffer.line_len(prev))
        } else {
            (0, 0)
        };
        self.cursor.move_to(line, col, extend);
        self.cursor.desired_col = col;
    }

    pub fn move_right(&mut self, extend: bool) {
        let line_len = self.buffer.line_len(self.cursor.line);
        let (line, col) = if self.cursor.col < line_len {
            (self.cursor.line, self.cursor.col + 1)
        } else if self.cursor.line + 1 < self.buffer.line_count() {
            (self.cursor.line + 1, 0)
        } else {
            (self.cursor.line, line_len)
        };
        self.cursor.move_to(line, col, extend);
        self.cursor.desired_col = col;
    }

    pub fn move_up(&mut self, extend: bool) {
        if self.cursor.line == 0 {
            self.cursor.move_to(0, 0, extend);
            return;
        }
        let line = self.cursor.line - 1;
        let col = self.cursor.desired_col.min(self.buffer.line_len(line));
        self.cursor.move_to(line, col, extend);
    }

    pub fn move_down(&mut self, extend: bool) {
        let last = self.buffer.line_count().saturating_sub(1);
        if self.cursor.line >= last {
            let col = self.buffer.line_len(last);
            self.cursor.move_to(last, col, extend);
            return;
        }
        let line = self.cursor.line + 1;
        let col = self.cursor.desired_col.min(self.buffer.line_len(line));
        self.cursor.move_to(line, col, extend);
    }

    pub fn move_home(&mut self, extend: bool) {
        self.cursor.move_to(self.cursor.line, 0, extend);
        self.cursor.desired_col = 0;
    }

    pub fn move_end(&mut self, extend: bool) {
        let col = self.buffer.line_len(self.cursor.line);
        self.cursor.move_to(self.cursor.line, col, extend);
        self.cursor.desired_col = col;
    }

    pub fn clear_selection(&mut self) {
        self.cursor.clear_selection();
    }

    /// Move the cursor to a clamped position, dropping any selection
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.history.maybe_break_group();
        self.place_cursor(Position::new(line, col));
    }

    // === Block edits ===

    /// Replace the first `old_len` chars of `line_idx` with `prefix` as one
    /// undo unit, keeping the cursor on the same text.
    fn replace_prefix(&mut self, line_idx: usize, old_len: usize, prefix: &str) {
        let before = self.cursor_pos();
        self.history.begin_group(before);

        let start = self.buffer.line_col_to_char(line_idx, 0);
        let mid = Position::new(line_idx, 0);
        self.delete_recorded(start, start + old_len, before, mid);

        let new_len = prefix.chars().count();
        let col = if before.line == line_idx {
            before.col.saturating_sub(old_len) + new_len
        } else {
            before.col
        };
        let after = Position::new(before.line, col);
        self.insert_recorded(start, prefix, mid, after);

        self.cursor.set(after.line, after.col);
        self.history.end_group(after);
    }

    fn ordered_number_before(&self, line_idx: usize) -> u32 {
        if line_idx == 0 {
            return 1;
        }
        match parse_block(&self.line(line_idx - 1)).0 {
            Block::Ordered(n) => n.saturating_add(1),
            _ => 1,
        }
    }

    // === Undo/Redo ===

    pub fn undo(&mut self) -> bool {
        let Some((ops, cursor)) = self.history.undo() else {
            return false;
        };
        for op in ops.into_iter().rev() {
            self.revert(op);
        }
        self.place_cursor(cursor);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some((ops, cursor)) = self.history.redo() else {
            return false;
        };
        for op in ops {
            match op {
                Operation::Insert { pos, text, .. } => {
                    self.buffer.insert(pos, &text);
                }
                Operation::Delete { pos, text, .. } => {
                    self.buffer.delete(pos..pos + text.chars().count());
                }
            }
        }
        self.place_cursor(cursor);
        true
    }

    /// Undo a single operation in the buffer
    fn revert(&mut self, op: Operation) {
        match op {
            Operation::Insert { pos, text, .. } => {
                self.buffer.delete(pos..pos + text.chars().count());
            }
            Operation::Delete { pos, text, .. } => {
                self.buffer.insert(pos, &text);
            }
        }
    }
}

impl DocumentHandle for Document {
    fn toggle_heading(&mut self, level: u8) {
        let line_idx = self.cursor.line;
        let (block, prefix_len) = parse_block(&self.line(line_idx));
        let prefix = if block == Block::Heading(level) {
            String::new()
        } else {
            heading_prefix(level)
        };
        self.replace_prefix(line_idx, prefix_len, &prefix);
    }

    fn toggle_list(&mut self, kind: ListKind) {
        let line_idx = self.cursor.line;
        let (block, prefix_len) = parse_block(&self.line(line_idx));
        let prefix = match (kind, block) {
            (ListKind::Bullet, Block::Bullet) | (ListKind::Ordered, Block::Ordered(_)) => String::new(),
            (ListKind::Bullet, _) => "- ".to_string(),
            (ListKind::Ordered, _) => format!("{}. ", self.ordered_number_before(line_idx)),
        };
        self.replace_prefix(line_idx, prefix_len, &prefix);
    }

    fn insert_rule(&mut self) {
        let before = self.cursor_pos();
        self.history.begin_group(before);
        self.delete_selection();

        let line_idx = self.cursor.line;
        let after = if self.buffer.line_len(line_idx) == 0 {
            // Empty line becomes the rule
            let start = self.buffer.line_col_to_char(line_idx, 0);
            let after = Position::new(line_idx + 1, 0);
            self.insert_recorded(start, &format!("{}\n", RULE), before, after);
            after
        } else {
            let end = self.buffer.line_col_to_char(line_idx, self.buffer.line_len(line_idx));
            let after = Position::new(line_idx + 2, 0);
            self.insert_recorded(end, &format!("\n{}\n", RULE), before, after);
            after
        };

        self.cursor.set(after.line, after.col);
        self.history.end_group(after);
    }

    fn undo(&mut self) {
        Document::undo(self);
    }

    fn redo(&mut self) {
        Document::redo(self);
    }

    fn toggle_mark(&mut self, kind: MarkKind) {
        let delim = kind.delimiter();
        let dl = delim.chars().count();
        let before = self.cursor_pos();
        self.history.begin_group(before);

        match self.cursor.selection_bounds() {
            Some((start, end)) => {
                let s = self.char_index(start);
                let e = self.char_index(end);
                let wrapped = s >= dl
                    && self.buffer.slice(s - dl..s) == delim
                    && self.buffer.slice(e..e + dl) == delim;

                if wrapped {
                    // Unwrap: remove the closing delimiter first so `s` stays valid
                    self.delete_recorded(e, e + dl, before, before);
                    self.delete_recorded(s - dl, s, before, before);
                    let (sl, sc) = self.buffer.char_to_line_col(s - dl);
                    let (el, ec) = self.buffer.char_to_line_col(e - dl);
                    self.cursor.select(Position::new(sl, sc), Position::new(el, ec));
                } else {
                    self.insert_recorded(e, delim, before, before);
                    self.insert_recorded(s, delim, before, before);
                    let (sl, sc) = self.buffer.char_to_line_col(s + dl);
                    let (el, ec) = self.buffer.char_to_line_col(e + dl);
                    self.cursor.select(Position::new(sl, sc), Position::new(el, ec));
                }
            }
            None => {
                let idx = self.char_index(before);
                let inside = Position::new(before.line, before.col + dl);
                self.insert_recorded(idx, &format!("{}{}", delim, delim), before, inside);
                self.cursor.set(inside.line, inside.col);
            }
        }

        let after = self.cursor_pos();
        self.history.end_group(after);
    }

    fn delete_range(&mut self, from: Position, to: Position) {
        let start = self.char_index(from);
        let end = self.char_index(to);
        if start < end {
            // Typed trigger text leaves no trace in the history
            let (retracted, remaining) = self.history.retract_range(start, end - start);
            for op in retracted {
                self.revert(op);
            }
            if remaining > 0 {
                let before = self.cursor_pos();
                self.history.begin_group(before);
                self.delete_recorded(start, start + remaining, before, from);
                self.history.end_group(from);
            }
        }
        self.cursor.set(from.line, from.col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> Document {
        let mut doc = Document::new();
        for c in text.chars() {
            if c == '\n' {
                doc.insert_newline();
            } else {
                doc.insert_char(c);
            }
        }
        doc
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut doc = typed("grace");
        doc.backspace();
        assert_eq!(doc.text(), "grac");
        assert_eq!(doc.cursor().position(), Position::new(0, 4));
        assert!(doc.is_modified());
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut doc = typed("a\nb");
        doc.move_home(false);
        doc.backspace();
        assert_eq!(doc.text(), "ab");
        assert_eq!(doc.cursor().position(), Position::new(0, 1));
    }

    #[test]
    fn test_toggle_heading() {
        let mut doc = typed("Psalm 23");
        doc.toggle_heading(1);
        assert_eq!(doc.text(), "# Psalm 23");
        assert_eq!(doc.cursor().col, 10);

        doc.toggle_heading(2);
        assert_eq!(doc.text(), "## Psalm 23");

        doc.toggle_heading(2);
        assert_eq!(doc.text(), "Psalm 23");
        assert_eq!(doc.cursor().col, 8);
    }

    #[test]
    fn test_heading_undo_is_one_step() {
        let mut doc = typed("Psalm 23");
        doc.break_undo_group();
        doc.toggle_heading(1);
        assert!(doc.undo());
        assert_eq!(doc.text(), "Psalm 23");
        assert!(doc.redo());
        assert_eq!(doc.text(), "# Psalm 23");
    }

    #[test]
    fn test_toggle_lists() {
        let mut doc = typed("one");
        doc.toggle_list(ListKind::Bullet);
        assert_eq!(doc.text(), "- one");
        doc.toggle_list(ListKind::Ordered);
        assert_eq!(doc.text(), "1. one");
        doc.toggle_list(ListKind::Ordered);
        assert_eq!(doc.text(), "one");
    }

    #[test]
    fn test_ordered_list_numbers_follow_previous_line() {
        let mut doc = typed("1. one\ntwo");
        assert_eq!(doc.text(), "1. one\n2. two");

        let mut doc = typed("1. one\n");
        doc.insert_newline();
        doc.insert_text("two");
        doc.toggle_list(ListKind::Ordered);
        assert_eq!(doc.text(), "1. one\n2. two");

        let mut doc = typed("intro\nstep");
        doc.toggle_list(ListKind::Ordered);
        assert_eq!(doc.text(), "intro\n1. step");
    }

    #[test]
    fn test_enter_on_empty_item_ends_list() {
        let mut doc = typed("- a\n");
        assert_eq!(doc.text(), "- a\n- ");
        doc.insert_newline();
        assert_eq!(doc.text(), "- a\n");
        assert_eq!(doc.cursor().position(), Position::new(1, 0));
    }

    #[test]
    fn test_insert_rule() {
        let mut doc = typed("Observations");
        doc.insert_rule();
        assert_eq!(doc.text(), "Observations\n---\n");
        assert_eq!(doc.cursor().position(), Position::new(2, 0));

        let mut doc = typed("a\n");
        doc.insert_rule();
        assert_eq!(doc.text(), "a\n---\n");
        assert_eq!(doc.cursor().position(), Position::new(2, 0));
    }

    #[test]
    fn test_toggle_mark_without_selection() {
        let mut doc = typed("so ");
        doc.toggle_mark(MarkKind::Bold);
        doc.insert_text("loved");
        assert_eq!(doc.text(), "so **loved**");
    }

    #[test]
    fn test_toggle_mark_wraps_and_unwraps_selection() {
        let mut doc = typed("so loved");
        for _ in 0..5 {
            doc.move_left(true);
        }
        doc.toggle_mark(MarkKind::Italic);
        assert_eq!(doc.text(), "so *loved*");
        assert!(doc.cursor().has_selection());

        doc.toggle_mark(MarkKind::Italic);
        assert_eq!(doc.text(), "so loved");
    }

    #[test]
    fn test_delete_range_retracts_typed_trigger() {
        let mut doc = typed("amen ");
        doc.break_undo_group();
        for c in "/undo".chars() {
            doc.insert_char(c);
        }

        doc.delete_range(Position::new(0, 5), Position::new(0, 10));
        assert_eq!(doc.text(), "amen ");
        DocumentHandle::undo(&mut doc);
        assert_eq!(doc.text(), "");
    }

    #[test]
    fn test_delete_range_keeps_loaded_text_undoable() {
        let mut doc = Document::from_text("x/");
        doc.move_end(false);
        doc.insert_text("he");

        doc.delete_range(Position::new(0, 1), Position::new(0, 4));
        assert_eq!(doc.text(), "x");
        // Only the loaded "/" comes back, the typed "he" is gone for good
        assert!(doc.undo());
        assert_eq!(doc.text(), "x/");
        assert!(!doc.undo());
    }

    #[test]
    fn test_delete_range_falls_back_to_recorded_delete() {
        let mut doc = Document::from_text("/head");
        doc.delete_range(Position::new(0, 0), Position::new(0, 5));
        assert_eq!(doc.text(), "");
        assert!(doc.undo());
        assert_eq!(doc.text(), "/head");
    }

    #[test]
    fn test_quoted_text() {
        let mut doc = typed("- The Lord is my shepherd ");
        assert_eq!(doc.quoted_text(), "The Lord is my shepherd");

        for _ in 0..10 {
            doc.move_left(true);
        }
        assert_eq!(doc.quoted_text(), "shepherd");
    }

    #[test]
    fn test_selection_replaced_by_typing() {
        let mut doc = typed("hello");
        doc.move_home(true);
        doc.insert_char('j');
        assert_eq!(doc.text(), "j");
    }
}
