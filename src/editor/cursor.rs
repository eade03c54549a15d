/// Line and char column in the note, both from 0
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// The caret and, while text is selected, the fixed end of the selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
    /// Column kept across short lines when moving up and down
    pub desired_col: usize,
    anchor: Option<Position>,
}

impl Cursor {
    pub fn at(line: usize, col: usize) -> Self {
        Self { line, col, desired_col: col, anchor: None }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }

    pub fn has_selection(&self) -> bool {
        self.selection_bounds().is_some()
    }

    /// Selected range as (start, end), None when nothing is selected
    pub fn selection_bounds(&self) -> Option<(Position, Position)> {
        let here = self.position();
        let anchor = self.anchor.filter(|a| *a != here)?;
        Some((anchor.min(here), anchor.max(here)))
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Move the caret. With `extend` the selection grows from where the
    /// caret was, otherwise any selection is dropped.
    pub fn move_to(&mut self, line: usize, col: usize, extend: bool) {
        if !extend {
            self.anchor = None;
        } else if self.anchor.is_none() {
            self.anchor = Some(self.position());
        }
        self.line = line;
        self.col = col;
    }

    /// Place the caret, dropping the selection
    pub fn set(&mut self, line: usize, col: usize) {
        *self = Self::at(line, col);
    }

    /// Select from `from` to `to`, leaving the caret at `to`
    pub fn select(&mut self, from: Position, to: Position) {
        *self = Self { anchor: Some(from), ..Self::at(to.line, to.col) };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_bounds_are_ordered() {
        let mut cursor = Cursor::at(2, 5);
        cursor.move_to(1, 3, true);
        assert_eq!(cursor.selection_bounds(), Some((Position::new(1, 3), Position::new(2, 5))));

        cursor.move_to(1, 4, false);
        assert_eq!(cursor.selection_bounds(), None);
    }

    #[test]
    fn test_selection_back_to_anchor_is_empty() {
        let mut cursor = Cursor::at(0, 4);
        cursor.move_to(0, 5, true);
        cursor.move_to(0, 4, true);
        assert!(!cursor.has_selection());
        cursor.move_to(0, 2, true);
        assert_eq!(cursor.selection_bounds(), Some((Position::new(0, 2), Position::new(0, 4))));
    }
}
