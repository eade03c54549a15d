use super::Position;

/// An atomic edit operation that can be undone/redone
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Insert text at position
    Insert {
        pos: usize, // char index
        text: String,
        cursor_before: Position,
        cursor_after: Position,
    },
    /// Delete text at position
    Delete {
        pos: usize,   // char index
        text: String, // the deleted text (for undo)
        cursor_before: Position,
        cursor_after: Position,
    },
}

impl Operation {
    pub fn cursor_before(&self) -> Position {
        match self {
            Operation::Insert { cursor_before, .. } => *cursor_before,
            Operation::Delete { cursor_before, .. } => *cursor_before,
        }
    }

    pub fn cursor_after(&self) -> Position {
        match self {
            Operation::Insert { cursor_after, .. } => *cursor_after,
            Operation::Delete { cursor_after, .. } => *cursor_after,
        }
    }
}

/// A group of operations that should be undone/redone together
#[derive(Debug, Clone, Default)]
pub struct OperationGroup {
    pub ops: Vec<Operation>,
    /// Cursor before the group, when it differs from the first op's
    pub cursor_before: Option<Position>,
    /// Cursor after the group, when it differs from the last op's
    pub cursor_after: Option<Position>,
}

impl OperationGroup {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}

/// Undo/redo history using operation-based approach
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<OperationGroup>,
    redo_stack: Vec<OperationGroup>,
    current_group: OperationGroup,
    /// Whether we're in the middle of an explicit group (a block command)
    grouping: bool,
    /// Redo stack dropped by the last edit, with the op count it belongs to
    stashed_redo: Option<(usize, Vec<OperationGroup>)>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new operation group
    pub fn begin_group(&mut self, cursor_before: Position) {
        if !self.current_group.is_empty() {
            self.commit_group();
        }
        self.current_group.cursor_before = Some(cursor_before);
        self.grouping = true;
    }

    /// End current operation group
    pub fn end_group(&mut self, cursor_after: Position) {
        if !self.current_group.is_empty() {
            self.current_group.cursor_after = Some(cursor_after);
            self.commit_group();
        } else {
            self.current_group = OperationGroup::default();
        }
        self.grouping = false;
    }

    /// Add an operation to the current group
    pub fn push(&mut self, op: Operation) {
        if !self.redo_stack.is_empty() {
            let count = self.op_count();
            self.stashed_redo = Some((count, std::mem::take(&mut self.redo_stack)));
        }
        self.current_group.ops.push(op);
    }

    /// Record an insert operation
    pub fn record_insert(&mut self, pos: usize, text: String, cursor_before: Position, cursor_after: Position) {
        self.push(Operation::Insert {
            pos,
            text,
            cursor_before,
            cursor_after,
        });
    }

    /// Record a delete operation
    pub fn record_delete(&mut self, pos: usize, text: String, cursor_before: Position, cursor_after: Position) {
        self.push(Operation::Delete {
            pos,
            text,
            cursor_before,
            cursor_after,
        });
    }

    /// Take back the newest edits that happened inside the `len` chars at
    /// `start`, newest first, while they still line up with the range.
    ///
    /// Committed groups are reopened as needed. Returns the removed ops and
    /// how many chars of the range they do not explain. When everything
    /// is explained, a redo stack cleared by those edits comes back.
    pub fn retract_range(&mut self, start: usize, len: usize) -> (Vec<Operation>, usize) {
        let mut remaining = len;
        let mut taken = Vec::new();

        while remaining > 0 {
            if self.current_group.is_empty() {
                match self.undo_stack.pop() {
                    Some(group) => self.current_group = group,
                    None => break,
                }
            }
            let Some(op) = self.current_group.ops.last() else {
                break;
            };
            let end = start + remaining;
            let next = match op {
                Operation::Insert { pos, text, .. } => {
                    let n = text.chars().count();
                    (*pos >= start && pos + n <= end).then(|| remaining - n)
                }
                Operation::Delete { pos, text, .. } => {
                    (*pos >= start && *pos <= end).then(|| remaining + text.chars().count())
                }
            };
            let Some(next) = next else {
                break;
            };
            remaining = next;
            taken.extend(self.current_group.ops.pop());
        }
        self.commit_group();

        if let Some((count, groups)) = self.stashed_redo.take() {
            if remaining == 0 && count == self.op_count() && self.redo_stack.is_empty() {
                self.redo_stack = groups;
            }
        }
        (taken, remaining)
    }

    fn op_count(&self) -> usize {
        self.undo_stack.iter().map(|g| g.ops.len()).sum::<usize>() + self.current_group.ops.len()
    }

    /// Commit current group to undo stack
    fn commit_group(&mut self) {
        if !self.current_group.is_empty() {
            let group = std::mem::take(&mut self.current_group);
            self.undo_stack.push(group);
        }
    }

    /// Break the current typing run into its own undo unit
    pub fn maybe_break_group(&mut self) {
        if !self.grouping && !self.current_group.is_empty() {
            self.commit_group();
        }
    }

    /// Get operations to undo, returns (operations, cursor position after undo)
    pub fn undo(&mut self) -> Option<(Vec<Operation>, Position)> {
        self.commit_group();
        self.stashed_redo = None;

        let group = self.undo_stack.pop()?;
        let cursor = group
            .cursor_before
            .unwrap_or_else(|| group.ops.first().map(|op| op.cursor_before()).unwrap_or_default());
        self.redo_stack.push(group.clone());
        Some((group.ops, cursor))
    }

    /// Get operations to redo, returns (operations, cursor position after redo)
    pub fn redo(&mut self) -> Option<(Vec<Operation>, Position)> {
        self.stashed_redo = None;
        let group = self.redo_stack.pop()?;
        let cursor = group
            .cursor_after
            .unwrap_or_else(|| group.ops.last().map(|op| op.cursor_after()).unwrap_or_default());
        self.undo_stack.push(group.clone());
        Some((group.ops, cursor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_chars(history: &mut History, start: usize, text: &str) {
        for (i, c) in text.chars().enumerate() {
            let before = Position::new(0, start + i);
            let after = Position::new(0, start + i + 1);
            history.record_insert(start + i, c.to_string(), before, after);
        }
    }

    #[test]
    fn test_record_and_undo() {
        let mut history = History::new();
        let before = Position::new(0, 0);
        let after = Position::new(0, 5);

        history.record_insert(0, "hello".to_string(), before, after);
        history.maybe_break_group();

        let (ops, position) = history.undo().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(position, before);
    }

    #[test]
    fn test_redo() {
        let mut history = History::new();
        let before = Position::new(0, 0);
        let after = Position::new(0, 5);

        history.record_insert(0, "hello".to_string(), before, after);
        history.maybe_break_group();

        history.undo();

        let (ops, position) = history.redo().unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(position, after);
    }

    #[test]
    fn test_explicit_group_uses_group_cursors() {
        let mut history = History::new();
        history.begin_group(Position::new(3, 4));
        history.record_delete(10, "# ".to_string(), Position::new(3, 4), Position::new(3, 2));
        history.record_insert(10, "## ".to_string(), Position::new(3, 2), Position::new(3, 5));
        history.end_group(Position::new(3, 5));

        let (ops, cursor) = history.undo().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(cursor, Position::new(3, 4));
        let (_, cursor) = history.redo().unwrap();
        assert_eq!(cursor, Position::new(3, 5));
    }

    fn inserted<'a>(ops: impl Iterator<Item = &'a Operation>) -> String {
        ops.map(|op| match op {
            Operation::Insert { text, .. } => text.as_str(),
            Operation::Delete { .. } => "",
        })
        .collect()
    }

    #[test]
    fn test_retract_typed_tail() {
        let mut history = History::new();
        type_chars(&mut history, 0, "ab /un");

        let (taken, remaining) = history.retract_range(3, 3);
        assert_eq!(inserted(taken.iter().rev()), "/un");
        assert_eq!(remaining, 0);

        let (ops, _) = history.undo().unwrap();
        assert_eq!(inserted(ops.iter()), "ab ");
        assert!(history.undo().is_none());
    }

    #[test]
    fn test_retract_reaches_into_committed_groups() {
        let mut history = History::new();
        type_chars(&mut history, 0, "ab ");
        history.maybe_break_group();
        type_chars(&mut history, 3, "/un");
        history.maybe_break_group();
        type_chars(&mut history, 6, "d");

        let (taken, remaining) = history.retract_range(3, 4);
        assert_eq!(inserted(taken.iter().rev()), "/und");
        assert_eq!(remaining, 0);

        let (ops, _) = history.undo().unwrap();
        assert_eq!(inserted(ops.iter()), "ab ");
    }

    #[test]
    fn test_retract_counts_backspaced_chars() {
        let mut history = History::new();
        type_chars(&mut history, 0, "/hx");
        history.record_delete(2, "x".to_string(), Position::new(0, 3), Position::new(0, 2));

        let (taken, remaining) = history.retract_range(0, 2);
        assert_eq!(taken.len(), 4);
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_retract_stops_at_older_text() {
        let mut history = History::new();
        type_chars(&mut history, 0, "ab");

        // "a" sits before the range
        let (taken, remaining) = history.retract_range(1, 2);
        assert_eq!(inserted(taken.iter()), "b");
        assert_eq!(remaining, 1);

        let (ops, _) = history.undo().unwrap();
        assert_eq!(inserted(ops.iter()), "a");
    }

    #[test]
    fn test_retract_restores_redo() {
        let mut history = History::new();
        type_chars(&mut history, 0, "amen");
        history.undo();

        type_chars(&mut history, 0, "/redo");
        let (_, remaining) = history.retract_range(0, 5);
        assert_eq!(remaining, 0);

        let (ops, _) = history.redo().unwrap();
        assert_eq!(inserted(ops.iter()), "amen");
    }

    #[test]
    fn test_partial_retract_keeps_redo_cleared() {
        let mut history = History::new();
        type_chars(&mut history, 0, "amen");
        history.undo();

        type_chars(&mut history, 0, "/re");
        let (_, remaining) = history.retract_range(0, 4);
        assert_eq!(remaining, 1);
        assert!(history.redo().is_none());
    }
}
