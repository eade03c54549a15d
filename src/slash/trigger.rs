//! Trigger detection
//!
//! Watches the cursor line for the trigger character and the filter token
//! typed after it, and turns successive observations into start/update/exit
//! events for the popup.

use crate::editor::Position;

/// An in-progress trigger: the trigger character and the query typed after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub line: usize,
    /// Column of the trigger character
    pub start_col: usize,
    /// Cursor column (end of the query)
    pub end_col: usize,
    pub query: String,
}

impl Trigger {
    /// Start of the text to delete on selection
    pub fn from(&self) -> Position {
        Position::new(self.line, self.start_col)
    }

    /// End of the text to delete on selection
    pub fn to(&self) -> Position {
        Position::new(self.line, self.end_col)
    }
}

/// Find a trigger ending at `cursor_col` in `line`.
///
/// The trigger character must begin the line or follow whitespace, and the
/// query may contain neither whitespace nor another trigger character.
pub fn detect(line: &str, line_idx: usize, cursor_col: usize, trigger_char: char) -> Option<Trigger> {
    let chars: Vec<char> = line.chars().collect();
    let end = cursor_col.min(chars.len());

    for i in (0..end).rev() {
        let c = chars[i];
        if c == trigger_char {
            if i == 0 || chars[i - 1].is_whitespace() {
                return Some(Trigger {
                    line: line_idx,
                    start_col: i,
                    end_col: end,
                    query: chars[i + 1..end].iter().collect(),
                });
            }
            return None;
        }
        if c.is_whitespace() {
            return None;
        }
    }
    None
}

/// Lifecycle signal for the popup controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerEvent {
    Start(Trigger),
    Update(Trigger),
    Exit,
}

/// Tracks the active trigger across edits and cursor moves
#[derive(Debug)]
pub struct TriggerTracker {
    trigger_char: char,
    active: Option<Trigger>,
}

impl TriggerTracker {
    pub fn new(trigger_char: char) -> Self {
        Self {
            trigger_char,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&Trigger> {
        self.active.as_ref()
    }

    /// Observe the cursor line after an input event.
    ///
    /// A selection suppresses the trigger. A match that moved to a different
    /// trigger character ends the old session before starting a new one.
    pub fn observe(
        &mut self,
        line: &str,
        line_idx: usize,
        cursor_col: usize,
        has_selection: bool,
    ) -> Vec<TriggerEvent> {
        let current = if has_selection {
            None
        } else {
            detect(line, line_idx, cursor_col, self.trigger_char)
        };

        let events = match (self.active.as_ref(), current.as_ref()) {
            (None, None) => Vec::new(),
            (None, Some(cur)) => vec![TriggerEvent::Start(cur.clone())],
            (Some(_), None) => vec![TriggerEvent::Exit],
            (Some(prev), Some(cur)) if prev.line == cur.line && prev.start_col == cur.start_col => {
                if prev == cur {
                    Vec::new()
                } else {
                    vec![TriggerEvent::Update(cur.clone())]
                }
            }
            (Some(_), Some(cur)) => vec![TriggerEvent::Exit, TriggerEvent::Start(cur.clone())],
        };

        self.active = current;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_at_line_start() {
        let t = detect("/head", 2, 5, '/').unwrap();
        assert_eq!(t.start_col, 0);
        assert_eq!(t.end_col, 5);
        assert_eq!(t.query, "head");
        assert_eq!(t.from(), Position::new(2, 0));
        assert_eq!(t.to(), Position::new(2, 5));
    }

    #[test]
    fn test_detect_after_space_only() {
        assert_eq!(detect("note /bu", 0, 8, '/').unwrap().query, "bu");
        assert!(detect("and/or", 0, 6, '/').is_none());
        assert!(detect("/a b", 0, 4, '/').is_none());
        assert!(detect("/a/b", 0, 4, '/').is_none());
    }

    #[test]
    fn test_detect_uses_cursor_not_line_end() {
        let t = detect("/undo later", 0, 3, '/').unwrap();
        assert_eq!(t.query, "un");
        assert!(detect("/undo later", 0, 0, '/').is_none());
    }

    #[test]
    fn test_tracker_lifecycle() {
        let mut tracker = TriggerTracker::new('/');

        let events = tracker.observe("/", 0, 1, false);
        assert!(matches!(events.as_slice(), [TriggerEvent::Start(t)] if t.query.is_empty()));

        let events = tracker.observe("/h", 0, 2, false);
        assert!(matches!(events.as_slice(), [TriggerEvent::Update(t)] if t.query == "h"));

        // Nothing changed
        assert!(tracker.observe("/h", 0, 2, false).is_empty());

        assert_eq!(tracker.observe("/h ", 0, 3, false), vec![TriggerEvent::Exit]);
        assert!(tracker.active().is_none());
    }

    #[test]
    fn test_tracker_restarts_on_new_trigger() {
        let mut tracker = TriggerTracker::new('/');
        tracker.observe("/a", 0, 2, false);

        let events = tracker.observe("/a", 1, 2, false);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], TriggerEvent::Exit);
        assert!(matches!(&events[1], TriggerEvent::Start(t) if t.line == 1));
    }

    #[test]
    fn test_selection_suppresses_trigger() {
        let mut tracker = TriggerTracker::new('/');
        tracker.observe("/a", 0, 2, false);
        assert_eq!(tracker.observe("/a", 0, 2, true), vec![TriggerEvent::Exit]);
    }
}
