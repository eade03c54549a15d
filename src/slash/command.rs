//! Slash command registry
//!
//! Every entry names one fixed document mutation. The popup never stores
//! closures; a selected [`Command`] is interpreted by [`Action::apply`]
//! against whatever implements [`DocumentHandle`].

use crate::editor::Position;

/// List flavour for list toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Bullet,
    Ordered,
}

/// Inline mark flavour for mark toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Bold,
    Italic,
}

impl MarkKind {
    /// Markdown delimiter written around marked text
    pub fn delimiter(self) -> &'static str {
        match self {
            MarkKind::Bold => "**",
            MarkKind::Italic => "*",
        }
    }
}

/// A fixed mutation request against the note document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleHeading(u8),
    ToggleList(ListKind),
    InsertRule,
    Undo,
    Redo,
    ToggleMark(MarkKind),
}

/// The whitelist of mutations the slash popup may request from the host.
pub trait DocumentHandle {
    fn toggle_heading(&mut self, level: u8);
    fn toggle_list(&mut self, kind: ListKind);
    fn insert_rule(&mut self);
    fn undo(&mut self);
    fn redo(&mut self);
    fn toggle_mark(&mut self, kind: MarkKind);
    /// Remove the text between two positions on the same line (the typed trigger)
    fn delete_range(&mut self, from: Position, to: Position);
}

impl Action {
    /// Apply this action to a document
    pub fn apply<D: DocumentHandle + ?Sized>(self, doc: &mut D) {
        match self {
            Action::ToggleHeading(level) => doc.toggle_heading(level),
            Action::ToggleList(kind) => doc.toggle_list(kind),
            Action::InsertRule => doc.insert_rule(),
            Action::Undo => doc.undo(),
            Action::Redo => doc.redo(),
            Action::ToggleMark(kind) => doc.toggle_mark(kind),
        }
    }
}

/// A named entry in the slash menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub title: &'static str,
    pub action: Action,
}

/// All slash commands, in display order
pub const COMMANDS: &[Command] = &[
    Command { title: "Heading 1", action: Action::ToggleHeading(1) },
    Command { title: "Heading 2", action: Action::ToggleHeading(2) },
    Command { title: "Bullet List", action: Action::ToggleList(ListKind::Bullet) },
    Command { title: "Numbered List", action: Action::ToggleList(ListKind::Ordered) },
    Command { title: "Horizontal Rule", action: Action::InsertRule },
    Command { title: "Undo", action: Action::Undo },
    Command { title: "Redo", action: Action::Redo },
    Command { title: "Bold", action: Action::ToggleMark(MarkKind::Bold) },
    Command { title: "Italic", action: Action::ToggleMark(MarkKind::Italic) },
];

/// Commands whose title contains `query`, ignoring case, in registry order.
/// An empty query keeps everything.
pub fn filter_commands(commands: &[Command], query: &str) -> Vec<Command> {
    let needle = query.to_lowercase();
    commands
        .iter()
        .filter(|c| needle.is_empty() || c.title.to_lowercase().contains(&needle))
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DocumentHandle for Recorder {
        fn toggle_heading(&mut self, level: u8) {
            self.calls.push(format!("heading {}", level));
        }
        fn toggle_list(&mut self, kind: ListKind) {
            self.calls.push(format!("list {:?}", kind));
        }
        fn insert_rule(&mut self) {
            self.calls.push("rule".to_string());
        }
        fn undo(&mut self) {
            self.calls.push("undo".to_string());
        }
        fn redo(&mut self) {
            self.calls.push("redo".to_string());
        }
        fn toggle_mark(&mut self, kind: MarkKind) {
            self.calls.push(format!("mark {:?}", kind));
        }
        fn delete_range(&mut self, from: Position, to: Position) {
            self.calls.push(format!("delete {}..{}", from.col, to.col));
        }
    }

    #[test]
    fn test_titles_are_unique() {
        for (i, a) in COMMANDS.iter().enumerate() {
            for b in &COMMANDS[i + 1..] {
                assert_ne!(a.title, b.title);
            }
        }
    }

    #[test]
    fn test_each_action_hits_one_mutation() {
        let mut doc = Recorder::default();
        for command in COMMANDS {
            command.action.apply(&mut doc);
        }
        assert_eq!(
            doc.calls,
            vec![
                "heading 1",
                "heading 2",
                "list Bullet",
                "list Ordered",
                "rule",
                "undo",
                "redo",
                "mark Bold",
                "mark Italic",
            ]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive_and_ordered() {
        let titles: Vec<_> = filter_commands(COMMANDS, "LIST").iter().map(|c| c.title).collect();
        assert_eq!(titles, vec!["Bullet List", "Numbered List"]);

        assert_eq!(filter_commands(COMMANDS, "").len(), COMMANDS.len());
        assert!(filter_commands(COMMANDS, "zzz").is_empty());
    }
}
