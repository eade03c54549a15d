//! Selection menu shown inside the slash popup

use super::command::{filter_commands, Command};
use crate::input::Key;

/// Menu state: active with a highlighted row, or resolved after a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Active(usize),
    Resolved,
}

/// What the menu did with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// Not a menu key, the host should process it
    Ignored,
    /// Consumed without a selection
    Consumed,
    /// The menu resolved to this command
    Selected(Command),
}

/// Filtered command list with a highlighted row
#[derive(Debug, Clone)]
pub struct SelectionMenu {
    commands: &'static [Command],
    query: String,
    items: Vec<Command>,
    state: MenuState,
}

impl SelectionMenu {
    pub fn new(commands: &'static [Command], query: &str) -> Self {
        Self {
            commands,
            query: query.to_string(),
            items: filter_commands(commands, query),
            state: MenuState::Active(0),
        }
    }

    pub fn items(&self) -> &[Command] {
        &self.items
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == MenuState::Resolved
    }

    /// Highlighted row, `None` once resolved
    pub fn highlighted(&self) -> Option<usize> {
        match self.state {
            MenuState::Active(i) => Some(i),
            MenuState::Resolved => None,
        }
    }

    /// Re-filter for a new query. The highlight returns to the first row
    /// because the old index pointed into a different list.
    pub fn set_query(&mut self, query: &str) {
        if self.is_resolved() || self.query == query {
            return;
        }
        self.query = query.to_string();
        self.items = filter_commands(self.commands, query);
        self.state = MenuState::Active(0);
    }

    fn last_index(&self) -> usize {
        self.items.len().saturating_sub(1)
    }

    /// Move the highlight down one row, stopping at the last row
    pub fn move_down(&mut self) {
        if let MenuState::Active(i) = self.state {
            self.state = MenuState::Active((i + 1).min(self.last_index()));
        }
    }

    /// Move the highlight up one row, stopping at the first row
    pub fn move_up(&mut self) {
        if let MenuState::Active(i) = self.state {
            self.state = MenuState::Active(i.saturating_sub(1));
        }
    }

    /// Pointer hover over row `index`
    pub fn hover(&mut self, index: usize) {
        if matches!(self.state, MenuState::Active(_)) && index < self.items.len() {
            self.state = MenuState::Active(index);
        }
    }

    /// Pointer click on row `index`; selects it regardless of the highlight
    pub fn click(&mut self, index: usize) -> Option<Command> {
        if self.is_resolved() {
            return None;
        }
        let command = *self.items.get(index)?;
        self.state = MenuState::Resolved;
        Some(command)
    }

    /// Resolve the highlighted row, if there is one
    pub fn select(&mut self) -> Option<Command> {
        let MenuState::Active(i) = self.state else {
            return None;
        };
        let command = *self.items.get(i)?;
        self.state = MenuState::Resolved;
        Some(command)
    }

    /// Handle a navigation or selection key.
    ///
    /// Enter is consumed even when there is nothing to select so it never
    /// reaches the document as a line break.
    pub fn handle_key(&mut self, key: &Key) -> MenuOutcome {
        if self.is_resolved() {
            return MenuOutcome::Ignored;
        }
        match key {
            Key::Down => {
                self.move_down();
                MenuOutcome::Consumed
            }
            Key::Up => {
                self.move_up();
                MenuOutcome::Consumed
            }
            Key::Enter => match self.select() {
                Some(command) => MenuOutcome::Selected(command),
                None => MenuOutcome::Consumed,
            },
            _ => MenuOutcome::Ignored,
        }
    }
}
