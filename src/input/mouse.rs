//! Mouse event handling

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

/// Mouse button types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
    Middle,
}

impl From<MouseButton> for Button {
    fn from(button: MouseButton) -> Self {
        match button {
            MouseButton::Left => Button::Left,
            MouseButton::Right => Button::Right,
            MouseButton::Middle => Button::Middle,
        }
    }
}

/// Abstracted mouse event, positions are 0-indexed cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mouse {
    Click { button: Button, col: u16, row: u16 },
    /// Pointer moved with no button held
    Moved { col: u16, row: u16 },
    ScrollUp { col: u16, row: u16 },
    ScrollDown { col: u16, row: u16 },
}

impl Mouse {
    pub fn from_crossterm(event: MouseEvent) -> Option<Self> {
        let col = event.column;
        let row = event.row;

        match event.kind {
            MouseEventKind::Down(button) => Some(Mouse::Click { button: button.into(), col, row }),
            MouseEventKind::Moved => Some(Mouse::Moved { col, row }),
            MouseEventKind::ScrollUp => Some(Mouse::ScrollUp { col, row }),
            MouseEventKind::ScrollDown => Some(Mouse::ScrollDown { col, row }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn event(kind: MouseEventKind) -> MouseEvent {
        MouseEvent { kind, column: 4, row: 7, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn test_from_crossterm() {
        assert_eq!(
            Mouse::from_crossterm(event(MouseEventKind::Down(MouseButton::Left))),
            Some(Mouse::Click { button: Button::Left, col: 4, row: 7 })
        );
        assert_eq!(Mouse::from_crossterm(event(MouseEventKind::Moved)), Some(Mouse::Moved { col: 4, row: 7 }));
        assert_eq!(Mouse::from_crossterm(event(MouseEventKind::Up(MouseButton::Left))), None);
    }
}
