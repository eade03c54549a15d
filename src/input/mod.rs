//! Terminal input, decoupled from crossterm's event types

mod key;
mod mouse;

pub use key::{Key, Modifiers};
pub use mouse::{Button, Mouse};
