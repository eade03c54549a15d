//! Slash commands
//!
//! Typing the trigger character (`/` by default) at the start of a word opens
//! a popup listing formatting commands. The popup filters as the user types,
//! is navigated with the arrow keys or the mouse, and applies the chosen
//! command in place of the typed trigger text.

mod command;
mod layer;
mod menu;
mod popup;
mod trigger;

pub use command::{DocumentHandle, ListKind, MarkKind, COMMANDS};
pub use layer::{Overlay, OverlayHost, Rect};
pub use menu::{MenuState, SelectionMenu};
pub use popup::{KeyDispatch, PopupController, Selection};
pub use trigger::{Trigger, TriggerEvent, TriggerTracker};
