//! Popup controller
//!
//! Bridges trigger lifecycle events to a floating menu. One session exists
//! per trigger; it is created on start, torn down exactly once on selection
//! or exit, and never reused.
//!
//! Keys go through a single ordered dispatch: the controller stage sees
//! cancellation keys first, then the menu stage sees navigation and
//! selection keys. Anything left over belongs to the document.

use tracing::{debug, warn};

use super::command::Command;
use super::layer::{resolve_anchor, AnchorSource, FloatingLayer, LayerHost, Rect};
use super::menu::{MenuOutcome, SelectionMenu};
use super::trigger::Trigger;
use crate::input::Key;

/// State for one trigger-to-resolution cycle
#[derive(Debug)]
pub struct PopupSession<L> {
    id: u64,
    trigger: Trigger,
    anchor: Rect,
    layer: Option<L>,
    menu: Option<SelectionMenu>,
    destroyed: bool,
    hidden: bool,
}

impl<L> PopupSession<L> {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn anchor(&self) -> Rect {
        self.anchor
    }

    #[cfg(test)]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Hidden by Escape; the session stays live until the host exits it
    #[cfg(test)]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_visible(&self) -> bool {
        !self.destroyed && !self.hidden && self.layer.is_some()
    }

    pub fn layer(&self) -> Option<&L> {
        self.layer.as_ref()
    }

    pub fn menu(&self) -> Option<&SelectionMenu> {
        self.menu.as_ref()
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.menu.as_ref().and_then(|m| m.highlighted())
    }
}

/// A resolved selection: the command plus the trigger text it replaces
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub command: Command,
    pub trigger: Trigger,
}

/// Result of routing a key through the popup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyDispatch {
    /// The host should process the key
    Unhandled,
    /// The popup consumed the key
    Handled,
    /// The popup consumed the key and resolved a selection
    Selected(Selection),
}

/// Owns at most one [`PopupSession`] at a time
pub struct PopupController<H: LayerHost> {
    host: H,
    commands: &'static [Command],
    session: Option<PopupSession<H::Layer>>,
    next_id: u64,
}

impl<H: LayerHost> PopupController<H> {
    pub fn new(host: H, commands: &'static [Command]) -> Self {
        Self {
            host,
            commands,
            session: None,
            next_id: 1,
        }
    }

    /// Current (possibly destroyed) session
    pub fn session(&self) -> Option<&PopupSession<H::Layer>> {
        self.session.as_ref()
    }

    /// Whether a session is live and not destroyed
    pub fn is_active(&self) -> bool {
        self.live().is_some()
    }

    /// Whether the popup is currently on screen
    pub fn is_visible(&self) -> bool {
        self.session.as_ref().map_or(false, |s| s.is_visible())
    }

    fn live(&self) -> Option<&PopupSession<H::Layer>> {
        self.session.as_ref().filter(|s| !s.destroyed)
    }

    fn live_mut(&mut self) -> Option<&mut PopupSession<H::Layer>> {
        self.session.as_mut().filter(|s| !s.destroyed)
    }

    /// Open a new session for `trigger`. A session that is still live is
    /// torn down first so there is never more than one.
    pub fn on_trigger_start<A: AnchorSource + ?Sized>(&mut self, trigger: Trigger, anchor: &A) {
        if let Some(old) = self.live_mut() {
            warn!(session = old.id, "trigger started while a session was live, closing it");
            Self::teardown(old);
        }

        let anchor = resolve_anchor(anchor);
        let id = self.next_id;
        self.next_id += 1;

        let menu = SelectionMenu::new(self.commands, &trigger.query);
        let layer = self.host.mount(anchor);
        debug!(session = id, line = trigger.line, col = trigger.start_col, items = menu.items().len(), "slash popup opened");

        self.session = Some(PopupSession {
            id,
            trigger,
            anchor,
            layer: Some(layer),
            menu: Some(menu),
            destroyed: false,
            hidden: false,
        });
    }

    /// Follow the trigger as the query grows or the cursor moves.
    /// Does nothing when no session is live.
    pub fn on_trigger_update<A: AnchorSource + ?Sized>(&mut self, trigger: Trigger, anchor: &A) {
        let Some(session) = self.live_mut() else {
            return;
        };

        if let Some(menu) = session.menu.as_mut() {
            menu.set_query(&trigger.query);
        }
        session.trigger = trigger;
        session.anchor = resolve_anchor(anchor);
        if let Some(layer) = session.layer.as_mut() {
            layer.reposition(session.anchor);
        }
    }

    /// Controller stage of key handling. Escape hides the popup and is
    /// handled; every other key is left for the next stage.
    pub fn on_key_down(&mut self, key: &Key) -> bool {
        let Some(session) = self.live_mut() else {
            return false;
        };
        if *key != Key::Escape {
            return false;
        }
        if let Some(layer) = session.layer.as_mut() {
            layer.hide();
        }
        if !session.hidden {
            debug!(session = session.id, "slash popup hidden");
        }
        session.hidden = true;
        true
    }

    /// Route a key through the controller stage, then the menu stage.
    pub fn dispatch_key(&mut self, key: &Key) -> KeyDispatch {
        if self.on_key_down(key) {
            return KeyDispatch::Handled;
        }

        let Some(session) = self.live_mut() else {
            return KeyDispatch::Unhandled;
        };
        if session.hidden {
            return KeyDispatch::Unhandled;
        }
        let Some(menu) = session.menu.as_mut() else {
            return KeyDispatch::Unhandled;
        };

        match menu.handle_key(key) {
            MenuOutcome::Ignored => KeyDispatch::Unhandled,
            MenuOutcome::Consumed => KeyDispatch::Handled,
            MenuOutcome::Selected(command) => KeyDispatch::Selected(Self::resolve(session, command)),
        }
    }

    /// Pointer click on menu row `index`
    pub fn on_click(&mut self, index: usize) -> Option<Selection> {
        let session = self.live_mut().filter(|s| !s.hidden)?;
        let command = session.menu.as_mut()?.click(index)?;
        Some(Self::resolve(session, command))
    }

    /// Pointer hover over menu row `index`
    pub fn on_hover(&mut self, index: usize) {
        if let Some(menu) = self.live_mut().filter(|s| !s.hidden).and_then(|s| s.menu.as_mut()) {
            menu.hover(index);
        }
    }

    /// The host ended the trigger. Safe to call any number of times.
    pub fn on_exit(&mut self) {
        if let Some(session) = self.live_mut() {
            debug!(session = session.id, "slash popup closed");
            Self::teardown(session);
        }
    }

    fn resolve(session: &mut PopupSession<H::Layer>, command: Command) -> Selection {
        debug!(session = session.id, command = command.title, "slash command selected");
        let trigger = session.trigger.clone();
        Self::teardown(session);
        Selection { command, trigger }
    }

    fn teardown(session: &mut PopupSession<H::Layer>) {
        session.destroyed = true;
        if let Some(mut layer) = session.layer.take() {
            layer.destroy();
        }
        session.menu = None;
    }
}
