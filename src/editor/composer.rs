//! Note composer: the document plus its slash popup
//!
//! Independent of the terminal so the key and mouse paths can be driven
//! directly. The terminal editor owns one and feeds it input events.

use crate::input::{Button, Key, Modifiers, Mouse};
use crate::slash::{
    DocumentHandle, KeyDispatch, Overlay, OverlayHost, PopupController, Rect, Selection, SelectionMenu, Trigger, TriggerEvent,
    TriggerTracker, COMMANDS,
};
use crate::util::{char_width, display_width};

use super::Document;

/// Minimum popup width in cells (border included)
const MENU_MIN_WIDTH: u16 = 20;

/// Where the note text sits on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextLayout {
    /// Text area (excluding header and status rows)
    pub area: Rect,
    /// Whole screen, the popup may overlap anything inside it
    pub bounds: Rect,
    /// First visible line
    pub scroll: usize,
}

impl TextLayout {
    /// Screen cell of column `col` in `line`, if it is visible
    pub fn cell(&self, line_idx: usize, line: &str, col: usize) -> Option<(u16, u16)> {
        if line_idx < self.scroll || line_idx >= self.scroll + self.area.height as usize {
            return None;
        }
        let prefix: String = line.chars().take(col).collect();
        let x = self.area.x as usize + display_width(&prefix);
        if x >= self.area.right() as usize {
            return None;
        }
        Some((x as u16, self.area.y + (line_idx - self.scroll) as u16))
    }

    /// Anchor for a trigger: the cell of its trigger character
    pub fn anchor(&self, line: &str, trigger: &Trigger) -> Option<Rect> {
        self.cell(trigger.line, line, trigger.start_col)
            .map(|(x, y)| Rect::new(x, y, 1, 1))
    }
}

/// Popup frame width for a menu
pub fn menu_width(menu: &SelectionMenu) -> u16 {
    let widest = menu.items().iter().map(|c| display_width(c.title)).max().unwrap_or(0);
    // Border, padding and the enter marker
    (widest as u16 + 6).max(MENU_MIN_WIDTH)
}

/// Document, trigger tracking and popup, wired together
pub struct Composer {
    document: Document,
    popup: PopupController<OverlayHost>,
    tracker: TriggerTracker,
    layout: TextLayout,
    /// First menu item shown when the frame is shorter than the list
    menu_scroll: usize,
    notice: Option<&'static str>,
}

impl Composer {
    pub fn new(document: Document, trigger_char: char) -> Self {
        Self {
            document,
            popup: PopupController::new(OverlayHost, COMMANDS),
            tracker: TriggerTracker::new(trigger_char),
            layout: TextLayout::default(),
            menu_scroll: 0,
            notice: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn popup(&self) -> &PopupController<OverlayHost> {
        &self.popup
    }

    pub fn layout(&self) -> TextLayout {
        self.layout
    }

    /// Title of the last applied slash command, taken once
    pub fn take_notice(&mut self) -> Option<&'static str> {
        self.notice.take()
    }

    /// Update the screen geometry (on start and resize)
    pub fn set_layout(&mut self, area: Rect, bounds: Rect) {
        if self.layout.area == area && self.layout.bounds == bounds {
            return;
        }
        self.layout.area = area;
        self.layout.bounds = bounds;
        self.scroll_to_cursor();
        self.reposition_popup();
        self.follow_highlight();
    }

    /// On-screen frame of the popup menu, when it is visible
    pub fn menu_frame(&self) -> Option<(Rect, &SelectionMenu)> {
        let session = self.popup.session().filter(|s| s.is_visible())?;
        let overlay: &Overlay = session.layer()?;
        let menu = session.menu()?;
        let rows = menu.items().len().max(1) as u16;
        Some((overlay.frame(rows, menu_width(menu), self.layout.bounds), menu))
    }

    pub fn menu_scroll(&self) -> usize {
        self.menu_scroll
    }

    fn menu_row_at(&self, col: u16, row: u16) -> Option<usize> {
        let (frame, menu) = self.menu_frame()?;
        if !frame.contains(col, row) || row <= frame.y {
            return None;
        }
        let index = self.menu_scroll + (row - frame.y - 1) as usize;
        (index < menu.items().len()).then_some(index)
    }

    /// Handle a key. Returns false if the key means nothing to the note.
    pub fn handle_key(&mut self, key: Key, mods: Modifiers) -> bool {
        let handled = self.route_key(key, mods);
        self.follow_highlight();
        handled
    }

    fn route_key(&mut self, key: Key, mods: Modifiers) -> bool {
        match self.popup.dispatch_key(&key) {
            KeyDispatch::Handled => return true,
            KeyDispatch::Selected(selection) => {
                self.apply_selection(selection);
                return true;
            }
            KeyDispatch::Unhandled => {}
        }

        // Each typing run is its own undo unit
        let is_typing = matches!((&key, &mods), (Key::Char(_), Modifiers { ctrl: false, alt: false, .. }));
        if !is_typing {
            self.document.break_undo_group();
        }

        let page = self.layout.area.height.max(1);
        let doc = &mut self.document;
        match (&key, &mods) {
            (Key::Char('z'), Modifiers { ctrl: true, shift: false, .. }) => {
                doc.undo();
            }
            (Key::Char('z'), Modifiers { ctrl: true, shift: true, .. })
            | (Key::Char('y'), Modifiers { ctrl: true, .. }) => {
                doc.redo();
            }

            (Key::Up, Modifiers { shift, .. }) => doc.move_up(*shift),
            (Key::Down, Modifiers { shift, .. }) => doc.move_down(*shift),
            (Key::Left, Modifiers { shift, .. }) => doc.move_left(*shift),
            (Key::Right, Modifiers { shift, .. }) => doc.move_right(*shift),
            (Key::Home, Modifiers { shift, .. }) => doc.move_home(*shift),
            (Key::End, Modifiers { shift, .. }) => doc.move_end(*shift),
            (Key::PageUp, Modifiers { shift, .. }) => (0..page).for_each(|_| doc.move_up(*shift)),
            (Key::PageDown, Modifiers { shift, .. }) => (0..page).for_each(|_| doc.move_down(*shift)),

            (Key::Char(c), Modifiers { ctrl: false, alt: false, .. }) => doc.insert_char(*c),
            (Key::Enter, _) => doc.insert_newline(),
            (Key::Backspace, _) => doc.backspace(),
            (Key::Delete, _) => doc.delete_forward(),
            (Key::Tab, _) => doc.insert_text("    "),
            (Key::Escape, _) => doc.clear_selection(),

            _ => return false,
        }

        self.after_edit();
        true
    }

    /// Handle a mouse event. Returns true if anything changed.
    pub fn handle_mouse(&mut self, mouse: Mouse) -> bool {
        let handled = self.route_mouse(mouse);
        self.follow_highlight();
        handled
    }

    fn route_mouse(&mut self, mouse: Mouse) -> bool {
        match mouse {
            Mouse::Click { button: Button::Left, col, row } => {
                if let Some(index) = self.menu_row_at(col, row) {
                    if let Some(selection) = self.popup.on_click(index) {
                        self.apply_selection(selection);
                    }
                    return true;
                }
                if !self.layout.area.contains(col, row) {
                    return false;
                }
                let line = self.layout.scroll + (row - self.layout.area.y) as usize;
                let text = self.document.line(line);
                let col = column_at(&text, (col - self.layout.area.x) as usize);
                self.document.set_cursor(line, col);
                self.after_edit();
                true
            }
            Mouse::Moved { col, row } => match self.menu_row_at(col, row) {
                Some(index) => {
                    self.popup.on_hover(index);
                    true
                }
                None => false,
            },
            Mouse::ScrollUp { .. } => {
                self.layout.scroll = self.layout.scroll.saturating_sub(3);
                self.reposition_popup();
                true
            }
            Mouse::ScrollDown { .. } => {
                let max = self.document.line_count().saturating_sub(self.layout.area.height as usize);
                self.layout.scroll = (self.layout.scroll + 3).min(max);
                self.reposition_popup();
                true
            }
            _ => false,
        }
    }

    fn apply_selection(&mut self, selection: Selection) {
        let Selection { command, trigger } = selection;
        self.document.delete_range(trigger.from(), trigger.to());
        command.action.apply(&mut self.document);
        self.notice = Some(command.title);
        self.after_edit();
    }

    fn after_edit(&mut self) {
        self.scroll_to_cursor();
        self.sync_trigger();
    }

    /// Feed the cursor line to the trigger tracker and forward its events
    fn sync_trigger(&mut self) {
        let cursor = *self.document.cursor();
        let line = self.document.line(cursor.line);
        let events = self.tracker.observe(&line, cursor.line, cursor.col, cursor.has_selection());

        for event in events {
            match event {
                TriggerEvent::Start(trigger) => {
                    let anchor = self.layout.anchor(&line, &trigger);
                    self.popup.on_trigger_start(trigger, &move || anchor);
                }
                TriggerEvent::Update(trigger) => {
                    let anchor = self.layout.anchor(&line, &trigger);
                    self.popup.on_trigger_update(trigger, &move || anchor);
                }
                TriggerEvent::Exit => self.popup.on_exit(),
            }
        }
    }

    /// Scroll the menu so the highlighted item stays inside its frame
    fn follow_highlight(&mut self) {
        let highlighted = self.popup.session().and_then(|s| s.highlighted_index());
        let scroll = match self.menu_frame() {
            Some((frame, menu)) => {
                let rows = frame.height.saturating_sub(2) as usize;
                let scroll = self.menu_scroll.min(menu.items().len().saturating_sub(rows));
                match highlighted {
                    Some(i) if i < scroll => i,
                    Some(i) if rows > 0 && i >= scroll + rows => i + 1 - rows,
                    _ => scroll,
                }
            }
            None => 0,
        };
        self.menu_scroll = scroll;
    }

    /// Re-anchor the popup after the text moved under it
    fn reposition_popup(&mut self) {
        if !self.popup.is_active() {
            return;
        }
        let Some(trigger) = self.tracker.active().cloned() else {
            return;
        };
        let line = self.document.line(trigger.line);
        let anchor = self.layout.anchor(&line, &trigger);
        self.popup.on_trigger_update(trigger, &move || anchor);
    }

    fn scroll_to_cursor(&mut self) {
        let rows = self.layout.area.height as usize;
        if rows == 0 {
            return;
        }
        let line = self.document.cursor().line;
        if line < self.layout.scroll {
            self.layout.scroll = line;
        } else if line >= self.layout.scroll + rows {
            self.layout.scroll = line + 1 - rows;
        }
    }
}

/// Char column under display column `x` of `line`
fn column_at(line: &str, x: usize) -> usize {
    let mut width = 0;
    for (i, c) in line.chars().enumerate() {
        let w = char_width(c);
        if width + w > x {
            return i;
        }
        width += w;
    }
    line.chars().count()
}
