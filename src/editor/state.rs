use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;
use tracing::{debug, error};

use crate::input::{Key, Modifiers, Mouse};
use crate::journal::Session;
use crate::render::{Screen, View};

use super::{Composer, Document};

const QUIT_PROMPT: &str = "Unsaved changes. [S]ave / [D]iscard / [C]ancel";

/// Prompt shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptState {
    None,
    /// Quit prompt: Save/Discard/Cancel
    QuitConfirm,
    /// Verse number of a favorite to mark (label, input so far)
    FavoriteVerse { label: String, buffer: String },
}

/// The terminal journal editor
pub struct Editor {
    screen: Screen,
    composer: Composer,
    session: Session,
    running: bool,
    /// Status bar message, cleared on the next key
    message: Option<String>,
    /// Escape key timeout in milliseconds (for Alt key detection)
    escape_time: u64,
    prompt: PromptState,
}

impl Editor {
    pub fn new(session: Session, trigger_char: char, escape_time: u64) -> Result<Self> {
        let document = Document::from_text(&session.initial_reflection());
        Ok(Self {
            screen: Screen::new()?,
            composer: Composer::new(document, trigger_char),
            session,
            running: true,
            message: None,
            escape_time,
            prompt: PromptState::None,
        })
    }

    /// Take over the terminal until the user quits
    pub fn run(&mut self) -> Result<()> {
        self.screen.enter_raw_mode()?;
        let result = self.event_loop();
        self.screen.leave_raw_mode()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        self.screen.refresh_size()?;
        self.render()?;

        while self.running {
            if !event::poll(Duration::from_millis(250))? {
                continue;
            }
            let event = event::read()?;
            self.handle_event(event)?;

            // Drain queued events before rendering
            while self.running && event::poll(Duration::from_millis(0))? {
                let event = event::read()?;
                self.handle_event(event)?;
            }

            if self.running {
                self.screen.refresh_size()?;
                self.render()?;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => self.process_key(key_event),
            Event::Mouse(mouse_event) => {
                self.process_mouse(mouse_event);
                Ok(())
            }
            Event::Resize(cols, rows) => {
                self.screen.cols = cols;
                self.screen.rows = rows;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn process_key(&mut self, key_event: KeyEvent) -> Result<()> {
        // A bare Escape may be the start of an Alt sequence
        if key_event.code == KeyCode::Esc && key_event.modifiers.is_empty() {
            let timeout = Duration::from_millis(self.escape_time);

            if event::poll(timeout)? {
                if let Event::Key(next_event) = event::read()? {
                    let (key, mut mods) = Key::from_crossterm(next_event);
                    mods.alt = true;
                    self.handle_key_with_mods(key, mods);
                    return Ok(());
                }
            }
            // No key followed - it's a real Escape
            self.handle_key_with_mods(Key::Escape, Modifiers::default());
            return Ok(());
        }

        let (key, mods) = Key::from_crossterm(key_event);
        self.handle_key_with_mods(key, mods);
        Ok(())
    }

    fn process_mouse(&mut self, mouse_event: MouseEvent) {
        if let Some(mouse) = Mouse::from_crossterm(mouse_event) {
            if self.prompt == PromptState::None {
                self.composer.handle_mouse(mouse);
            }
        }
    }

    fn handle_key_with_mods(&mut self, key: Key, mods: Modifiers) {
        if self.prompt != PromptState::None {
            self.handle_prompt_key(key);
            return;
        }

        // Clear message on any key
        self.message = None;

        match (&key, &mods) {
            (Key::Char('q'), Modifiers { ctrl: true, .. }) => self.try_quit(),
            (Key::Char('s'), Modifiers { ctrl: true, .. }) => {
                self.save();
            }
            (Key::Char('f'), Modifiers { ctrl: true, .. }) => {
                let label = format!("Favorite verse in {}: ", self.session.selection());
                self.message = Some(label.clone());
                self.prompt = PromptState::FavoriteVerse { label, buffer: String::new() };
            }
            _ => {
                if !self.composer.handle_key(key.clone(), mods) {
                    debug!(?key, ?mods, "unbound key");
                }
                if let Some(title) = self.composer.take_notice() {
                    self.message = Some(title.to_string());
                }
            }
        }
    }

    /// Save the note as today's devotional. Returns false on failure.
    fn save(&mut self) -> bool {
        let reflection = self.composer.document().text();
        match self.session.save(reflection, Utc::now()) {
            Ok(_) => {
                self.composer.document_mut().mark_saved();
                self.message = Some("Devotional saved".to_string());
                true
            }
            Err(e) => {
                error!(error = %e, "saving devotional failed");
                self.message = Some(format!("Save failed: {}", e));
                false
            }
        }
    }

    // === Quit and prompt handling ===

    /// Mark or unmark a verse of the current passage, quoting the
    /// selection or the cursor line
    fn toggle_favorite(&mut self, input: &str) {
        let Ok(verse) = input.trim().parse::<u32>() else {
            self.message = Some(format!("Not a verse number: {input:?}"));
            return;
        };
        let text = self.composer.document().quoted_text();
        self.message = Some(match self.session.toggle_favorite(verse, text) {
            Ok((reference, true)) => format!("Marked {reference}"),
            Ok((reference, false)) => format!("Unmarked {reference}"),
            Err(e) => e.to_string(),
        });
    }

    fn try_quit(&mut self) {
        if self.composer.document().is_modified() || self.session.has_unsaved_favorites() {
            self.prompt = PromptState::QuitConfirm;
            self.message = Some(QUIT_PROMPT.to_string());
        } else {
            self.running = false;
        }
    }

    fn handle_prompt_key(&mut self, key: Key) {
        if let PromptState::FavoriteVerse { ref label, ref mut buffer } = self.prompt {
            match key {
                Key::Enter => {
                    let input = std::mem::take(buffer);
                    self.prompt = PromptState::None;
                    self.toggle_favorite(&input);
                }
                Key::Escape => {
                    self.prompt = PromptState::None;
                    self.message = Some("Cancelled".to_string());
                }
                Key::Backspace => {
                    buffer.pop();
                    self.message = Some(format!("{}{}", label, buffer));
                }
                Key::Char(c) => {
                    buffer.push(c);
                    self.message = Some(format!("{}{}", label, buffer));
                }
                _ => {}
            }
            return;
        }

        match key {
            Key::Char('s') | Key::Char('S') => {
                if self.save() {
                    self.running = false;
                }
                self.prompt = PromptState::None;
            }
            Key::Char('d') | Key::Char('D') => {
                self.running = false;
                self.prompt = PromptState::None;
            }
            Key::Char('c') | Key::Char('C') | Key::Escape => {
                self.prompt = PromptState::None;
                self.message = None;
            }
            _ => {
                self.message = Some(QUIT_PROMPT.to_string());
            }
        }
    }

    fn render(&mut self) -> Result<()> {
        let area = self.screen.text_area(self.session.favorites().len());
        self.composer.set_layout(area, self.screen.bounds());

        let title = self.session.title();
        let passage = self.session.selection().to_string();
        let view = View {
            title: &title,
            passage: &passage,
            composer: &self.composer,
            favorites: self.session.favorites(),
            message: self.message.as_deref(),
        };
        self.screen.render(&view)
    }
}
