use anyhow::Result;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{stdout, Stdout, Write};

use crate::editor::{parse_block, Block, Composer, Position};
use crate::journal::Favorites;
use crate::slash::{MenuState, Rect, SelectionMenu};
use crate::util::{display_width, truncate_to_width};

// Journal color scheme (256-color palette)
const BG_COLOR: Color = Color::AnsiValue(234);
const CURRENT_LINE_BG: Color = Color::AnsiValue(235);
const DIM_COLOR: Color = Color::AnsiValue(243);
const HEADING_COLOR: Color = Color::AnsiValue(222);
const SUBHEADING_COLOR: Color = Color::AnsiValue(110);
const MARKER_COLOR: Color = Color::AnsiValue(110);
const MENU_BG: Color = Color::AnsiValue(237);
const MENU_HIGHLIGHT_BG: Color = Color::AnsiValue(24);

/// Title, passage line and the dashed rule under them
const HEADER_ROWS: u16 = 3;
/// Left and right margin of the note
const MARGIN: u16 = 2;
/// Favorites listed under the note at most
const MAX_FAVORITES: usize = 3;

/// Everything one frame shows
pub struct View<'a> {
    pub title: &'a str,
    pub passage: &'a str,
    pub composer: &'a Composer,
    pub favorites: &'a Favorites,
    pub message: Option<&'a str>,
}

/// Terminal screen renderer
pub struct Screen {
    stdout: Stdout,
    pub rows: u16,
    pub cols: u16,
    keyboard_enhanced: bool,
}

impl Screen {
    pub fn new() -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            stdout: stdout(),
            rows,
            cols,
            keyboard_enhanced: false,
        })
    }

    pub fn enter_raw_mode(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        execute!(self.stdout, EnterAlternateScreen, EnableMouseCapture, Hide)?;

        // Kitty keyboard protocol, where supported, tells Escape apart from Alt
        if execute!(
            self.stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )
        .is_ok()
        {
            self.keyboard_enhanced = true;
        }

        Ok(())
    }

    pub fn leave_raw_mode(&mut self) -> Result<()> {
        if self.keyboard_enhanced {
            let _ = execute!(self.stdout, PopKeyboardEnhancementFlags);
        }
        execute!(self.stdout, Show, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub fn refresh_size(&mut self) -> Result<()> {
        let (cols, rows) = terminal::size()?;
        self.cols = cols;
        self.rows = rows;
        Ok(())
    }

    /// The whole terminal
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.cols, self.rows)
    }

    /// Area left for the note once header, favorites and status bar are placed
    pub fn text_area(&self, favorite_count: usize) -> Rect {
        let footer = footer_rows(favorite_count);
        let height = self.rows.saturating_sub(HEADER_ROWS + footer + 1);
        let width = self.cols.saturating_sub(MARGIN * 2);
        Rect::new(MARGIN, HEADER_ROWS, width, height)
    }

    /// Render a frame
    pub fn render(&mut self, view: &View) -> Result<()> {
        // Hide cursor during render to prevent flicker
        execute!(self.stdout, Hide)?;

        self.render_header(view)?;
        self.render_note(view.composer)?;
        self.render_favorites(view.favorites, view.composer.layout().area)?;
        self.render_status_bar(view)?;

        if let Some((frame, menu)) = view.composer.menu_frame() {
            self.render_menu(frame, menu, view.composer.menu_scroll())?;
        }

        let doc = view.composer.document();
        let cursor = doc.cursor();
        let line = doc.line(cursor.line);
        match view.composer.layout().cell(cursor.line, &line, cursor.col) {
            Some((x, y)) => execute!(self.stdout, MoveTo(x, y), Show)?,
            None => execute!(self.stdout, Hide)?,
        }

        self.stdout.flush()?;
        Ok(())
    }

    fn render_header(&mut self, view: &View) -> Result<()> {
        let cols = self.cols as usize;

        let pad = cols.saturating_sub(display_width(view.title)) / 2;
        execute!(
            self.stdout,
            MoveTo(0, 0),
            SetBackgroundColor(BG_COLOR),
            Clear(ClearType::UntilNewLine),
            MoveTo(pad as u16, 0),
            SetForegroundColor(Color::White),
            SetAttribute(Attribute::Bold),
            Print(truncate_to_width(view.title, cols)),
            SetAttribute(Attribute::Reset),
        )?;

        let hint = "/ commands  ^F favorite  ^S save  ^Q quit ";
        let left = format!("{}{}", " ".repeat(MARGIN as usize), view.passage);
        let gap = cols.saturating_sub(display_width(&left) + display_width(hint));
        execute!(
            self.stdout,
            MoveTo(0, 1),
            SetBackgroundColor(BG_COLOR),
            SetForegroundColor(MARKER_COLOR),
            Print(truncate_to_width(&left, cols)),
            SetForegroundColor(DIM_COLOR),
            Print(" ".repeat(gap)),
            Print(if gap > 0 { hint } else { "" }),
            Clear(ClearType::UntilNewLine),
        )?;

        execute!(
            self.stdout,
            MoveTo(0, 2),
            SetForegroundColor(DIM_COLOR),
            Print("╌".repeat(cols)),
            ResetColor
        )?;
        Ok(())
    }

    fn render_note(&mut self, composer: &Composer) -> Result<()> {
        let layout = composer.layout();
        let area = layout.area;
        let doc = composer.document();
        let cursor = doc.cursor();
        let selection = cursor.selection_bounds();

        for row in 0..area.height {
            let line_idx = layout.scroll + row as usize;
            let screen_row = area.y + row;
            let is_current_line = line_idx == cursor.line;
            let line_bg = if is_current_line { CURRENT_LINE_BG } else { BG_COLOR };

            execute!(
                self.stdout,
                MoveTo(0, screen_row),
                SetBackgroundColor(line_bg),
                Print(" ".repeat(area.x as usize)),
            )?;

            if line_idx < doc.line_count() {
                let line = doc.line(line_idx);
                self.render_line(&line, line_idx, area.width as usize, selection.as_ref(), line_bg)?;
            }

            execute!(
                self.stdout,
                SetBackgroundColor(line_bg),
                Clear(ClearType::UntilNewLine),
                ResetColor
            )?;
        }
        Ok(())
    }

    /// One note line, styled by its block kind with the selection highlighted
    fn render_line(
        &mut self,
        line: &str,
        line_idx: usize,
        max_cols: usize,
        selection: Option<&(Position, Position)>,
        line_bg: Color,
    ) -> Result<()> {
        let (block, prefix_len) = parse_block(line);

        if block == Block::Rule {
            return Ok(execute!(
                self.stdout,
                SetForegroundColor(DIM_COLOR),
                Print("─".repeat(max_cols)),
            )?);
        }

        let (sel_start, sel_end) = match selection {
            Some((start, end)) if line_idx >= start.line && line_idx <= end.line => {
                let s = if line_idx == start.line { start.col } else { 0 };
                let e = if line_idx == end.line { end.col } else { usize::MAX };
                (s, e)
            }
            _ => (0, 0),
        };

        let body_color = match block {
            Block::Heading(1) => HEADING_COLOR,
            Block::Heading(_) => SUBHEADING_COLOR,
            _ => Color::Reset,
        };
        if matches!(block, Block::Heading(_)) {
            execute!(self.stdout, SetAttribute(Attribute::Bold))?;
        }

        let mut used = 0;
        for (col, ch) in line.chars().enumerate() {
            let width = crate::util::char_width(ch);
            if used + width > max_cols {
                break;
            }
            used += width;

            let in_prefix = col < prefix_len;
            // Bullets draw as a dot, same width as the markdown marker
            let shown = if in_prefix && block == Block::Bullet && col == 0 { '•' } else { ch };
            let (fg, bg) = if col >= sel_start && col < sel_end {
                (Color::White, Color::Blue)
            } else if in_prefix {
                (if matches!(block, Block::Heading(_)) { DIM_COLOR } else { MARKER_COLOR }, line_bg)
            } else {
                (body_color, line_bg)
            };
            execute!(self.stdout, SetForegroundColor(fg), SetBackgroundColor(bg), Print(shown))?;
        }

        execute!(self.stdout, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    fn render_favorites(&mut self, favorites: &Favorites, text_area: Rect) -> Result<()> {
        if favorites.is_empty() {
            return Ok(());
        }
        let cols = self.cols as usize;
        let top = text_area.bottom();
        let margin = " ".repeat(MARGIN as usize);

        execute!(
            self.stdout,
            MoveTo(0, top),
            SetBackgroundColor(BG_COLOR),
            SetForegroundColor(DIM_COLOR),
            Print("╌".repeat(cols)),
            MoveTo(0, top + 1),
            SetForegroundColor(Color::White),
            SetAttribute(Attribute::Bold),
            Print(format!("{margin}Favorite Verses")),
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(BG_COLOR),
            Clear(ClearType::UntilNewLine),
        )?;

        for (i, verse) in favorites.iter().take(MAX_FAVORITES).enumerate() {
            let reference = verse.reference();
            let text = format!("  {}", verse.text);
            let room = cols.saturating_sub(MARGIN as usize + display_width(&reference));
            execute!(
                self.stdout,
                MoveTo(0, top + 2 + i as u16),
                SetBackgroundColor(BG_COLOR),
                SetForegroundColor(MARKER_COLOR),
                Print(format!("{margin}{reference}")),
                SetForegroundColor(Color::Reset),
                Print(truncate_to_width(&text, room)),
                Clear(ClearType::UntilNewLine),
            )?;
        }
        execute!(self.stdout, ResetColor)?;
        Ok(())
    }

    fn render_status_bar(&mut self, view: &View) -> Result<()> {
        let status_row = self.rows.saturating_sub(1);
        execute!(
            self.stdout,
            MoveTo(0, status_row),
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(Color::White)
        )?;

        let doc = view.composer.document();
        let modified = if doc.is_modified() { " [+]" } else { "" };
        let left = format!(" {}{}", view.passage, modified);

        let cursor = doc.cursor();
        let pos = format!("Ln {}, Col {}", cursor.line + 1, cursor.col + 1);
        let right = match view.message {
            Some(msg) => format!(" {} | {} ", msg, pos),
            None => format!(" {} ", pos),
        };

        let cols = self.cols as usize;
        let padding = cols.saturating_sub(display_width(&left) + display_width(&right));
        let line = format!("{}{}{}", left, " ".repeat(padding), right);
        execute!(self.stdout, Print(truncate_to_width(&line, cols)), ResetColor)?;
        Ok(())
    }

    /// Slash command popup: a bordered list with the highlighted row marked
    /// Draw the popup, items from `offset` on
    fn render_menu(&mut self, frame: Rect, menu: &SelectionMenu, offset: usize) -> Result<()> {
        if frame.width < 4 || frame.height < 3 {
            return Ok(());
        }
        let inner = frame.width as usize - 2;
        let highlighted = match menu.state() {
            MenuState::Active(i) => Some(i),
            MenuState::Resolved => None,
        };

        execute!(
            self.stdout,
            SetBackgroundColor(MENU_BG),
            SetForegroundColor(DIM_COLOR),
            MoveTo(frame.x, frame.y),
            Print(format!("┌{}┐", "─".repeat(inner))),
            MoveTo(frame.x, frame.bottom() - 1),
            Print(format!("└{}┘", "─".repeat(inner))),
        )?;

        let rows = frame.height - 2;
        for row in 0..rows {
            let y = frame.y + 1 + row;
            let index = offset + row as usize;
            let (label, marker, selected) = match menu.items().get(index) {
                Some(command) => {
                    let selected = highlighted == Some(index);
                    (command.title, if selected { "↵" } else { " " }, selected)
                }
                None if index == 0 => ("No results", " ", false),
                None => ("", " ", false),
            };

            let label = truncate_to_width(label, inner.saturating_sub(4));
            let gap = inner.saturating_sub(display_width(label) + 3);
            let (fg, bg) = if selected {
                (Color::White, MENU_HIGHLIGHT_BG)
            } else if menu.items().is_empty() {
                (DIM_COLOR, MENU_BG)
            } else {
                (Color::Reset, MENU_BG)
            };

            execute!(
                self.stdout,
                MoveTo(frame.x, y),
                SetBackgroundColor(MENU_BG),
                SetForegroundColor(DIM_COLOR),
                Print("│"),
                SetBackgroundColor(bg),
                SetForegroundColor(fg),
                Print(format!(" {}{}{} ", label, " ".repeat(gap), marker)),
                SetBackgroundColor(MENU_BG),
                SetForegroundColor(DIM_COLOR),
                Print("│"),
            )?;
        }

        execute!(self.stdout, ResetColor)?;
        Ok(())
    }
}

fn footer_rows(favorite_count: usize) -> u16 {
    if favorite_count == 0 {
        0
    } else {
        2 + favorite_count.min(MAX_FAVORITES) as u16
    }
}
