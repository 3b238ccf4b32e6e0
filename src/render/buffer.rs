//! Screen buffer: the one place escape sequences are written.
//!
//! Every documented operation maps to exactly one output sequence (see the
//! table below), so callers and tests can predict output byte for byte.
//! Between [`ScreenBuffer::start_buffer`] and [`ScreenBuffer::flush_buffer`]
//! output accumulates in memory and leaves as a single write.
//!
//! | operation                 | bytes                      |
//! |---------------------------|----------------------------|
//! | `move_cursor(x, y)`       | `ESC [ y+1 ; x+1 H`        |
//! | `clear`                   | `ESC [ 2 J`                |
//! | `clear_line`              | `ESC [ 2 K`                |
//! | `hide_cursor/show_cursor` | `ESC [ ? 25 l` / `h`       |
//! | `save/restore_cursor`     | `ESC [ s` / `ESC [ u`      |
//! | alternate screen on/off   | `ESC [ ? 1049 h` / `l`     |
//! | mouse reporting on/off    | `ESC [ ? 1000 h` / `l`     |
//! | `reset`                   | `ESC [ 0 m`                |
//! | `write_at(x, y, text)`    | save, move, text, restore  |
//!
//! Dimensions are cached. They change only through [`ScreenBuffer::resize`].

use std::io::{self, Write};

use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::{cursor, terminal, Command};
use unicode_width::UnicodeWidthChar;

use super::ansi::{DisableMouseReporting, EnableMouseReporting, MoveTo, RestoreCursor, SaveCursor};
use super::style::Style;
use crate::error::Result;
use crate::geometry::{Region, Size};

/// Cursor position in cells, 0-indexed.
pub type Position = (u16, u16);

// ---------------------------------------------------------------------------
// ScreenBuffer
// ---------------------------------------------------------------------------

/// Owns the output stream and the terminal state that has no read-back channel.
pub struct ScreenBuffer {
    out: Box<dyn Write>,
    pending: Option<String>,
    size: Size,
    cursor: Position,
    saved: Option<Position>,
    cursor_visible: bool,
    alternate_screen: bool,
}

impl ScreenBuffer {
    /// Create a buffer writing to `out` with the given cached dimensions.
    pub fn new(out: Box<dyn Write>, size: Size) -> Self {
        Self {
            out,
            pending: None,
            size: Size::new(size.width, size.height),
            cursor: (0, 0),
            saved: None,
            cursor_visible: true,
            alternate_screen: false,
        }
    }

    /// Create a buffer writing to the process's standard output.
    pub fn stdout(size: Size) -> Self {
        Self::new(Box::new(io::stdout()), size)
    }

    // ── Emission ─────────────────────────────────────────────────────

    fn emit(&mut self, command: impl Command) -> Result<()> {
        let mut sequence = String::new();
        command
            .write_ansi(&mut sequence)
            .map_err(|_| io::Error::other("failed to format escape sequence"))?;
        self.emit_str(&sequence)
    }

    fn emit_str(&mut self, sequence: &str) -> Result<()> {
        match &mut self.pending {
            Some(pending) => pending.push_str(sequence),
            None => {
                self.out.write_all(sequence.as_bytes())?;
                self.out.flush()?;
            }
        }
        Ok(())
    }

    /// Move the logical cursor over `text` the way a terminal would.
    fn advance(&mut self, text: &str) {
        let max_x = self.size.width.saturating_sub(1);
        let max_y = self.size.height.saturating_sub(1);
        for ch in text.chars() {
            match ch {
                '\r' => self.cursor.0 = 0,
                '\n' => self.cursor.1 = (self.cursor.1 + 1).min(max_y),
                _ => {
                    let w = ch.width().unwrap_or(0) as u16;
                    self.cursor.0 = self.cursor.0.saturating_add(w).min(max_x);
                }
            }
        }
    }

    // ── Text ─────────────────────────────────────────────────────────

    /// Write text at the current cursor position.
    pub fn write(&mut self, text: &str) -> Result<()> {
        self.emit(Print(text))?;
        self.advance(text);
        Ok(())
    }

    /// Write text at `(x, y)` and put the cursor back where it was.
    ///
    /// Emitted as one unit: save, move, text, restore.
    pub fn write_at(&mut self, x: u16, y: u16, text: &str) -> Result<()> {
        let mut sequence = String::new();
        let _ = SaveCursor.write_ansi(&mut sequence);
        let _ = MoveTo(x, y).write_ansi(&mut sequence);
        sequence.push_str(text);
        let _ = RestoreCursor.write_ansi(&mut sequence);
        self.emit_str(&sequence)
    }

    /// Write text wrapped in the style's SGR codes, followed by a reset.
    pub fn write_styled(&mut self, text: &str, style: &Style) -> Result<()> {
        if style.is_plain() {
            return self.write(text);
        }
        let mut sequence = String::new();
        let _ = style.write_sgr(&mut sequence);
        sequence.push_str(text);
        let _ = SetAttribute(Attribute::Reset).write_ansi(&mut sequence);
        self.emit_str(&sequence)?;
        self.advance(text);
        Ok(())
    }

    /// Overwrite every cell of `region` (clipped to the screen) with `fill`.
    ///
    /// Leaves the cursor at the start of the region's last row.
    pub fn fill_region(&mut self, region: Region, fill: char) -> Result<()> {
        let visible = region.intersection(self.size.to_region());
        if visible.is_empty() {
            return Ok(());
        }
        let row: String = std::iter::repeat(fill).take(visible.width as usize).collect();
        let mut sequence = String::new();
        for y in visible.y..visible.bottom() {
            let _ = MoveTo(visible.x as u16, y as u16).write_ansi(&mut sequence);
            sequence.push_str(&row);
        }
        self.emit_str(&sequence)?;
        self.cursor = (visible.x as u16, (visible.bottom() - 1) as u16);
        Ok(())
    }

    // ── Cursor ───────────────────────────────────────────────────────

    /// Move the cursor to `(x, y)`, 0-indexed.
    pub fn move_cursor(&mut self, x: u16, y: u16) -> Result<()> {
        self.emit(MoveTo(x, y))?;
        self.cursor = (x, y);
        Ok(())
    }

    pub fn hide_cursor(&mut self) -> Result<()> {
        self.emit(cursor::Hide)?;
        self.cursor_visible = false;
        Ok(())
    }

    pub fn show_cursor(&mut self) -> Result<()> {
        self.emit(cursor::Show)?;
        self.cursor_visible = true;
        Ok(())
    }

    pub fn save_cursor(&mut self) -> Result<()> {
        self.emit(SaveCursor)?;
        self.saved = Some(self.cursor);
        Ok(())
    }

    pub fn restore_cursor(&mut self) -> Result<()> {
        self.emit(RestoreCursor)?;
        if let Some(saved) = self.saved {
            self.cursor = saved;
        }
        Ok(())
    }

    /// The logical cursor position as tracked from emitted output.
    pub fn cursor_position(&self) -> Position {
        self.cursor
    }

    pub fn is_cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    // ── Screen ───────────────────────────────────────────────────────

    /// Clear the whole screen. The cursor does not move.
    pub fn clear(&mut self) -> Result<()> {
        self.emit(terminal::Clear(terminal::ClearType::All))
    }

    /// Clear the line the cursor is on.
    pub fn clear_line(&mut self) -> Result<()> {
        self.emit(terminal::Clear(terminal::ClearType::CurrentLine))
    }

    /// Reset all SGR attributes.
    pub fn reset(&mut self) -> Result<()> {
        self.emit(SetAttribute(Attribute::Reset))
    }

    pub fn enable_alternate_screen(&mut self) -> Result<()> {
        self.emit(terminal::EnterAlternateScreen)?;
        self.alternate_screen = true;
        Ok(())
    }

    pub fn disable_alternate_screen(&mut self) -> Result<()> {
        self.emit(terminal::LeaveAlternateScreen)?;
        self.alternate_screen = false;
        Ok(())
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.alternate_screen
    }

    pub fn enable_mouse_reporting(&mut self) -> Result<()> {
        self.emit(EnableMouseReporting)
    }

    pub fn disable_mouse_reporting(&mut self) -> Result<()> {
        self.emit(DisableMouseReporting)
    }

    // ── Buffering ────────────────────────────────────────────────────

    /// Start accumulating output in memory. A second call keeps the
    /// existing pending output.
    pub fn start_buffer(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(String::new());
        }
    }

    pub fn is_buffering(&self) -> bool {
        self.pending.is_some()
    }

    /// Write everything accumulated since [`start_buffer`](Self::start_buffer)
    /// as one write and stop buffering. With nothing pending this performs an
    /// empty write.
    pub fn flush_buffer(&mut self) -> Result<()> {
        let pending = self.pending.take().unwrap_or_default();
        self.out.write_all(pending.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    // ── Dimensions ───────────────────────────────────────────────────

    pub fn width(&self) -> u16 {
        self.size.width
    }

    pub fn height(&self) -> u16 {
        self.size.height
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// Replace the cached dimensions. Nothing is written.
    pub fn resize(&mut self, size: Size) {
        self.size = Size::new(size.width, size.height);
        self.cursor.0 = self.cursor.0.min(self.size.width - 1);
        self.cursor.1 = self.cursor.1.min(self.size.height - 1);
    }
}

impl std::fmt::Debug for ScreenBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenBuffer")
            .field("size", &self.size)
            .field("cursor", &self.cursor)
            .field("buffering", &self.pending.is_some())
            .field("cursor_visible", &self.cursor_visible)
            .field("alternate_screen", &self.alternate_screen)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
