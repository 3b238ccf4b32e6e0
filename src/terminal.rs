//! Terminal backends: the input-mode and size half of the terminal connection.
//!
//! Output goes through [`ScreenBuffer`](crate::render::ScreenBuffer); a
//! [`TerminalBackend`] covers the parts that are not escape sequences: whether
//! a terminal is attached, its size, and the OS line discipline.

use std::cell::Cell;
use std::io;
use std::rc::Rc;

use crossterm::terminal;
use crossterm::tty::IsTty;

use crate::geometry::Size;

/// Access to the controlling terminal's mode and dimensions.
pub trait TerminalBackend {
    /// Whether input and output are attached to a real terminal.
    fn is_tty(&self) -> bool;

    /// Current dimensions as reported by the terminal.
    fn size(&self) -> io::Result<Size>;

    /// Switch input to raw mode: unbuffered, no echo, no signal keys.
    fn enable_raw_mode(&mut self) -> io::Result<()>;

    /// Restore canonical line mode.
    fn disable_raw_mode(&mut self) -> io::Result<()>;
}

// ---------------------------------------------------------------------------
// CrosstermBackend
// ---------------------------------------------------------------------------

/// The process's controlling terminal, through crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct CrosstermBackend;

impl CrosstermBackend {
    pub fn new() -> Self {
        Self
    }
}

impl TerminalBackend for CrosstermBackend {
    fn is_tty(&self) -> bool {
        io::stdin().is_tty() && io::stdout().is_tty()
    }

    fn size(&self) -> io::Result<Size> {
        let (width, height) = terminal::size()?;
        Ok(Size::new(width, height))
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()
    }
}

// ---------------------------------------------------------------------------
// HeadlessBackend
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct HeadlessState {
    tty: bool,
    size: Cell<Size>,
    raw_mode: Cell<bool>,
}

/// In-memory terminal for tests and headless runs.
///
/// Clones share state, so a test can hand one clone to a
/// [`ScreenManager`](crate::manager::ScreenManager) and keep another to change
/// the reported size or check the raw-mode flag.
///
/// ```
/// use termloom::geometry::Size;
/// use termloom::terminal::{HeadlessBackend, TerminalBackend};
///
/// let backend = HeadlessBackend::new(Size::new(100, 30));
/// let mut handed_out = backend.clone();
/// handed_out.enable_raw_mode().unwrap();
/// assert!(backend.is_raw_mode());
/// ```
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    state: Rc<HeadlessState>,
}

impl HeadlessBackend {
    /// A fake TTY of the given size.
    pub fn new(size: Size) -> Self {
        Self {
            state: Rc::new(HeadlessState {
                tty: true,
                size: Cell::new(size),
                raw_mode: Cell::new(false),
            }),
        }
    }

    /// Not a terminal, like output piped to a file.
    pub fn piped() -> Self {
        Self {
            state: Rc::new(HeadlessState {
                tty: false,
                size: Cell::new(Size::FALLBACK),
                raw_mode: Cell::new(false),
            }),
        }
    }

    /// Change the size the next [`TerminalBackend::size`] call reports.
    pub fn set_size(&self, size: Size) {
        self.state.size.set(size);
    }

    pub fn is_raw_mode(&self) -> bool {
        self.state.raw_mode.get()
    }
}

impl TerminalBackend for HeadlessBackend {
    fn is_tty(&self) -> bool {
        self.state.tty
    }

    fn size(&self) -> io::Result<Size> {
        if !self.state.tty {
            return Err(io::Error::new(io::ErrorKind::Unsupported, "not a terminal"));
        }
        Ok(self.state.size.get())
    }

    fn enable_raw_mode(&mut self) -> io::Result<()> {
        self.state.raw_mode.set(true);
        Ok(())
    }

    fn disable_raw_mode(&mut self) -> io::Result<()> {
        self.state.raw_mode.set(false);
        Ok(())
    }
}
