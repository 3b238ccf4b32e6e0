//! Escape sequences the screen buffer emits.
//!
//! Most sequences come straight from crossterm's commands. The few that
//! crossterm spells differently from the output protocol are defined here as
//! crate-local [`Command`]s: it saves the cursor with DEC `ESC 7`, enables
//! mouse reporting in several modes at once, and its `MoveTo` adds one to a
//! `u16` coordinate, which overflows at the last representable column.

use std::fmt;

use crossterm::Command;

/// `ESC [ y+1 ; x+1 H`: move the cursor to a 0-indexed cell.
///
/// The 1-indexed coordinates are computed in `u32`, so every `u16` position
/// is addressable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveTo(pub u16, pub u16);

impl Command for MoveTo {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "\x1b[{};{}H", u32::from(self.1) + 1, u32::from(self.0) + 1)
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// `ESC [ s`: save the cursor position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveCursor;

impl Command for SaveCursor {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[s")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// `ESC [ u`: restore the cursor position saved by [`SaveCursor`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestoreCursor;

impl Command for RestoreCursor {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[u")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// `ESC [ ? 1000 h`: turn on X10-compatible mouse press/release reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnableMouseReporting;

impl Command for EnableMouseReporting {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1000h")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// `ESC [ ? 1000 l`: turn mouse reporting off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisableMouseReporting;

impl Command for DisableMouseReporting {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        f.write_str("\x1b[?1000l")
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Render a command to its escape sequence.
pub fn to_ansi(command: impl Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = command.write_ansi(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::{cursor, style, terminal};

    #[test]
    fn crate_local_sequences() {
        assert_eq!(to_ansi(SaveCursor), "\x1b[s");
        assert_eq!(to_ansi(RestoreCursor), "\x1b[u");
        assert_eq!(to_ansi(EnableMouseReporting), "\x1b[?1000h");
        assert_eq!(to_ansi(DisableMouseReporting), "\x1b[?1000l");
    }

    #[test]
    fn move_to_is_one_indexed_across_the_whole_range() {
        assert_eq!(to_ansi(MoveTo(0, 0)), "\x1b[1;1H");
        assert_eq!(to_ansi(MoveTo(9, 4)), "\x1b[5;10H");
        assert_eq!(to_ansi(MoveTo(u16::MAX, 0)), "\x1b[1;65536H");
        assert_eq!(to_ansi(MoveTo(u16::MAX, u16::MAX)), "\x1b[65536;65536H");
    }

    #[test]
    fn crossterm_sequences_match_output_protocol() {
        assert_eq!(to_ansi(terminal::Clear(terminal::ClearType::All)), "\x1b[2J");
        assert_eq!(to_ansi(terminal::Clear(terminal::ClearType::CurrentLine)), "\x1b[2K");
        assert_eq!(to_ansi(cursor::Hide), "\x1b[?25l");
        assert_eq!(to_ansi(cursor::Show), "\x1b[?25h");
        assert_eq!(to_ansi(terminal::EnterAlternateScreen), "\x1b[?1049h");
        assert_eq!(to_ansi(terminal::LeaveAlternateScreen), "\x1b[?1049l");
        assert_eq!(to_ansi(style::SetAttribute(style::Attribute::Reset)), "\x1b[0m");
    }
}
