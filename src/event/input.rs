//! Input event types produced by the key decoder.
//!
//! Defines [`InputEvent`], [`KeyEvent`], [`MouseEvent`] and supporting types.
//! Keys carry a canonical name (`up`, `return`, `f5`, ...) or a literal
//! character, plus the modifier flags and the raw bytes they were decoded from.

use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

use crate::error::Error;
use crate::geometry::Size;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Insert,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

impl Key {
    /// Canonical name for non-character keys, `None` for [`Key::Char`].
    pub fn name(self) -> Option<String> {
        let name = match self {
            Key::Char(_) => return None,
            Key::F(n) => return Some(format!("f{n}")),
            Key::Enter => "return",
            Key::Escape => "escape",
            Key::Tab => "tab",
            Key::Backspace => "backspace",
            Key::Delete => "delete",
            Key::Insert => "insert",
            Key::Left => "left",
            Key::Right => "right",
            Key::Up => "up",
            Key::Down => "down",
            Key::Home => "home",
            Key::End => "end",
            Key::PageUp => "pageup",
            Key::PageDown => "pagedown",
        };
        Some(name.to_owned())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(' ') => f.write_str("space"),
            Key::Char(c) => write!(f, "{c}"),
            other => f.write_str(&other.name().unwrap_or_default()),
        }
    }
}

impl FromStr for Key {
    type Err = Error;

    /// Parse a key name. Single characters parse as [`Key::Char`]; names are
    /// case-insensitive and accept the common aliases (`enter`, `esc`, `del`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Key::Char(c));
        }

        let lower = s.to_ascii_lowercase();
        let key = match lower.as_str() {
            "return" | "enter" => Key::Enter,
            "escape" | "esc" => Key::Escape,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "delete" | "del" => Key::Delete,
            "insert" | "ins" => Key::Insert,
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "home" => Key::Home,
            "end" => Key::End,
            "pageup" | "pgup" => Key::PageUp,
            "pagedown" | "pgdn" => Key::PageDown,
            "space" => Key::Char(' '),
            other => match other.strip_prefix('f').map(str::parse::<u8>) {
                Some(Ok(n)) if (1..=12).contains(&n) => Key::F(n),
                _ => return Err(Error::UnknownKey(s.to_owned())),
            },
        };
        Ok(key)
    }
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Decode the xterm modifier parameter (`1 + bitmask`) used in
    /// `CSI 1 ; m X` and `CSI n ; m ~` sequences.
    pub fn from_xterm_param(param: u32) -> Modifiers {
        let bits = param.saturating_sub(1);
        let mut out = Modifiers::NONE;
        if bits & 1 != 0 {
            out = out | Modifiers::SHIFT;
        }
        if bits & 2 != 0 {
            out = out | Modifiers::ALT;
        }
        if bits & 4 != 0 {
            out = out | Modifiers::CTRL;
        }
        out
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A decoded keypress: key, modifiers, and the raw bytes it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
    /// The raw input this event was decoded from (lossy UTF-8).
    pub sequence: String,
}

impl KeyEvent {
    /// Create a new key event with an empty raw sequence.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self {
            code,
            modifiers,
            sequence: String::new(),
        }
    }

    /// Attach the raw sequence (builder).
    pub fn with_sequence(mut self, sequence: impl Into<String>) -> Self {
        self.sequence = sequence.into();
        self
    }

    /// Canonical name: `up`, `return`, ... for named keys, `ctrl+<c>` for
    /// control chords, and the empty string for plain printable characters.
    pub fn name(&self) -> String {
        match self.code {
            Key::Char(c) if self.ctrl() => format!("ctrl+{c}"),
            Key::Char(_) => String::new(),
            other => other.name().unwrap_or_default(),
        }
    }

    /// The character carried by this event, if it is a character key.
    pub fn literal(&self) -> Option<char> {
        match self.code {
            Key::Char(c) => Some(c),
            _ => None,
        }
    }

    /// The character to insert into a text field: a literal with no ctrl/alt.
    pub fn text(&self) -> Option<char> {
        if self.ctrl() || self.alt() {
            return None;
        }
        self.literal()
    }

    pub fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    pub fn alt(&self) -> bool {
        self.modifiers.contains(Modifiers::ALT)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }

    /// Whether this is the reserved Ctrl+C shutdown trigger.
    pub fn is_interrupt(&self) -> bool {
        self.code == Key::Char('c') && self.ctrl()
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event with action, 0-indexed position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

// ---------------------------------------------------------------------------
// InputEvent
// ---------------------------------------------------------------------------

/// Top-level input event delivered to the screen manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(Size),
}

// ===========================================================================
// Tests
// ===========================================================================
