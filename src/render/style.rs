//! Text styles rendered as SGR sequences.
//!
//! A [`Style`] can be built with methods or parsed from a short description
//! such as `"bold red on #202030"`. Colors are named terminal colors or hex
//! `#rgb` / `#rrggbb` values.

use std::fmt;
use std::str::FromStr;

use crossterm::style::{Attribute, Color, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::Command;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Foreground/background colors plus text attributes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Style {
    /// The empty style: no colors, no attributes.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn bg(mut self, color: Color) -> Self {
        self.bg = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn dim(mut self) -> Self {
        self.dim = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = true;
        self
    }

    pub fn reverse(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Whether applying this style would emit nothing.
    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// Append the SGR sequences that switch this style on.
    pub fn write_sgr(&self, out: &mut impl fmt::Write) -> fmt::Result {
        if let Some(color) = self.fg {
            SetForegroundColor(color).write_ansi(out)?;
        }
        if let Some(color) = self.bg {
            SetBackgroundColor(color).write_ansi(out)?;
        }
        let attributes = [
            (self.bold, Attribute::Bold),
            (self.dim, Attribute::Dim),
            (self.italic, Attribute::Italic),
            (self.underline, Attribute::Underlined),
            (self.reverse, Attribute::Reverse),
        ];
        for (_, attribute) in attributes.into_iter().filter(|(on, _)| *on) {
            SetAttribute(attribute).write_ansi(out)?;
        }
        Ok(())
    }
}

impl FromStr for Style {
    type Err = Error;

    /// Parse words like `bold`, `underline`, a foreground color, and
    /// `on <color>` for the background.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut style = Style::new();
        let mut words = s.split_whitespace();
        while let Some(word) = words.next() {
            match word.to_ascii_lowercase().as_str() {
                "bold" => style.bold = true,
                "dim" => style.dim = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                "reverse" => style.reverse = true,
                "on" => {
                    let color = words.next().and_then(parse_color);
                    style.bg = Some(color.ok_or_else(|| Error::InvalidStyle(s.to_owned()))?);
                }
                _ => {
                    style.fg = Some(parse_color(word).ok_or_else(|| Error::InvalidStyle(s.to_owned()))?);
                }
            }
        }
        Ok(style)
    }
}

// ---------------------------------------------------------------------------
// Color parsing
// ---------------------------------------------------------------------------

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::Black),
    ("red", Color::Red),
    ("green", Color::Green),
    ("yellow", Color::Yellow),
    ("blue", Color::Blue),
    ("magenta", Color::Magenta),
    ("cyan", Color::Cyan),
    ("white", Color::White),
    ("grey", Color::Grey),
    ("gray", Color::Grey),
    ("darkred", Color::DarkRed),
    ("darkgreen", Color::DarkGreen),
    ("darkyellow", Color::DarkYellow),
    ("darkblue", Color::DarkBlue),
    ("darkmagenta", Color::DarkMagenta),
    ("darkcyan", Color::DarkCyan),
    ("darkgrey", Color::DarkGrey),
    ("darkgray", Color::DarkGrey),
];

/// Parse a color name (`red`, `dark_blue`, `grey`) or hex value
/// (`#rgb`, `#rrggbb`). Names are case-insensitive and ignore `_`/`-`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let name: String = s
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    NAMED_COLORS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, color)| color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let digits: Vec<u8> = match hex.len() {
        3 => hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| (d * 17) as u8))
            .collect::<Option<_>>()?,
        6 => (0..3)
            .map(|i| u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok())
            .collect::<Option<_>>()?,
        _ => return None,
    };
    Some(Color::Rgb {
        r: digits[0],
        g: digits[1],
        b: digits[2],
    })
}

// ===========================================================================
// Tests
// ===========================================================================
