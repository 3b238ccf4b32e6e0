//! Output side: escape-sequence commands, styles, and the screen buffer.

pub mod ansi;
pub mod buffer;
pub mod style;

pub use buffer::{Position, ScreenBuffer};
pub use style::{parse_color, Style};
