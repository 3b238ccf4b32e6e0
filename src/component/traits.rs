//! The component contract and the contexts passed to it.
//!
//! A [`Component`] draws itself inside the region it is given and may
//! consume input. Containers also describe how their children share their
//! content region through [`Component::layout`]; the tree does the actual
//! recursion, so a component never renders its children itself.

use std::any::Any;

use unicode_width::UnicodeWidthChar;

use super::layout::Layout;
use crate::error::Result;
use crate::event::input::{KeyEvent, MouseEvent};
use crate::event::message::Notification;
use crate::geometry::Region;
use crate::render::{ScreenBuffer, Style};
use crate::tree::node::NodeId;

// ---------------------------------------------------------------------------
// Component
// ---------------------------------------------------------------------------

/// A renderable, optionally interactive node in the component tree.
pub trait Component: Any {
    /// Short type name used in logs (e.g. `"Card"`).
    fn name(&self) -> &str;

    /// Draw into `ctx.region()`. The region has already been cleared.
    fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<()>;

    /// Handle a keypress. `input` is the character to insert, if the key
    /// produces one. Return `true` to consume the key and stop bubbling.
    fn handle_input(&mut self, input: Option<char>, key: &KeyEvent, ctx: &mut EventContext) -> bool {
        let _ = (input, key, ctx);
        false
    }

    /// Handle a mouse event inside this component's region.
    fn handle_mouse(&mut self, mouse: &MouseEvent, ctx: &mut EventContext) -> bool {
        let _ = (mouse, ctx);
        false
    }

    /// Whether this component can hold keyboard focus. Only leaves with no
    /// children are ever focused.
    fn can_focus(&self) -> bool {
        false
    }

    /// How the children split [`content_region`](Self::content_region).
    fn layout(&self) -> Layout {
        Layout::Layered
    }

    /// The part of `region` children may use, e.g. inside a border.
    fn content_region(&self, region: Region) -> Region {
        region
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

// ---------------------------------------------------------------------------
// RenderContext
// ---------------------------------------------------------------------------

/// What a component may draw on during [`Component::render`].
///
/// Drawing helpers take coordinates relative to the component's region and
/// clip to it; nothing drawn through them lands outside the region.
pub struct RenderContext<'a> {
    node: NodeId,
    region: Region,
    focused: bool,
    buffer: &'a mut ScreenBuffer,
}

impl<'a> RenderContext<'a> {
    pub fn new(node: NodeId, region: Region, focused: bool, buffer: &'a mut ScreenBuffer) -> Self {
        Self {
            node,
            region,
            focused,
            buffer,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The absolute region this component owns.
    pub fn region(&self) -> Region {
        self.region
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Direct access to the screen buffer, for drawing the helpers don't cover.
    pub fn buffer(&mut self) -> &mut ScreenBuffer {
        self.buffer
    }

    /// Draw `text` at `(x, y)` relative to the region, clipped to it.
    pub fn text(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        self.styled_text(x, y, text, &Style::new())
    }

    /// Draw styled `text` at `(x, y)` relative to the region, clipped to it.
    ///
    /// Parts that fall outside the addressable screen (negative or beyond
    /// `u16::MAX`) are dropped too.
    pub fn styled_text(&mut self, x: i32, y: i32, text: &str, style: &Style) -> Result<()> {
        let visible = self.region.intersection(ADDRESSABLE);
        let (mut abs_x, abs_y) = (self.region.x + x, self.region.y + y);
        if abs_y < visible.y || abs_y >= visible.bottom() || abs_x >= visible.right() {
            return Ok(());
        }
        let mut text = text;
        if abs_x < visible.x {
            let (rest, skipped) = skip_columns(text, (visible.x - abs_x) as usize);
            text = rest;
            abs_x += skipped as i32;
        }
        let clipped = clip_to_width(text, (visible.right() - abs_x).max(0) as usize);
        if clipped.is_empty() {
            return Ok(());
        }
        let (col, row) = (abs_x as u16, abs_y as u16);
        if style.is_plain() {
            self.buffer.write_at(col, row, clipped)
        } else {
            self.buffer.save_cursor()?;
            self.buffer.move_cursor(col, row)?;
            self.buffer.write_styled(clipped, style)?;
            self.buffer.restore_cursor()
        }
    }

    /// Fill the whole region with `ch`.
    pub fn fill(&mut self, ch: char) -> Result<()> {
        self.buffer.fill_region(self.region, ch)
    }
}

/// The longest prefix of `text` whose display width fits in `width` cells.
/// Stops at the first line break.
pub fn clip_to_width(text: &str, width: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        if ch == '\n' || ch == '\r' {
            return &text[..i];
        }
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            return &text[..i];
        }
        used += w;
    }
    text
}

/// Every cell a cursor-position sequence can reach.
const ADDRESSABLE: Region = Region::new(0, 0, u16::MAX as i32 + 1, u16::MAX as i32 + 1);

/// Drop leading characters covering at least `columns` display columns.
///
/// Returns the remainder and how many columns were actually dropped, which
/// exceeds `columns` when a wide character straddles the cut.
fn skip_columns(text: &str, columns: usize) -> (&str, usize) {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        if used >= columns {
            return (&text[i..], used);
        }
        if ch == '\n' || ch == '\r' {
            return ("", used);
        }
        used += ch.width().unwrap_or(0);
    }
    ("", used)
}

// ---------------------------------------------------------------------------
// EventContext
// ---------------------------------------------------------------------------

/// Passed to input handlers so components can notify the application.
#[derive(Debug)]
pub struct EventContext {
    node: NodeId,
    region: Region,
    notifications: Vec<Notification>,
}

impl EventContext {
    pub fn new(node: NodeId, region: Region) -> Self {
        Self {
            node,
            region,
            notifications: Vec::new(),
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The region the component was last rendered into.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Queue a notification for the event bus.
    pub fn emit(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    /// Announce a submitted value from this component.
    pub fn submit(&mut self, value: impl Into<String>) {
        self.emit(Notification::Submit {
            source: self.node,
            value: value.into(),
        });
    }

    /// Announce a changed value from this component.
    pub fn change(&mut self, value: impl Into<String>) {
        self.emit(Notification::Change {
            source: self.node,
            value: value.into(),
        });
    }

    pub(crate) fn into_notifications(self) -> Vec<Notification> {
        self.notifications
    }
}
