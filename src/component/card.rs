//! Card: a bordered box with an optional centered title.

use std::any::Any;

use unicode_width::UnicodeWidthStr;

use super::layout::Layout;
use super::traits::{clip_to_width, Component, RenderContext};
use crate::error::Result;
use crate::geometry::Region;
use crate::render::Style;

/// Box-drawing border touching all four edges of its region.
///
/// ```text
/// ┌──────Title──────┐
/// │ children here   │
/// └─────────────────┘
/// ```
///
/// Children share the area inside the border according to the card's layout.
/// A card smaller than 2x2 draws nothing.
#[derive(Debug, Clone)]
pub struct Card {
    title: Option<String>,
    layout: Layout,
    border_style: Style,
}

impl Card {
    pub fn new() -> Self {
        Self {
            title: None,
            layout: Layout::Vertical(Vec::new()),
            border_style: Style::new(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_border_style(mut self, style: Style) -> Self {
        self.border_style = style;
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for Card {
    fn name(&self) -> &str {
        "Card"
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let Region { width, height, .. } = ctx.region();
        if width < 2 || height < 2 {
            return Ok(());
        }
        let inner = (width - 2) as usize;
        let rule = "─".repeat(inner);
        let style = self.border_style;

        ctx.styled_text(0, 0, &format!("┌{rule}┐"), &style)?;
        for y in 1..height - 1 {
            ctx.styled_text(0, y, "│", &style)?;
            ctx.styled_text(width - 1, y, "│", &style)?;
        }
        ctx.styled_text(0, height - 1, &format!("└{rule}┘"), &style)?;

        if let Some(title) = &self.title {
            let title = clip_to_width(title, inner);
            let offset = (inner - title.width()) / 2;
            ctx.styled_text(1 + offset as i32, 0, title, &style)?;
        }
        Ok(())
    }

    fn layout(&self) -> Layout {
        self.layout.clone()
    }

    fn content_region(&self, region: Region) -> Region {
        region.inset(1)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
