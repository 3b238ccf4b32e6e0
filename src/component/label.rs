//! Label: static text.

use std::any::Any;

use super::traits::{Component, RenderContext};
use crate::error::Result;
use crate::render::Style;

/// One or more lines of fixed text, clipped to the label's region.
#[derive(Debug, Clone, Default)]
pub struct Label {
    text: String,
    style: Style,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::new(),
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

impl Component for Label {
    fn name(&self) -> &str {
        "Label"
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let height = ctx.region().height;
        for (y, line) in self.text.lines().enumerate().take(height.max(0) as usize) {
            ctx.styled_text(0, y as i32, line, &self.style)?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
