//! Container: a layout-only component.
//!
//! A container draws nothing itself. Its region is cleared by the tree before
//! rendering and its children are placed according to its [`Layout`].

use std::any::Any;

use super::layout::{Constraint, Layout};
use super::traits::{Component, RenderContext};
use crate::error::Result;

/// Layout-only component.
///
/// # Examples
///
/// ```
/// use termloom::component::{Container, Layout};
///
/// let grid = Container::new(Layout::Grid { columns: 2, rows: 2 });
/// assert_eq!(grid.layout_ref(), &Layout::Grid { columns: 2, rows: 2 });
/// ```
#[derive(Debug, Clone, Default)]
pub struct Container {
    layout: Layout,
}

impl Container {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Children stacked top to bottom with equal heights.
    pub fn vertical() -> Self {
        Self::new(Layout::Vertical(Vec::new()))
    }

    /// Children side by side with equal widths.
    pub fn horizontal() -> Self {
        Self::new(Layout::Horizontal(Vec::new()))
    }

    /// Children stacked top to bottom with the given constraints.
    pub fn rows(constraints: impl Into<Vec<Constraint>>) -> Self {
        Self::new(Layout::Vertical(constraints.into()))
    }

    /// Children side by side with the given constraints.
    pub fn columns(constraints: impl Into<Vec<Constraint>>) -> Self {
        Self::new(Layout::Horizontal(constraints.into()))
    }

    pub fn grid(columns: u16, rows: u16) -> Self {
        Self::new(Layout::Grid { columns, rows })
    }

    pub fn layout_ref(&self) -> &Layout {
        &self.layout
    }

    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
    }
}

impl Component for Container {
    fn name(&self) -> &str {
        "Container"
    }

    fn render(&mut self, _ctx: &mut RenderContext<'_>) -> Result<()> {
        Ok(())
    }

    fn layout(&self) -> Layout {
        self.layout.clone()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
