//! A minimal interactive component for exercising focus and input routing.

use std::any::Any;

use crate::component::{Component, EventContext, RenderContext};
use crate::error::Result;
use crate::event::input::{Key, KeyEvent, MouseAction, MouseEvent};

/// Focusable one-line text field.
///
/// Printable characters are appended (emitting a change), Backspace deletes,
/// Enter submits the value. Everything else bubbles. Renders as
/// `label: value`, prefixed with `> ` while focused.
#[derive(Debug, Clone, Default)]
pub struct InputProbe {
    label: String,
    value: String,
    clicks: usize,
}

impl InputProbe {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Mouse presses received.
    pub fn clicks(&self) -> usize {
        self.clicks
    }
}

impl Component for InputProbe {
    fn name(&self) -> &str {
        "InputProbe"
    }

    fn render(&mut self, ctx: &mut RenderContext<'_>) -> Result<()> {
        let marker = if ctx.is_focused() { "> " } else { "" };
        let line = format!("{marker}{}: {}", self.label, self.value);
        ctx.text(0, 0, &line)
    }

    fn handle_input(&mut self, input: Option<char>, key: &KeyEvent, ctx: &mut EventContext) -> bool {
        if let Some(ch) = input {
            self.value.push(ch);
            ctx.change(self.value.clone());
            return true;
        }
        match key.code {
            Key::Backspace => {
                if self.value.pop().is_some() {
                    ctx.change(self.value.clone());
                }
                true
            }
            Key::Enter => {
                ctx.submit(self.value.clone());
                true
            }
            _ => false,
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent, _ctx: &mut EventContext) -> bool {
        if let MouseAction::Down(_) = mouse.kind {
            self.clicks += 1;
            return true;
        }
        false
    }

    fn can_focus(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
