//! Notifications delivered through the event bus.
//!
//! [`Notification`] is the tagged union of everything the engine announces to
//! application code; [`Topic`] is its payload-free discriminant, used as the
//! subscription key.

use std::fmt;

use super::input::{KeyEvent, MouseEvent};
use crate::geometry::Size;
use crate::tree::node::NodeId;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Something the engine or a component wants application code to know about.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// The terminal was resized; carries the new cached dimensions.
    Resize(Size),
    /// A component gained focus.
    Focus { node: NodeId },
    /// A component lost focus.
    Blur { node: NodeId },
    /// A component submitted a value (Enter in a text field, a form post).
    Submit { source: NodeId, value: String },
    /// A component's value changed.
    Change { source: NodeId, value: String },
    /// A key binding with a named action fired.
    Action { name: String, key: KeyEvent },
    /// No binding and no focused component consumed this key.
    Unhandled(KeyEvent),
    /// A binding context was pushed.
    ContextPushed(String),
    /// A binding context was popped.
    ContextPopped(String),
    /// A decoded mouse event.
    Mouse(MouseEvent),
    /// The manager is shutting down (Ctrl+C, a termination signal, or a quit request).
    Shutdown,
    /// Application-defined notification.
    Custom { name: String, payload: String },
}

impl Notification {
    /// The subscription topic this notification is delivered under.
    pub fn topic(&self) -> Topic {
        match self {
            Notification::Resize(_) => Topic::Resize,
            Notification::Focus { .. } => Topic::Focus,
            Notification::Blur { .. } => Topic::Blur,
            Notification::Submit { .. } => Topic::Submit,
            Notification::Change { .. } => Topic::Change,
            Notification::Action { .. } => Topic::Action,
            Notification::Unhandled(_) => Topic::Unhandled,
            Notification::ContextPushed(_) => Topic::ContextPushed,
            Notification::ContextPopped(_) => Topic::ContextPopped,
            Notification::Mouse(_) => Topic::Mouse,
            Notification::Shutdown => Topic::Shutdown,
            Notification::Custom { .. } => Topic::Custom,
        }
    }

    /// Create a custom notification.
    pub fn custom(name: impl Into<String>, payload: impl Into<String>) -> Self {
        Notification::Custom {
            name: name.into(),
            payload: payload.into(),
        }
    }
}

impl fmt::Display for Notification {
    /// Short label for logs, e.g. `resize` or `keyboard:action:save`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::Action { name, .. } => write!(f, "keyboard:action:{name}"),
            Notification::Custom { name, .. } => write!(f, "custom:{name}"),
            other => f.write_str(other.topic().name()),
        }
    }
}

// ---------------------------------------------------------------------------
// Topic
// ---------------------------------------------------------------------------

/// Payload-free notification kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Resize,
    Focus,
    Blur,
    Submit,
    Change,
    Action,
    Unhandled,
    ContextPushed,
    ContextPopped,
    Mouse,
    Shutdown,
    Custom,
}

impl Topic {
    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Topic::Resize => "resize",
            Topic::Focus => "focus",
            Topic::Blur => "blur",
            Topic::Submit => "submit",
            Topic::Change => "change",
            Topic::Action => "keyboard:action",
            Topic::Unhandled => "unhandled",
            Topic::ContextPushed => "context:push",
            Topic::ContextPopped => "context:pop",
            Topic::Mouse => "mouse",
            Topic::Shutdown => "shutdown",
            Topic::Custom => "custom",
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
