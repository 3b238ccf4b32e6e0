//! Context-aware key binding router.
//!
//! [`KeyBindingRouter`] keeps a stack of named binding contexts with
//! `"global"` at the bottom, and one ordered binding table per context.
//! Dispatch walks the stack from the innermost context outwards; within a
//! context, bindings are tested in registration order and the first match
//! fires. A match normally ends dispatch. A binding marked
//! [`fallthrough`](KeyBinding::fallthrough) lets outer contexts be checked as
//! well, unless its handler calls [`Propagation::stop_propagation`].
//!
//! Context changes, named actions and unmatched keys are queued as
//! [`Notification`]s and collected with [`KeyBindingRouter::take_notifications`].

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::str::FromStr;

use super::input::{Key, KeyEvent};
use super::message::Notification;
use crate::error::{Error, HandlerResult};

/// Name of the context that is always at the bottom of the stack.
pub const GLOBAL_CONTEXT: &str = "global";

// ---------------------------------------------------------------------------
// Propagation
// ---------------------------------------------------------------------------

/// Passed to binding handlers so they can stop outer contexts from firing.
#[derive(Debug, Default)]
pub struct Propagation {
    stopped: bool,
}

impl Propagation {
    /// Prevent outer contexts from seeing this key.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

// ---------------------------------------------------------------------------
// BindingAction
// ---------------------------------------------------------------------------

type BindingHandler = Box<dyn FnMut(&KeyEvent, &mut Propagation) -> HandlerResult>;

/// What happens when a binding fires.
pub enum BindingAction {
    /// Call a closure.
    Handler(BindingHandler),
    /// Emit [`Notification::Action`] with this name.
    Named(String),
}

impl fmt::Debug for BindingAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(_) => write!(f, "Handler(<fn>)"),
            Self::Named(name) => write!(f, "Named({name:?})"),
        }
    }
}

// ---------------------------------------------------------------------------
// KeyBinding
// ---------------------------------------------------------------------------

/// A key plus optional modifier requirements, and the action to run.
///
/// Modifier fields left as `None` match either state.
#[derive(Debug)]
pub struct KeyBinding {
    pub key: Key,
    pub ctrl: Option<bool>,
    pub alt: Option<bool>,
    pub shift: Option<bool>,
    pub description: Option<String>,
    pub fallthrough: bool,
    action: BindingAction,
}

impl KeyBinding {
    /// Bind `key` with no modifier requirements and a no-op action.
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: None,
            alt: None,
            shift: None,
            description: None,
            fallthrough: false,
            action: BindingAction::Handler(Box::new(|_, _| Ok(()))),
        }
    }

    /// Parse a chord such as `q`, `ctrl+s`, `shift+tab` or `ctrl+alt+up`.
    ///
    /// Modifiers named in the chord are required; the others are
    /// "don't care".
    pub fn chord(chord: &str) -> Result<Self, Error> {
        let (mods, key) = match chord.strip_suffix("++") {
            Some(prefix) => (prefix, "+"),
            None => chord.rsplit_once('+').unwrap_or(("", chord)),
        };
        let mut binding = Self::new(key.parse()?);
        for modifier in mods.split('+').filter(|m| !m.is_empty()) {
            match modifier.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => binding.ctrl = Some(true),
                "alt" | "meta" => binding.alt = Some(true),
                "shift" => binding.shift = Some(true),
                _ => return Err(Error::UnknownKey(chord.to_owned())),
            }
        }
        Ok(binding)
    }

    /// Require (or forbid) ctrl.
    pub fn ctrl(mut self, held: bool) -> Self {
        self.ctrl = Some(held);
        self
    }

    /// Require (or forbid) alt.
    pub fn alt(mut self, held: bool) -> Self {
        self.alt = Some(held);
        self
    }

    /// Require (or forbid) shift.
    pub fn shift(mut self, held: bool) -> Self {
        self.shift = Some(held);
        self
    }

    /// Human-readable description for help screens.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Let outer contexts be checked after this binding fires.
    pub fn fallthrough(mut self) -> Self {
        self.fallthrough = true;
        self
    }

    /// Run `handler` when the binding fires.
    pub fn handler<F>(mut self, handler: F) -> Self
    where
        F: FnMut(&KeyEvent, &mut Propagation) -> HandlerResult + 'static,
    {
        self.action = BindingAction::Handler(Box::new(handler));
        self
    }

    /// Emit a named action when the binding fires.
    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.action = BindingAction::Named(name.into());
        self
    }

    /// Whether this binding matches the event.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        fn agrees(required: Option<bool>, held: bool) -> bool {
            required.map_or(true, |r| r == held)
        }
        self.key == event.code
            && agrees(self.ctrl, event.ctrl())
            && agrees(self.alt, event.alt())
            && agrees(self.shift, event.shift())
    }

    /// Chord label for help output, e.g. `ctrl+s`.
    pub fn label(&self) -> String {
        let mut out = String::new();
        for (flag, name) in [(self.ctrl, "ctrl+"), (self.alt, "alt+"), (self.shift, "shift+")] {
            if flag == Some(true) {
                out.push_str(name);
            }
        }
        out.push_str(&self.key.to_string());
        out
    }
}

impl FromStr for KeyBinding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::chord(s)
    }
}

/// One row of help output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpEntry {
    pub context: String,
    pub chord: String,
    pub description: String,
}

/// Outcome of [`KeyBindingRouter::dispatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// At least one binding fired.
    Handled,
    /// Nothing matched; a [`Notification::Unhandled`] was queued.
    Unhandled,
}

// ---------------------------------------------------------------------------
// KeyBindingRouter
// ---------------------------------------------------------------------------

/// Context stack plus per-context binding tables.
#[derive(Debug)]
pub struct KeyBindingRouter {
    /// Outermost first; index 0 is always [`GLOBAL_CONTEXT`].
    stack: Vec<String>,
    tables: HashMap<String, Vec<KeyBinding>>,
    notifications: Vec<Notification>,
}

impl KeyBindingRouter {
    /// Create a router whose stack holds only the global context.
    pub fn new() -> Self {
        Self {
            stack: vec![GLOBAL_CONTEXT.to_owned()],
            tables: HashMap::new(),
            notifications: Vec::new(),
        }
    }

    // ── Context stack ────────────────────────────────────────────────

    /// Make `name` the innermost context.
    pub fn push_context(&mut self, name: impl Into<String>) {
        let name = name.into();
        tracing::debug!(context = %name, "push binding context");
        self.stack.push(name.clone());
        self.notifications.push(Notification::ContextPushed(name));
    }

    /// Remove the innermost context. The global context is never removed;
    /// popping it is a no-op that returns `None`.
    pub fn pop_context(&mut self) -> Option<String> {
        if self.stack.len() <= 1 {
            return None;
        }
        let name = self.stack.pop()?;
        tracing::debug!(context = %name, "pop binding context");
        self.notifications.push(Notification::ContextPopped(name.clone()));
        Some(name)
    }

    /// The innermost context name.
    pub fn current_context(&self) -> &str {
        self.stack.last().map_or(GLOBAL_CONTEXT, String::as_str)
    }

    /// Active contexts, innermost first.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.stack.iter().rev().map(String::as_str)
    }

    // ── Binding tables ───────────────────────────────────────────────

    /// Add a binding to `context`'s table. The context need not be active.
    pub fn register(&mut self, context: &str, binding: KeyBinding) {
        self.tables.entry(context.to_owned()).or_default().push(binding);
    }

    /// Add a binding to the global table.
    pub fn register_global(&mut self, binding: KeyBinding) {
        self.register(GLOBAL_CONTEXT, binding);
    }

    /// Remove every binding for `key` in `context`. Returns how many were removed.
    pub fn unregister(&mut self, context: &str, key: Key) -> usize {
        let Some(table) = self.tables.get_mut(context) else {
            return 0;
        };
        let before = table.len();
        table.retain(|b| b.key != key);
        before - table.len()
    }

    /// Empty `context`'s table.
    pub fn clear_bindings(&mut self, context: &str) {
        if let Some(table) = self.tables.get_mut(context) {
            table.clear();
        }
    }

    /// Bindings registered in `context`, in registration order.
    pub fn bindings_for(&self, context: &str) -> &[KeyBinding] {
        self.tables.get(context).map(Vec::as_slice).unwrap_or_default()
    }

    /// Described bindings of the active contexts, innermost context first.
    pub fn help_entries(&self) -> Vec<HelpEntry> {
        let mut seen: Vec<&str> = Vec::new();
        let mut entries = Vec::new();
        for context in self.contexts() {
            if seen.contains(&context) {
                continue;
            }
            seen.push(context);
            for binding in self.bindings_for(context) {
                if let Some(description) = &binding.description {
                    entries.push(HelpEntry {
                        context: context.to_owned(),
                        chord: binding.label(),
                        description: description.clone(),
                    });
                }
            }
        }
        entries
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Route a key event through the active contexts.
    pub fn dispatch(&mut self, event: &KeyEvent) -> Dispatch {
        let contexts: Vec<String> = self.stack.iter().rev().cloned().collect();
        let mut visited: Vec<&str> = Vec::with_capacity(contexts.len());
        let mut propagation = Propagation::default();
        let mut fired = false;

        for context in &contexts {
            if visited.contains(&context.as_str()) {
                continue;
            }
            visited.push(context);

            let Some(table) = self.tables.get_mut(context) else {
                continue;
            };
            let Some(binding) = table.iter_mut().find(|b| b.matches(event)) else {
                continue;
            };

            fired = true;
            match &mut binding.action {
                BindingAction::Named(name) => {
                    self.notifications.push(Notification::Action {
                        name: name.clone(),
                        key: event.clone(),
                    });
                }
                BindingAction::Handler(handler) => {
                    let outcome = catch_unwind(AssertUnwindSafe(|| handler(event, &mut propagation)));
                    match outcome {
                        Ok(Ok(())) => {}
                        Ok(Err(err)) => {
                            tracing::error!(context = %context, key = %binding.key, error = %err, "key binding handler failed");
                        }
                        Err(_) => {
                            tracing::error!(context = %context, key = %binding.key, "key binding handler panicked");
                        }
                    }
                }
            }

            if !binding.fallthrough || propagation.is_stopped() {
                break;
            }
        }

        if fired {
            Dispatch::Handled
        } else {
            self.notifications.push(Notification::Unhandled(event.clone()));
            Dispatch::Unhandled
        }
    }

    /// Drain the queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Default for KeyBindingRouter {
    fn default() -> Self {
        Self::new()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
