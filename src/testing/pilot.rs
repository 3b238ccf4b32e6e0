//! Pilot: programmatic interaction with a headless screen manager.
//!
//! The `Pilot` wraps a [`ScreenManager`] over a [`HeadlessBackend`] and a
//! captured output stream, provides methods to simulate user input (raw
//! bytes, keys, clicks, resizes), and replays everything written into a
//! [`VirtualScreen`] for assertions on what a user would see.

use crate::component::Component;
use crate::error::Result;
use crate::event::input::{InputEvent, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use crate::geometry::Size;
use crate::manager::{Placement, ScreenConfig, ScreenManager};
use crate::terminal::HeadlessBackend;
use crate::tree::NodeId;

use super::output::SharedOutput;
use super::virtual_screen::VirtualScreen;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless manager driver for testing.
///
/// # Examples
///
/// ```
/// use termloom::component::Card;
/// use termloom::testing::Pilot;
///
/// let mut pilot = Pilot::new(20, 4).unwrap();
/// pilot.mount("card", Card::new().with_title("Hi")).unwrap();
/// pilot.render().unwrap();
/// assert_eq!(pilot.screen().row(0), "┌────────Hi────────┐");
/// ```
pub struct Pilot {
    manager: ScreenManager,
    backend: HeadlessBackend,
    output: SharedOutput,
    screen: VirtualScreen,
}

impl Pilot {
    /// A set-up manager on a fake terminal of the given size.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Self::with_config(ScreenConfig::default(), width, height)
    }

    /// Like [`new`](Self::new) with a custom configuration.
    pub fn with_config(config: ScreenConfig, width: u16, height: u16) -> Result<Self> {
        let size = Size::new(width, height);
        let backend = HeadlessBackend::new(size);
        let output = SharedOutput::new();
        let mut manager = ScreenManager::with_backend(config, Box::new(backend.clone()), Box::new(output.clone()));
        manager.setup()?;
        Ok(Self {
            manager,
            backend,
            output,
            screen: VirtualScreen::new(size.width, size.height),
        })
    }

    // ── Components ───────────────────────────────────────────────────

    /// Register a full-screen top-level component.
    pub fn mount(&mut self, id: &str, component: impl Component) -> Result<NodeId> {
        self.manager.register_component(id, component, Placement::Fill)
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Feed raw input bytes, exactly as the terminal would send them.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<()> {
        self.manager.handle_input(bytes)
    }

    /// Let the escape timeout expire: pending partial input becomes literal keys.
    pub fn settle(&mut self) -> Result<()> {
        self.manager.flush_pending_input()
    }

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) -> Result<()> {
        self.press_key_with(key, Modifiers::NONE)
    }

    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) -> Result<()> {
        self.manager.handle_event(InputEvent::Key(KeyEvent::new(key, modifiers)))
    }

    /// Type `text` as raw bytes.
    pub fn type_text(&mut self, text: &str) -> Result<()> {
        self.feed(text.as_bytes())
    }

    /// Simulate a left-button press at (x, y).
    pub fn click(&mut self, x: u16, y: u16) -> Result<()> {
        self.manager.handle_event(InputEvent::Mouse(MouseEvent {
            kind: MouseAction::Down(MouseBtn::Left),
            x,
            y,
            modifiers: Modifiers::NONE,
        }))
    }

    /// Change the fake terminal's size and deliver the resize signal.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<()> {
        let size = Size::new(width, height);
        self.sync_screen();
        self.screen = VirtualScreen::new(size.width, size.height);
        self.backend.set_size(size);
        self.manager.refresh_dimensions()
    }

    pub fn render(&mut self) -> Result<()> {
        self.manager.render()
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn manager(&self) -> &ScreenManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ScreenManager {
        &mut self.manager
    }

    pub fn output(&self) -> &SharedOutput {
        &self.output
    }

    /// Whether no shutdown has been requested.
    pub fn is_running(&self) -> bool {
        !self.manager.is_shutdown_requested()
    }

    /// The screen after replaying all output written so far.
    pub fn screen(&mut self) -> &VirtualScreen {
        self.sync_screen();
        &self.screen
    }

    /// Plain text of the screen, rows joined by `'\n'`.
    pub fn screen_text(&mut self) -> String {
        self.screen().text()
    }

    fn sync_screen(&mut self) {
        let written = self.output.take();
        self.screen.feed(&written);
    }
}

impl std::fmt::Debug for Pilot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pilot").field("manager", &self.manager).finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
