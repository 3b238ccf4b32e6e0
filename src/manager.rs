//! Screen manager: the one owner of the terminal connection.
//!
//! [`ScreenManager`] ties together the [`ScreenBuffer`], the [`KeyDecoder`],
//! the [`KeyBindingRouter`], the [`ComponentTree`] and the [`EventBus`]. Input
//! bytes go in through [`handle_input`](ScreenManager::handle_input); decoded
//! keys go to the router first, then to the focused component chain, and
//! whatever nothing consumed is published as [`Notification::Unhandled`].
//!
//! Every terminal mode the manager changes is undone by
//! [`cleanup`](ScreenManager::cleanup), which also runs on drop.

use std::io::Write;
use std::time::Duration;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::event::binding::{Dispatch, KeyBinding, KeyBindingRouter};
use crate::event::bus::EventBus;
use crate::event::decoder::KeyDecoder;
use crate::event::input::{InputEvent, KeyEvent, MouseAction, MouseEvent};
use crate::event::message::Notification;
use crate::geometry::{Region, Size};
use crate::render::ScreenBuffer;
use crate::terminal::{CrosstermBackend, TerminalBackend};
use crate::tree::{ComponentTree, FocusChange, NodeId};

// ---------------------------------------------------------------------------
// ScreenConfig
// ---------------------------------------------------------------------------

/// Terminal modes and behavior chosen at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    /// Switch to the alternate screen on setup.
    pub alternate_screen: bool,
    /// Enable mouse reporting on setup.
    pub mouse: bool,
    /// Hide the cursor on setup.
    pub hide_cursor: bool,
    /// Treat Ctrl+C as a shutdown request instead of an ordinary key.
    pub exit_on_ctrl_c: bool,
    /// Re-render after every handled input event and resize.
    pub auto_render: bool,
    /// How long a lone ESC (or a partial sequence) waits for more bytes
    /// before it is decoded as literal keys.
    pub escape_timeout: Duration,
    /// Dimensions used when no terminal is attached.
    pub fallback_size: Size,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            alternate_screen: true,
            mouse: false,
            hide_cursor: true,
            exit_on_ctrl_c: true,
            auto_render: true,
            escape_timeout: Duration::from_millis(25),
            fallback_size: Size::FALLBACK,
        }
    }
}

impl ScreenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alternate_screen(mut self, enabled: bool) -> Self {
        self.alternate_screen = enabled;
        self
    }

    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse = enabled;
        self
    }

    pub fn with_hide_cursor(mut self, hide: bool) -> Self {
        self.hide_cursor = hide;
        self
    }

    pub fn with_exit_on_ctrl_c(mut self, exit: bool) -> Self {
        self.exit_on_ctrl_c = exit;
        self
    }

    pub fn with_auto_render(mut self, enabled: bool) -> Self {
        self.auto_render = enabled;
        self
    }

    pub fn with_escape_timeout(mut self, timeout: Duration) -> Self {
        self.escape_timeout = timeout;
        self
    }

    pub fn with_fallback_size(mut self, size: Size) -> Self {
        self.fallback_size = size;
        self
    }
}

// ---------------------------------------------------------------------------
// Placement
// ---------------------------------------------------------------------------

/// Where a top-level component is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// A fixed region, clipped to the screen.
    Fixed(Region),
    /// The whole screen, following resizes.
    Fill,
}

#[derive(Debug)]
struct Registration {
    id: String,
    node: NodeId,
    placement: Placement,
}

// ---------------------------------------------------------------------------
// ScreenManager
// ---------------------------------------------------------------------------

/// Owner of the terminal: modes, dimensions, input routing and rendering.
pub struct ScreenManager {
    config: ScreenConfig,
    backend: Box<dyn TerminalBackend>,
    buffer: ScreenBuffer,
    decoder: KeyDecoder,
    router: KeyBindingRouter,
    bus: EventBus,
    tree: ComponentTree,
    /// Top-level components in registration order; later ones draw on top.
    components: Vec<Registration>,
    tty: bool,
    active: bool,
    raw_mode: bool,
    mouse: bool,
    shutdown: bool,
}

impl ScreenManager {
    /// A manager for the process's own terminal, writing to stdout.
    pub fn new(config: ScreenConfig) -> Self {
        Self::with_backend(config, Box::new(CrosstermBackend::new()), Box::new(std::io::stdout()))
    }

    /// A manager over an arbitrary backend and output stream.
    pub fn with_backend(config: ScreenConfig, backend: Box<dyn TerminalBackend>, out: Box<dyn Write>) -> Self {
        let tty = backend.is_tty();
        let size = if tty {
            match backend.size() {
                Ok(size) => size,
                Err(err) => {
                    tracing::warn!(error = %err, "could not read terminal size; using fallback");
                    config.fallback_size
                }
            }
        } else {
            config.fallback_size
        };
        tracing::debug!(tty, width = size.width, height = size.height, "screen manager created");
        Self {
            buffer: ScreenBuffer::new(out, size),
            decoder: KeyDecoder::new(),
            router: KeyBindingRouter::new(),
            bus: EventBus::new(),
            tree: ComponentTree::new(),
            components: Vec::new(),
            config,
            backend,
            tty,
            active: false,
            raw_mode: false,
            mouse: false,
            shutdown: false,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn is_tty(&self) -> bool {
        self.tty
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_raw_mode(&self) -> bool {
        self.raw_mode
    }

    pub fn is_mouse_enabled(&self) -> bool {
        self.mouse
    }

    pub fn is_alternate_screen(&self) -> bool {
        self.buffer.is_alternate_screen()
    }

    pub fn buffer(&self) -> &ScreenBuffer {
        &self.buffer
    }

    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// Structural changes made here are picked up by the next render.
    pub fn tree_mut(&mut self) -> &mut ComponentTree {
        &mut self.tree
    }

    pub fn router(&self) -> &KeyBindingRouter {
        &self.router
    }

    pub fn router_mut(&mut self) -> &mut KeyBindingRouter {
        &mut self.router
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut EventBus {
        &mut self.bus
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Put the terminal into interactive mode: raw input, then the configured
    /// alternate screen, cursor and mouse modes. Calling it again is a no-op.
    ///
    /// Without a terminal nothing is written and the fallback size is kept.
    /// Failing to enter raw mode on a terminal is the one hard setup error.
    pub fn setup(&mut self) -> Result<()> {
        if self.active {
            return Ok(());
        }
        if self.tty {
            self.backend
                .enable_raw_mode()
                .map_err(|err| Error::Setup(format!("cannot enter raw mode: {err}")))?;
            self.raw_mode = true;
            if self.config.alternate_screen {
                self.enter_alternate_screen()?;
                self.buffer.clear()?;
            }
            if self.config.hide_cursor {
                self.buffer.hide_cursor()?;
            }
        }
        if self.config.mouse {
            self.enable_mouse()?;
        }
        self.active = true;
        self.shutdown = false;
        tracing::info!(tty = self.tty, size = ?self.buffer.size(), "terminal setup");
        Ok(())
    }

    /// Undo every mode change: mouse, attributes, cursor, alternate screen,
    /// raw mode. Every step runs even if an earlier one fails; the first
    /// failure is returned. Safe to call repeatedly and without setup.
    pub fn cleanup(&mut self) -> Result<()> {
        let mut first_error: Option<Error> = None;
        let mut record = |step: &str, result: Result<()>| {
            if let Err(err) = result {
                tracing::warn!(step, error = %err, "cleanup step failed");
                first_error.get_or_insert(err);
            }
        };

        if self.buffer.is_buffering() {
            record("flush", self.buffer.flush_buffer());
        }
        if self.mouse {
            record("mouse", self.disable_mouse());
        }
        if self.active && self.tty {
            record("attributes", self.buffer.reset());
        }
        if !self.buffer.is_cursor_visible() {
            record("cursor", self.buffer.show_cursor());
        }
        if self.buffer.is_alternate_screen() {
            record("alternate screen", self.exit_alternate_screen());
        }
        if self.raw_mode {
            let restored = self.backend.disable_raw_mode().map_err(Error::from);
            if restored.is_ok() {
                self.raw_mode = false;
            }
            record("raw mode", restored);
        }

        if self.active {
            tracing::info!("terminal restored");
        }
        self.active = false;
        first_error.map_or(Ok(()), Err)
    }

    // ── Top-level components ─────────────────────────────────────────

    /// Add a top-level component under a unique id.
    pub fn register_component(
        &mut self,
        id: impl Into<String>,
        component: impl Component,
        placement: Placement,
    ) -> Result<NodeId> {
        let id = id.into();
        if self.components.iter().any(|r| r.id == id) {
            return Err(Error::DuplicateComponent(id));
        }
        let node = self.tree.insert_root(component);
        tracing::debug!(component = %id, ?placement, "component registered");
        self.components.push(Registration { id, node, placement });
        Ok(node)
    }

    /// Remove a top-level component and its whole subtree. Handles into the
    /// subtree become stale.
    pub fn unregister_component(&mut self, id: &str) -> Result<()> {
        let index = self
            .components
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::UnknownComponent(id.to_owned()))?;
        let registration = self.components.remove(index);
        self.tree.remove(registration.node);
        tracing::debug!(component = %id, "component unregistered");
        self.publish_tree_notifications();
        Ok(())
    }

    /// The root node of a registered component.
    pub fn component_node(&self, id: &str) -> Option<NodeId> {
        self.components.iter().find(|r| r.id == id).map(|r| r.node)
    }

    /// Move a registered component to a new placement.
    pub fn set_placement(&mut self, id: &str, placement: Placement) -> Result<()> {
        let registration = self
            .components
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| Error::UnknownComponent(id.to_owned()))?;
        registration.placement = placement;
        Ok(())
    }

    // ── Output pass-through ──────────────────────────────────────────

    pub fn write(&mut self, text: &str) -> Result<()> {
        self.buffer.write(text)
    }

    pub fn write_at(&mut self, x: u16, y: u16, text: &str) -> Result<()> {
        self.buffer.write_at(x, y, text)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.buffer.clear()
    }

    pub fn set_cursor_position(&mut self, x: u16, y: u16) -> Result<()> {
        self.buffer.move_cursor(x, y)
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        match (visible, self.buffer.is_cursor_visible()) {
            (true, false) => self.buffer.show_cursor(),
            (false, true) => self.buffer.hide_cursor(),
            _ => Ok(()),
        }
    }

    // ── Terminal modes ───────────────────────────────────────────────

    /// Turn on mouse reporting and mouse decoding. Idempotent.
    pub fn enable_mouse(&mut self) -> Result<()> {
        if self.mouse {
            return Ok(());
        }
        if self.tty {
            self.buffer.enable_mouse_reporting()?;
        }
        self.decoder.set_mouse_reporting(true);
        self.mouse = true;
        Ok(())
    }

    /// Turn off mouse reporting and mouse decoding. Idempotent.
    pub fn disable_mouse(&mut self) -> Result<()> {
        if !self.mouse {
            return Ok(());
        }
        self.decoder.set_mouse_reporting(false);
        self.mouse = false;
        if self.tty {
            self.buffer.disable_mouse_reporting()?;
        }
        Ok(())
    }

    /// Switch to the alternate screen. A second call writes nothing, and so
    /// does any call without a terminal.
    pub fn enter_alternate_screen(&mut self) -> Result<()> {
        if !self.tty || self.buffer.is_alternate_screen() {
            return Ok(());
        }
        self.buffer.enable_alternate_screen()
    }

    /// Leave the alternate screen. Without a matching enter this is a no-op.
    pub fn exit_alternate_screen(&mut self) -> Result<()> {
        if !self.buffer.is_alternate_screen() {
            return Ok(());
        }
        self.buffer.disable_alternate_screen()
    }

    // ── Dimensions ───────────────────────────────────────────────────

    /// The cached terminal dimensions.
    pub fn get_dimensions(&self) -> Size {
        self.buffer.size()
    }

    /// Apply new dimensions: update the cache, publish exactly one
    /// [`Notification::Resize`], then re-render if auto-render is on.
    ///
    /// Without a terminal the fallback size is fixed and this does nothing.
    pub fn handle_resize(&mut self, size: Size) -> Result<()> {
        if !self.tty {
            tracing::debug!("ignoring resize without a terminal");
            return Ok(());
        }
        let size = Size::new(size.width, size.height);
        self.buffer.resize(size);
        tracing::debug!(width = size.width, height = size.height, "terminal resized");
        self.bus.publish(Notification::Resize(size));
        self.bus.dispatch_pending();
        if self.config.auto_render && self.active {
            self.render()?;
        }
        Ok(())
    }

    /// Re-read the size from the terminal and apply it.
    pub fn refresh_dimensions(&mut self) -> Result<()> {
        if !self.tty {
            return Ok(());
        }
        let size = self.backend.size()?;
        self.handle_resize(size)
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Decode a chunk of raw input and handle every complete event in order.
    /// A partial escape sequence stays pending until more bytes arrive or
    /// [`flush_pending_input`](Self::flush_pending_input) is called.
    pub fn handle_input(&mut self, bytes: &[u8]) -> Result<()> {
        let events = self.decoder.feed(bytes);
        self.handle_events(events)
    }

    /// Decode whatever partial input is pending as literal keys.
    pub fn flush_pending_input(&mut self) -> Result<()> {
        let events = self.decoder.flush();
        self.handle_events(events)
    }

    /// Whether the decoder is holding bytes of an unfinished sequence.
    pub fn has_pending_input(&self) -> bool {
        self.decoder.has_pending()
    }

    fn handle_events(&mut self, events: Vec<InputEvent>) -> Result<()> {
        for event in events {
            if self.shutdown {
                break;
            }
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Handle one already-decoded event. Each event's render completes before
    /// the next event is looked at.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::Key(key) => self.handle_key(key)?,
            InputEvent::Mouse(mouse) => self.handle_mouse(mouse)?,
            InputEvent::Resize(size) => return self.handle_resize(size),
        }
        if self.config.auto_render && self.active && !self.shutdown {
            self.render()?;
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.is_interrupt() && self.config.exit_on_ctrl_c {
            tracing::info!("ctrl+c received");
            self.request_shutdown();
            return Ok(());
        }

        if self.router.dispatch(&key) == Dispatch::Handled {
            tracing::trace!(key = %key.code, "key handled by binding");
        }
        for notification in self.router.take_notifications() {
            match notification {
                Notification::Unhandled(key) => {
                    if self.tree.dispatch_key(&key).is_none() {
                        self.publish_tree_notifications();
                        self.bus.publish(Notification::Unhandled(key));
                    }
                }
                other => {
                    self.bus.publish(other);
                }
            }
        }
        self.publish_tree_notifications();
        self.bus.dispatch_pending();
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        if let MouseAction::Down(_) = mouse.kind {
            if let Some(hit) = self.tree.hit_test(i32::from(mouse.x), i32::from(mouse.y)) {
                if self.tree.is_focusable(hit) {
                    self.apply_focus_change(|tree| tree.focus(hit))?;
                }
            }
        }
        if self.tree.dispatch_mouse(&mouse).is_none() {
            self.publish_tree_notifications();
            self.bus.publish(Notification::Mouse(mouse));
        }
        self.publish_tree_notifications();
        self.bus.dispatch_pending();
        Ok(())
    }

    // ── Key bindings ─────────────────────────────────────────────────

    pub fn register_binding(&mut self, context: &str, binding: KeyBinding) {
        self.router.register(context, binding);
    }

    /// Push a binding context and publish [`Notification::ContextPushed`].
    pub fn push_context(&mut self, name: impl Into<String>) {
        self.router.push_context(name);
        self.publish_router_notifications();
    }

    /// Pop the innermost binding context. The global context stays.
    pub fn pop_context(&mut self) -> Option<String> {
        let popped = self.router.pop_context();
        self.publish_router_notifications();
        popped
    }

    // ── Focus ────────────────────────────────────────────────────────

    /// Focus `node`, re-rendering only the nodes whose focus changed.
    pub fn focus(&mut self, node: NodeId) -> Result<()> {
        self.apply_focus_change(|tree| tree.focus(node))
    }

    pub fn blur(&mut self) -> Result<()> {
        self.apply_focus_change(|tree| {
            Ok(FocusChange {
                blurred: tree.blur(),
                focused: None,
            })
        })
    }

    pub fn focus_next(&mut self) -> Result<()> {
        self.apply_focus_change(ComponentTree::focus_next)
    }

    pub fn focus_previous(&mut self) -> Result<()> {
        self.apply_focus_change(ComponentTree::focus_previous)
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.tree.focused()
    }

    fn apply_focus_change<F>(&mut self, change: F) -> Result<()>
    where
        F: FnOnce(&mut ComponentTree) -> Result<FocusChange>,
    {
        let change = change(&mut self.tree)?;
        if change.is_change() && self.active {
            let owned = !self.buffer.is_buffering();
            if owned {
                self.buffer.start_buffer();
            }
            for node in [change.blurred, change.focused].into_iter().flatten() {
                if self.tree.contains(node) {
                    self.tree.rerender(node, &mut self.buffer)?;
                }
            }
            if owned {
                self.buffer.flush_buffer()?;
            }
        }
        self.publish_tree_notifications();
        self.bus.dispatch_pending();
        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render every top-level component in registration order, as one write.
    pub fn render(&mut self) -> Result<()> {
        let owned = !self.buffer.is_buffering();
        if owned {
            self.buffer.start_buffer();
        }
        let rendered = self.render_components();
        let flushed = if owned { self.buffer.flush_buffer() } else { Ok(()) };
        rendered.and(flushed)
    }

    fn render_components(&mut self) -> Result<()> {
        let screen = self.buffer.size().to_region();
        for registration in &self.components {
            let region = match registration.placement {
                Placement::Fixed(region) => region.intersection(screen),
                Placement::Fill => screen,
            };
            self.tree.render(registration.node, region, &mut self.buffer)?;
        }
        Ok(())
    }

    // ── Notifications ────────────────────────────────────────────────

    /// Publish an application notification to every matching subscriber.
    pub fn publish(&mut self, notification: Notification) -> usize {
        self.bus.publish(notification)
    }

    fn publish_tree_notifications(&mut self) {
        for notification in self.tree.take_notifications() {
            self.bus.publish(notification);
        }
    }

    fn publish_router_notifications(&mut self) {
        for notification in self.router.take_notifications() {
            self.bus.publish(notification);
        }
    }

    // ── Shutdown ─────────────────────────────────────────────────────

    /// Ask the event loop to stop. Publishes [`Notification::Shutdown`] once.
    pub fn request_shutdown(&mut self) {
        if self.shutdown {
            return;
        }
        self.shutdown = true;
        self.bus.publish(Notification::Shutdown);
        self.bus.dispatch_pending();
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.shutdown
    }
}

impl Drop for ScreenManager {
    fn drop(&mut self) {
        if let Err(err) = self.cleanup() {
            tracing::error!(error = %err, "terminal cleanup failed on drop");
        }
    }
}

impl std::fmt::Debug for ScreenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenManager")
            .field("config", &self.config)
            .field("buffer", &self.buffer)
            .field("components", &self.components)
            .field("tty", &self.tty)
            .field("active", &self.active)
            .field("raw_mode", &self.raw_mode)
            .field("mouse", &self.mouse)
            .field("shutdown", &self.shutdown)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::component::{Card, Container, Label};
    use crate::event::message::Topic;
    use crate::terminal::HeadlessBackend;
    use crate::testing::{InputProbe, SharedOutput, VirtualScreen};
    use pretty_assertions::assert_eq;
    use tracing_test::traced_test;

    fn manager(config: ScreenConfig) -> (ScreenManager, HeadlessBackend, SharedOutput) {
        let backend = HeadlessBackend::new(Size::new(40, 10));
        let out = SharedOutput::new();
        let manager = ScreenManager::with_backend(config, Box::new(backend.clone()), Box::new(out.clone()));
        (manager, backend, out)
    }

    fn record(manager: &mut ScreenManager, topic: Topic) -> Rc<RefCell<Vec<Notification>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.bus_mut().subscribe(topic, move |n| {
            sink.borrow_mut().push(n.clone());
            Ok(())
        });
        seen
    }

    // ── Setup / cleanup ──────────────────────────────────────────────

    #[test]
    fn setup_enters_configured_modes() {
        let (mut manager, backend, out) = manager(ScreenConfig::default());
        manager.setup().unwrap();
        assert!(backend.is_raw_mode());
        assert_eq!(out.take(), "\x1b[?1049h\x1b[2J\x1b[?25l");

        manager.setup().unwrap();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn cleanup_restores_everything_once() {
        let (mut manager, backend, out) = manager(ScreenConfig::default().with_mouse(true));
        manager.setup().unwrap();
        out.clear();

        manager.cleanup().unwrap();
        assert!(!backend.is_raw_mode());
        assert_eq!(out.take(), "\x1b[?1000l\x1b[0m\x1b[?25h\x1b[?1049l");

        manager.cleanup().unwrap();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn cleanup_without_setup_is_a_no_op() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        manager.cleanup().unwrap();
        assert_eq!(out.contents(), "");
    }

    #[test]
    fn drop_restores_the_terminal() {
        let (mut manager, backend, out) = manager(ScreenConfig::default());
        manager.setup().unwrap();
        drop(manager);
        assert!(!backend.is_raw_mode());
        assert!(out.contents().ends_with("\x1b[?1049l"));
    }

    #[test]
    fn non_tty_skips_mode_escapes_and_uses_fallback() {
        let out = SharedOutput::new();
        let mut manager = ScreenManager::with_backend(
            ScreenConfig::default(),
            Box::new(HeadlessBackend::piped()),
            Box::new(out.clone()),
        );
        manager.setup().unwrap();
        manager.enter_alternate_screen().unwrap();
        assert_eq!(manager.get_dimensions(), Size::new(80, 24));
        assert_eq!(out.contents(), "");

        let resizes = record(&mut manager, Topic::Resize);
        manager.handle_resize(Size::new(100, 50)).unwrap();
        assert!(resizes.borrow().is_empty());
        assert_eq!(manager.get_dimensions(), Size::new(80, 24));
    }

    // ── Modes ────────────────────────────────────────────────────────

    #[test]
    fn alternate_screen_is_idempotent() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        manager.exit_alternate_screen().unwrap();
        assert_eq!(out.contents(), "");

        manager.enter_alternate_screen().unwrap();
        manager.enter_alternate_screen().unwrap();
        assert_eq!(out.write_count(), 1);
        assert_eq!(out.take(), "\x1b[?1049h");

        manager.exit_alternate_screen().unwrap();
        manager.exit_alternate_screen().unwrap();
        assert_eq!(out.contents(), "\x1b[?1049l");
    }

    #[test]
    fn mouse_toggles_reporting_and_decoding() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        manager.enable_mouse().unwrap();
        manager.enable_mouse().unwrap();
        assert_eq!(out.take(), "\x1b[?1000h");

        let mice = record(&mut manager, Topic::Mouse);
        manager.handle_input(b"\x1b[<0;5;3M").unwrap();
        assert_eq!(mice.borrow().len(), 1);

        manager.disable_mouse().unwrap();
        assert_eq!(out.take(), "\x1b[?1000l");
        assert!(!manager.is_mouse_enabled());
    }

    #[test]
    fn cursor_visibility_writes_only_on_change() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        manager.set_cursor_visible(true).unwrap();
        assert_eq!(out.contents(), "");
        manager.set_cursor_visible(false).unwrap();
        manager.set_cursor_visible(false).unwrap();
        assert_eq!(out.take(), "\x1b[?25l");
        manager.set_cursor_position(4, 2).unwrap();
        assert_eq!(out.take(), "\x1b[3;5H");
    }

    // ── Components ───────────────────────────────────────────────────

    #[test]
    fn duplicate_and_unknown_ids_are_errors() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        manager.register_component("main", Container::vertical(), Placement::Fill).unwrap();
        assert!(matches!(
            manager.register_component("main", Label::new("x"), Placement::Fill),
            Err(Error::DuplicateComponent(id)) if id == "main"
        ));
        assert!(matches!(
            manager.unregister_component("missing"),
            Err(Error::UnknownComponent(_))
        ));
        assert!(matches!(
            manager.set_placement("missing", Placement::Fill),
            Err(Error::UnknownComponent(_))
        ));
    }

    #[test]
    fn unregister_invalidates_the_subtree() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let root = manager.register_component("main", Container::vertical(), Placement::Fill).unwrap();
        let child = manager.tree_mut().insert_child(root, InputProbe::new("field")).unwrap();
        manager.focus(child).unwrap();

        manager.unregister_component("main").unwrap();
        assert!(!manager.tree().contains(child));
        assert_eq!(manager.focused(), None);
        assert_eq!(manager.component_node("main"), None);
    }

    #[test]
    fn render_draws_components_in_one_write() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        let card = manager
            .register_component("status", Card::new().with_title("System"), Placement::Fill)
            .unwrap();
        manager.tree_mut().insert_child(card, Label::new("ok")).unwrap();
        manager
            .register_component("badge", Label::new("!"), Placement::Fixed(Region::new(38, 9, 5, 5)))
            .unwrap();

        manager.render().unwrap();
        assert_eq!(out.write_count(), 1);

        let mut screen = VirtualScreen::new(40, 10);
        screen.feed(&out.contents());
        assert_eq!(screen.row(0), format!("┌{}System{}┐", "─".repeat(16), "─".repeat(16)));
        assert_eq!(screen.row(1), format!("│ok{}│", " ".repeat(36)));
        assert_eq!(screen.row(9), format!("└{}!", "─".repeat(37)));
        assert_eq!(manager.tree().region(card), Some(Region::new(0, 0, 40, 10)));
    }

    // ── Resize ───────────────────────────────────────────────────────

    #[test]
    fn resize_updates_dimensions_then_publishes_once() {
        let (mut manager, backend, _out) = manager(ScreenConfig::default());
        let resizes = record(&mut manager, Topic::Resize);

        backend.set_size(Size::new(120, 40));
        manager.refresh_dimensions().unwrap();
        assert_eq!(manager.get_dimensions(), Size::new(120, 40));
        assert_eq!(*resizes.borrow(), vec![Notification::Resize(Size::new(120, 40))]);
    }

    #[test]
    fn resize_rerenders_with_new_dimensions() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        let card = manager.register_component("main", Card::new(), Placement::Fill).unwrap();
        manager.setup().unwrap();
        out.clear();

        manager.handle_resize(Size::new(20, 5)).unwrap();
        assert_eq!(manager.tree().region(card), Some(Region::new(0, 0, 20, 5)));
        assert!(out.contents().contains(&format!("└{}┘", "─".repeat(18))));
    }

    // ── Input routing ────────────────────────────────────────────────

    #[test]
    fn ctrl_c_requests_shutdown() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let shutdowns = record(&mut manager, Topic::Shutdown);
        manager.handle_input(b"\x03").unwrap();
        assert!(manager.is_shutdown_requested());
        assert_eq!(shutdowns.borrow().len(), 1);

        // Bytes after the interrupt are not processed.
        let unhandled = record(&mut manager, Topic::Unhandled);
        manager.handle_input(b"x").unwrap();
        assert!(unhandled.borrow().is_empty());
    }

    #[test]
    fn ctrl_c_can_be_an_ordinary_key() {
        let (mut manager, ..) = manager(ScreenConfig::default().with_exit_on_ctrl_c(false));
        let unhandled = record(&mut manager, Topic::Unhandled);
        manager.handle_input(b"\x03").unwrap();
        assert!(!manager.is_shutdown_requested());
        assert_eq!(unhandled.borrow().len(), 1);
    }

    #[test]
    fn unbound_keys_go_to_the_focused_component() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let root = manager.register_component("form", Container::vertical(), Placement::Fill).unwrap();
        let field = manager.tree_mut().insert_child(root, InputProbe::new("name")).unwrap();
        manager.focus(field).unwrap();
        let changes = record(&mut manager, Topic::Change);
        let unhandled = record(&mut manager, Topic::Unhandled);

        manager.handle_input(b"hi\x1b[A").unwrap();
        assert_eq!(manager.tree().get_as::<InputProbe>(field).unwrap().value(), "hi");
        assert_eq!(changes.borrow().len(), 2);
        assert_eq!(unhandled.borrow().len(), 1);
    }

    #[test]
    fn bindings_win_over_the_focused_component() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let field = manager.register_component("field", InputProbe::new("f"), Placement::Fill).unwrap();
        manager.focus(field).unwrap();
        manager.register_binding("global", KeyBinding::new(crate::event::input::Key::Char('q')).action("quit"));
        let actions = record(&mut manager, Topic::Action);

        manager.handle_input(b"qa").unwrap();
        assert_eq!(actions.borrow().len(), 1);
        assert_eq!(manager.tree().get_as::<InputProbe>(field).unwrap().value(), "a");
    }

    #[test]
    fn escape_waits_for_flush() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let unhandled = record(&mut manager, Topic::Unhandled);
        manager.handle_input(b"\x1b").unwrap();
        assert!(manager.has_pending_input());
        assert!(unhandled.borrow().is_empty());

        manager.flush_pending_input().unwrap();
        assert_eq!(unhandled.borrow().len(), 1);
        assert!(!manager.has_pending_input());
    }

    #[test]
    fn click_focuses_and_reaches_the_component() {
        let (mut manager, _backend, _out) = manager(ScreenConfig::default().with_mouse(true));
        let root = manager.register_component("form", Container::horizontal(), Placement::Fill).unwrap();
        let left = manager.tree_mut().insert_child(root, InputProbe::new("left")).unwrap();
        let right = manager.tree_mut().insert_child(root, InputProbe::new("right")).unwrap();
        manager.setup().unwrap();
        manager.render().unwrap();
        let focus = record(&mut manager, Topic::Focus);

        // SGR press at column 31, row 3 (1-based) lands in the right half.
        manager.handle_input(b"\x1b[<0;31;3M").unwrap();
        assert_eq!(manager.focused(), Some(right));
        assert_eq!(*focus.borrow(), vec![Notification::Focus { node: right }]);
        assert_eq!(manager.tree().get_as::<InputProbe>(right).unwrap().clicks(), 1);
        assert_eq!(manager.tree().get_as::<InputProbe>(left).unwrap().clicks(), 0);
    }

    // ── Focus ────────────────────────────────────────────────────────

    #[test]
    fn focus_change_rerenders_only_affected_nodes() {
        let (mut manager, _backend, out) = manager(ScreenConfig::default());
        let root = manager.register_component("form", Container::vertical(), Placement::Fill).unwrap();
        let a = manager.tree_mut().insert_child(root, InputProbe::new("a")).unwrap();
        let b = manager.tree_mut().insert_child(root, InputProbe::new("b")).unwrap();
        manager.tree_mut().insert_child(root, Label::new("footer")).unwrap();
        manager.setup().unwrap();
        manager.render().unwrap();
        manager.focus(a).unwrap();
        out.clear();

        // Rows: a 0..4, b 4..7, footer 7..10.
        manager.focus(b).unwrap();
        assert_eq!(out.write_count(), 1);
        let written = out.contents();
        assert!(written.contains("\x1b[1;1H"));
        assert!(written.contains("\x1b[5;1H"));
        assert!(!written.contains("\x1b[8;1H"), "footer must not be redrawn");
        assert!(written.contains("> b"));
    }

    #[test]
    fn focus_notifications_reach_subscribers() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let a = manager.register_component("a", InputProbe::new("a"), Placement::Fill).unwrap();
        let b = manager.register_component("b", InputProbe::new("b"), Placement::Fill).unwrap();
        let focus = record(&mut manager, Topic::Focus);
        let blur = record(&mut manager, Topic::Blur);

        manager.focus_next().unwrap();
        manager.focus_next().unwrap();
        manager.blur().unwrap();
        assert_eq!(
            *focus.borrow(),
            vec![Notification::Focus { node: a }, Notification::Focus { node: b }]
        );
        assert_eq!(
            *blur.borrow(),
            vec![Notification::Blur { node: a }, Notification::Blur { node: b }]
        );
    }

    // ── Contexts ─────────────────────────────────────────────────────

    #[test]
    fn context_changes_are_published() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        manager.bus_mut().subscribe_all(move |n| {
            sink.borrow_mut().push(n.to_string());
            Ok(())
        });
        manager.push_context("modal");
        assert_eq!(manager.pop_context().as_deref(), Some("modal"));
        assert_eq!(manager.pop_context(), None);
        assert_eq!(*seen.borrow(), vec!["context:push", "context:pop"]);
    }

    // ── Logging ──────────────────────────────────────────────────────

    #[traced_test]
    #[test]
    fn setup_and_cleanup_are_logged() {
        let (mut manager, ..) = manager(ScreenConfig::default());
        manager.setup().unwrap();
        manager.cleanup().unwrap();
        assert!(logs_contain("terminal setup"));
        assert!(logs_contain("terminal restored"));
    }
}
