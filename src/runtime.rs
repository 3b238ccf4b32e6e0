//! Async event loop: drives a [`ScreenManager`] from raw input, OS signals
//! and messages sent through a [`LoopHandle`].
//!
//! The loop owns no state of its own. Every iteration waits for the first of:
//!
//! - a chunk of raw input (decoded and handled in order),
//! - the escape timeout expiring while a partial sequence is pending,
//! - a [`LoopMessage`] from a handle,
//! - a window-change or termination signal (Unix only).
//!
//! It stops once shutdown has been requested or input reaches end of file,
//! and always restores the terminal before returning.

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::error::Result;
use crate::event::message::Notification;
use crate::manager::ScreenManager;

const READ_CHUNK: usize = 1024;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// A request delivered to the running loop.
pub enum LoopMessage {
    /// Render every registered component.
    Render,
    /// Publish a notification on the manager's bus.
    Notify(Notification),
    /// Request shutdown.
    Quit,
    /// Run a closure against the manager on the loop's thread.
    Call(Box<dyn FnOnce(&mut ScreenManager) + Send>),
}

impl std::fmt::Debug for LoopMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopMessage::Render => f.write_str("Render"),
            LoopMessage::Notify(n) => f.debug_tuple("Notify").field(n).finish(),
            LoopMessage::Quit => f.write_str("Quit"),
            LoopMessage::Call(_) => f.write_str("Call(..)"),
        }
    }
}

/// Cloneable sender half of an [`EventLoop`].
///
/// Sends never block. They fail silently once the loop has finished.
#[derive(Debug, Clone)]
pub struct LoopHandle {
    tx: mpsc::UnboundedSender<LoopMessage>,
}

impl LoopHandle {
    pub fn render(&self) {
        self.send(LoopMessage::Render);
    }

    pub fn notify(&self, notification: Notification) {
        self.send(LoopMessage::Notify(notification));
    }

    pub fn quit(&self) {
        self.send(LoopMessage::Quit);
    }

    /// Schedule `f` to run with exclusive access to the manager.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce(&mut ScreenManager) + Send + 'static,
    {
        self.send(LoopMessage::Call(Box::new(f)));
    }

    /// Whether the loop has gone away.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, message: LoopMessage) {
        if self.tx.send(message).is_err() {
            tracing::debug!("event loop closed, message dropped");
        }
    }
}

// ---------------------------------------------------------------------------
// EventLoop
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct EventLoop {
    tx: mpsc::UnboundedSender<LoopMessage>,
    rx: mpsc::UnboundedReceiver<LoopMessage>,
    signals: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, signals: true }
    }

    /// Whether to listen for OS signals (on by default).
    pub fn with_signals(mut self, enabled: bool) -> Self {
        self.signals = enabled;
        self
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle { tx: self.tx.clone() }
    }

    /// Set up the terminal, process events until shutdown or end of input,
    /// then restore the terminal.
    ///
    /// Cleanup runs even when setup or processing fails; the first error wins.
    pub async fn run<R>(self, manager: &mut ScreenManager, input: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        if let Err(err) = manager.setup() {
            tracing::error!(error = %err, "terminal setup failed");
            // Undo whatever modes were entered before the failure.
            if let Err(cleanup) = manager.cleanup() {
                tracing::warn!(error = %cleanup, "cleanup after failed setup");
            }
            return Err(err);
        }
        let result = self.drive(manager, input).await;
        let cleaned = manager.cleanup();
        if let Err(err) = &result {
            tracing::error!(error = %err, "event loop failed");
        }
        result.and(cleaned)
    }

    async fn drive<R>(self, manager: &mut ScreenManager, mut input: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let Self { tx, mut rx, signals } = self;
        // Handles may all be gone; the loop keeps its own sender alive so
        // `recv` never resolves to `None` while input is still flowing.
        let _keep = tx;
        let mut signals = Signals::new(signals, manager.is_tty())?;
        let timeout = manager.config().escape_timeout;
        // Armed when a partial sequence is left over, cleared by the next read.
        let mut deadline: Option<Instant> = None;
        let mut buf = [0u8; READ_CHUNK];

        manager.render()?;
        tracing::debug!("event loop started");

        while !manager.is_shutdown_requested() {
            let pending = manager.has_pending_input();
            let expiry = if pending {
                *deadline.get_or_insert_with(|| Instant::now() + timeout)
            } else {
                deadline = None;
                Instant::now()
            };
            tokio::select! {
                biased;

                Some(message) = rx.recv() => handle_message(manager, message)?,

                Some(signal) = signals.recv() => match signal {
                    SignalEvent::Resize => manager.refresh_dimensions()?,
                    SignalEvent::Terminate => {
                        tracing::info!("termination signal received");
                        manager.request_shutdown();
                    }
                },

                read = input.read(&mut buf) => {
                    let n = read?;
                    if n == 0 {
                        tracing::debug!("input closed");
                        manager.flush_pending_input()?;
                        break;
                    }
                    manager.handle_input(&buf[..n])?;
                    deadline = None;
                }

                () = tokio::time::sleep_until(expiry), if pending => {
                    manager.flush_pending_input()?;
                    deadline = None;
                }
            }
        }

        tracing::debug!("event loop stopped");
        Ok(())
    }
}

fn handle_message(manager: &mut ScreenManager, message: LoopMessage) -> Result<()> {
    tracing::trace!(?message, "loop message");
    match message {
        LoopMessage::Render => manager.render()?,
        LoopMessage::Notify(notification) => {
            manager.publish(notification);
        }
        LoopMessage::Quit => manager.request_shutdown(),
        LoopMessage::Call(f) => f(manager),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Signals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalEvent {
    Resize,
    Terminate,
}

#[cfg(unix)]
struct Signals {
    winch: Option<tokio::signal::unix::Signal>,
    term: Option<tokio::signal::unix::Signal>,
    hup: Option<tokio::signal::unix::Signal>,
    int: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl Signals {
    fn new(enabled: bool, tty: bool) -> Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        if !enabled {
            return Ok(Self { winch: None, term: None, hup: None, int: None });
        }
        // Without a terminal the size is fixed; SIGWINCH is irrelevant.
        let winch = if tty { Some(signal(SignalKind::window_change())?) } else { None };
        Ok(Self {
            winch,
            term: Some(signal(SignalKind::terminate())?),
            hup: Some(signal(SignalKind::hangup())?),
            int: Some(signal(SignalKind::interrupt())?),
        })
    }

    /// Wait for the next signal. Never resolves when nothing is registered.
    async fn recv(&mut self) -> Option<SignalEvent> {
        let Self { winch, term, hup, int } = self;
        tokio::select! {
            Some(()) = next(winch) => Some(SignalEvent::Resize),
            Some(()) = next(term) => Some(SignalEvent::Terminate),
            Some(()) = next(hup) => Some(SignalEvent::Terminate),
            Some(()) = next(int) => Some(SignalEvent::Terminate),
            else => std::future::pending().await,
        }
    }
}

#[cfg(unix)]
async fn next(signal: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match signal {
        Some(signal) => signal.recv().await,
        None => None,
    }
}

#[cfg(not(unix))]
struct Signals;

#[cfg(not(unix))]
impl Signals {
    fn new(_enabled: bool, _tty: bool) -> Result<Self> {
        Ok(Self)
    }

    async fn recv(&mut self) -> Option<SignalEvent> {
        std::future::pending().await
    }
}

// ---------------------------------------------------------------------------
// Blocking entry point
// ---------------------------------------------------------------------------

impl EventLoop {
    /// Run on stdin with a single-threaded runtime until shutdown.
    pub fn block_on(self, manager: &mut ScreenManager) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(self.run(manager, tokio::io::stdin()))
    }
}

/// Run `manager` on stdin until shutdown, with no loop handle.
pub fn run(manager: &mut ScreenManager) -> Result<()> {
    EventLoop::new().block_on(manager)
}

// ===========================================================================
// Tests
// ===========================================================================
