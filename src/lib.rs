//! # termloom
//!
//! A terminal rendering and input engine for full-screen text interfaces.
//!
//! termloom decodes raw terminal bytes into key and mouse events, routes keys
//! through a stack of named binding contexts, divides the screen into
//! rectangular regions for a tree of components, and writes cursor-addressed,
//! styled output through a buffer that batches each frame into one write.
//!
//! ## Core Systems
//!
//! - **[`event`]**: key decoder, key binding router, event bus
//! - **[`render`]**: screen buffer, ANSI commands, text styles
//! - **[`component`]**: component trait, region layout, built-in components
//! - **[`tree`]**: slotmap-backed component tree with focus and input bubbling
//! - **[`manager`]**: terminal lifecycle tying everything together
//! - **[`runtime`]**: tokio event loop over stdin, signals and loop messages
//! - **[`terminal`]**: real and headless terminal backends
//! - **[`testing`]**: Pilot, virtual screen and snapshot helpers
//! - **[`geometry`]**: Size and Region primitives
//!
//! ## Example
//!
//! ```no_run
//! use termloom::component::{Card, Container};
//! use termloom::event::{KeyBinding, Notification, Topic, GLOBAL_CONTEXT};
//! use termloom::{EventLoop, Placement, ScreenConfig, ScreenManager};
//!
//! # fn main() -> termloom::Result<()> {
//! let mut manager = ScreenManager::new(ScreenConfig::default());
//! let root = manager.register_component("root", Container::grid(2, 2), Placement::Fill)?;
//! for title in ["CPU", "Memory", "Disk", "Network"] {
//!     manager.tree_mut().insert_child(root, Card::new().with_title(title))?;
//! }
//!
//! let event_loop = EventLoop::new();
//! let handle = event_loop.handle();
//! manager.register_binding(GLOBAL_CONTEXT, KeyBinding::chord("q")?.action("quit"));
//! manager.bus_mut().subscribe(Topic::Action, move |n| {
//!     if matches!(n, Notification::Action { name, .. } if name == "quit") {
//!         handle.quit();
//!     }
//!     Ok(())
//! });
//! event_loop.block_on(&mut manager)
//! # }
//! ```

// Foundation
pub mod error;
pub mod geometry;

// Input and notifications
pub mod event;

// Rendering
pub mod component;
pub mod render;
pub mod tree;

// Terminal lifecycle
pub mod manager;
pub mod runtime;
pub mod terminal;

// Headless testing
pub mod testing;

pub use error::{Error, HandlerError, HandlerResult, Result};
pub use manager::{Placement, ScreenConfig, ScreenManager};
pub use runtime::{EventLoop, LoopHandle};
