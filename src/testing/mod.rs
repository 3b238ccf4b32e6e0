//! Headless testing framework: Pilot, captured output, virtual screen.
//!
//! Use the [`Pilot`] to drive a [`ScreenManager`](crate::manager::ScreenManager)
//! without a real terminal. Use [`render_to_string`] to capture a component's
//! output as plain text, and [`VirtualScreen`] to interpret raw output.

pub mod output;
pub mod pilot;
pub mod probe;
pub mod snapshot;
pub mod virtual_screen;

pub use output::SharedOutput;
pub use pilot::Pilot;
pub use probe::InputProbe;
pub use snapshot::{render_to_string, render_tree_to_string};
pub use virtual_screen::VirtualScreen;
