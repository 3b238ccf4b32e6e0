//! Components: the render/input contract, layouts, and built-in containers.
//!
//! - **[`Component`]**: what the tree renders and routes input to
//! - **[`Layout`]**: how a container splits its region among children
//! - **[`Container`]**, **[`Card`]**, **[`Label`]**: reference components

pub mod card;
pub mod container;
pub mod label;
pub mod layout;
pub mod traits;

pub use card::Card;
pub use container::Container;
pub use label::Label;
pub use layout::{distribute, Constraint, Dock, Layout};
pub use traits::{clip_to_width, Component, EventContext, RenderContext};
