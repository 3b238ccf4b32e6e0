//! Component tree: slotmap arena, render recursion, focus, input bubbling.

pub mod arena;
pub mod focus;
pub mod node;

pub use arena::{ComponentTree, FocusChange};
pub use focus::FocusChain;
pub use node::NodeId;
