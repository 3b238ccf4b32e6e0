//! Node handle and per-node storage.

use slotmap::new_key_type;

use crate::component::Component;
use crate::geometry::Region;

new_key_type! {
    /// Handle to a component in a [`ComponentTree`](super::ComponentTree).
    /// Copy, lightweight (u64). Stale handles are detected, never reused.
    pub struct NodeId;
}

/// One component plus the state the tree tracks for it.
pub(crate) struct Node {
    pub(crate) component: Box<dyn Component>,
    pub(crate) visible: bool,
    /// Region from the last render pass; empty until rendered or while hidden.
    pub(crate) region: Region,
}

impl Node {
    pub(crate) fn new(component: Box<dyn Component>) -> Self {
        Self {
            component,
            visible: true,
            region: Region::EMPTY,
        }
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("component", &self.component.name())
            .field("visible", &self.visible)
            .field("region", &self.region)
            .finish()
    }
}
