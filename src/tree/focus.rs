//! Tab-order focus chain.
//!
//! [`FocusChain`] is a snapshot of the focusable leaves of a
//! [`ComponentTree`] in depth-first order. The tree builds one on demand for
//! [`ComponentTree::focus_next`] and [`ComponentTree::focus_previous`];
//! applications that want custom ordering can build their own.

use super::arena::ComponentTree;
use super::node::NodeId;

/// Ordered list of focusable nodes for tab navigation.
#[derive(Debug, Default)]
pub struct FocusChain {
    /// Focusable leaves in tab order (depth-first, roots in registration order).
    nodes: Vec<NodeId>,
    /// Index of the currently focused node, or `None` if no focus.
    current: Option<usize>,
}

impl FocusChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from the tree: every visible leaf whose component accepts
    /// focus. The tree's focused node, if it is in the chain, is current.
    pub fn rebuild(&mut self, tree: &ComponentTree) {
        self.nodes = tree
            .walk()
            .into_iter()
            .filter(|&id| tree.is_focusable(id))
            .collect();
        self.current = tree
            .focused()
            .and_then(|focused| self.nodes.iter().position(|&n| n == focused));
    }

    pub fn current_node(&self) -> Option<NodeId> {
        self.current.and_then(|idx| self.nodes.get(idx).copied())
    }

    /// Advance to the next node, wrapping around. `None` if the chain is empty.
    pub fn focus_next(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let next = match self.current {
            Some(idx) => (idx + 1) % self.nodes.len(),
            None => 0,
        };
        self.current = Some(next);
        self.nodes.get(next).copied()
    }

    /// Step back to the previous node, wrapping around.
    pub fn focus_previous(&mut self) -> Option<NodeId> {
        if self.nodes.is_empty() {
            return None;
        }
        let prev = match self.current {
            Some(0) | None => self.nodes.len() - 1,
            Some(idx) => idx - 1,
        };
        self.current = Some(prev);
        self.nodes.get(prev).copied()
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
