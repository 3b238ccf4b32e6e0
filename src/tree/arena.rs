//! The component tree: a slotmap arena of components.
//!
//! All nodes live in one `SlotMap`. Parent and child links are stored in
//! secondary maps, so detaching a subtree is O(1) and removing it is
//! O(subtree size). A parent link is only an index; nothing owns a node
//! except the arena.

use std::collections::VecDeque;

use slotmap::{SecondaryMap, SlotMap};

use super::focus::FocusChain;
use super::node::{Node, NodeId};
use crate::component::{Component, EventContext, RenderContext};
use crate::error::{Error, Result};
use crate::event::input::{KeyEvent, MouseEvent};
use crate::event::message::Notification;
use crate::geometry::Region;
use crate::render::ScreenBuffer;

/// Which nodes a focus operation touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FocusChange {
    pub blurred: Option<NodeId>,
    pub focused: Option<NodeId>,
}

impl FocusChange {
    /// Whether focus actually moved.
    pub fn is_change(&self) -> bool {
        self.blurred.is_some() || self.focused.is_some()
    }
}

/// Parent-owned tree of renderable components.
///
/// At most one node holds focus, and it is always a visible leaf whose
/// component accepts focus. Focus and blur transitions queue
/// [`Notification`]s that the owner drains with
/// [`take_notifications`](Self::take_notifications).
pub struct ComponentTree {
    nodes: SlotMap<NodeId, Node>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    /// Top-level nodes in insertion order; later roots draw on top.
    roots: Vec<NodeId>,
    focused: Option<NodeId>,
    notifications: Vec<Notification>,
}

impl ComponentTree {
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            roots: Vec::new(),
            focused: None,
            notifications: Vec::new(),
        }
    }

    // ── Structure ────────────────────────────────────────────────────

    fn attach(&mut self, component: Box<dyn Component>) -> NodeId {
        let id = self.nodes.insert(Node::new(component));
        self.children.insert(id, Vec::new());
        id
    }

    /// Insert a top-level node.
    pub fn insert_root(&mut self, component: impl Component) -> NodeId {
        self.insert_root_boxed(Box::new(component))
    }

    pub fn insert_root_boxed(&mut self, component: Box<dyn Component>) -> NodeId {
        let id = self.attach(component);
        self.roots.push(id);
        id
    }

    /// Insert a node as the last child of `parent`.
    ///
    /// A focused parent stops being a leaf and loses focus.
    pub fn insert_child(&mut self, parent: NodeId, component: impl Component) -> Result<NodeId> {
        if !self.nodes.contains_key(parent) {
            return Err(Error::StaleNode);
        }
        let id = self.attach(Box::new(component));
        self.parent.insert(id, parent);
        if let Some(siblings) = self.children.get_mut(parent) {
            siblings.push(id);
        }
        if self.focused == Some(parent) {
            tracing::debug!(?parent, "focused node gained a child; blurring it");
            self.blur();
        }
        Ok(id)
    }

    /// Remove a node and its whole subtree. Returns the node's component, or
    /// `None` if the handle was already stale.
    pub fn remove(&mut self, id: NodeId) -> Option<Box<dyn Component>> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        if self.focused.is_some_and(|f| f == id || self.is_descendant(f, id)) {
            self.blur();
        }
        self.detach(id);

        let mut queue = VecDeque::from([id]);
        let mut removed = None;
        while let Some(current) = queue.pop_front() {
            if let Some(kids) = self.children.remove(current) {
                queue.extend(kids);
            }
            self.parent.remove(current);
            let node = self.nodes.remove(current);
            if current == id {
                removed = node.map(|n| n.component);
            }
        }
        removed
    }

    fn detach(&mut self, id: NodeId) {
        match self.parent.remove(id) {
            Some(parent) => {
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.retain(|&child| child != id);
                }
            }
            None => self.roots.retain(|&root| root != id),
        }
    }

    /// Move `node` (with its subtree) under `new_parent`, or to the top level
    /// when `new_parent` is `None`.
    pub fn reparent(&mut self, node: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        if !self.nodes.contains_key(node) {
            return Err(Error::StaleNode);
        }
        match new_parent {
            Some(parent) => {
                if !self.nodes.contains_key(parent) {
                    return Err(Error::StaleNode);
                }
                if parent == node || self.is_descendant(parent, node) {
                    return Err(Error::Cycle);
                }
                self.detach(node);
                self.parent.insert(node, parent);
                if let Some(siblings) = self.children.get_mut(parent) {
                    siblings.push(node);
                }
                if self.focused == Some(parent) {
                    self.blur();
                }
            }
            None => {
                self.detach(node);
                self.roots.push(node);
            }
        }
        Ok(())
    }

    /// Whether `node` lies strictly below `ancestor`.
    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(node).contains(&ancestor)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Children of `id`; empty if it has none or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// From the immediate parent up to the root; excludes `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        result
    }

    /// Every node, roots in insertion order, each subtree depth-first.
    pub fn walk(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|&root| self.walk_depth_first(root))
            .collect()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Component access ─────────────────────────────────────────────

    pub fn get(&self, id: NodeId) -> Option<&dyn Component> {
        self.nodes.get(id).map(|node| node.component.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut (dyn Component + 'static)> {
        self.nodes.get_mut(id).map(|node| node.component.as_mut())
    }

    /// The component at `id` as its concrete type.
    pub fn get_as<T: Component>(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id)?.component.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Component>(&mut self, id: NodeId) -> Option<&mut T> {
        self.nodes.get_mut(id)?.component.as_any_mut().downcast_mut::<T>()
    }

    /// The region `id` was last rendered into; empty if never rendered.
    pub fn region(&self, id: NodeId) -> Option<Region> {
        self.nodes.get(id).map(|node| node.region)
    }

    // ── Visibility ───────────────────────────────────────────────────

    /// Show or hide a node and its subtree. Hiding the focused node (or an
    /// ancestor of it) blurs it.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        let node = self.nodes.get_mut(id).ok_or(Error::StaleNode)?;
        node.visible = visible;
        if !visible && self.focused.is_some_and(|f| f == id || self.is_descendant(f, id)) {
            self.blur();
        }
        Ok(())
    }

    /// Whether `id` and all of its ancestors are visible.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let visible = |n: NodeId| self.nodes.get(n).is_some_and(|node| node.visible);
        visible(id) && self.ancestors(id).into_iter().all(visible)
    }

    // ── Focus ────────────────────────────────────────────────────────

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focused == Some(id)
    }

    /// Whether `id` could take focus right now: a visible leaf whose
    /// component accepts focus.
    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|node| node.component.can_focus())
            && self.children(id).is_empty()
            && self.is_visible(id)
    }

    /// Give focus to `id`, blurring the previous holder.
    ///
    /// Nodes that cannot take focus are ignored and nothing changes.
    pub fn focus(&mut self, id: NodeId) -> Result<FocusChange> {
        if !self.nodes.contains_key(id) {
            return Err(Error::StaleNode);
        }
        if self.focused == Some(id) || !self.is_focusable(id) {
            return Ok(FocusChange::default());
        }
        let blurred = self.blur();
        self.focused = Some(id);
        self.notifications.push(Notification::Focus { node: id });
        Ok(FocusChange {
            blurred,
            focused: Some(id),
        })
    }

    /// Drop focus. Returns the node that had it.
    pub fn blur(&mut self) -> Option<NodeId> {
        let node = self.focused.take()?;
        self.notifications.push(Notification::Blur { node });
        Some(node)
    }

    /// Focus the next focusable leaf in depth-first order, wrapping around.
    pub fn focus_next(&mut self) -> Result<FocusChange> {
        let mut chain = FocusChain::new();
        chain.rebuild(self);
        match chain.focus_next() {
            Some(id) => self.focus(id),
            None => Ok(FocusChange::default()),
        }
    }

    pub fn focus_previous(&mut self) -> Result<FocusChange> {
        let mut chain = FocusChain::new();
        chain.rebuild(self);
        match chain.focus_previous() {
            Some(id) => self.focus(id),
            None => Ok(FocusChange::default()),
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render `id` into `region`, then its children into the regions its
    /// layout assigns them.
    ///
    /// The region is cleared first. Hidden nodes and empty regions render
    /// nothing.
    pub fn render(&mut self, id: NodeId, region: Region, buffer: &mut ScreenBuffer) -> Result<()> {
        let focused = self.focused == Some(id);
        let node = self.nodes.get_mut(id).ok_or(Error::StaleNode)?;
        if !node.visible || region.is_empty() {
            self.forget_regions(id);
            return Ok(());
        }
        node.region = region;
        buffer.fill_region(region, ' ')?;
        node.component.render(&mut RenderContext::new(id, region, focused, buffer))?;

        let content = node.component.content_region(region).intersection(region);
        let layout = node.component.layout();
        let (shown, hidden): (Vec<NodeId>, Vec<NodeId>) = self
            .children(id)
            .iter()
            .copied()
            .partition(|&child| self.nodes.get(child).is_some_and(|n| n.visible));

        for child in hidden {
            self.forget_regions(child);
        }
        let regions = layout.split(content, shown.len());
        for (child, child_region) in shown.into_iter().zip(regions) {
            self.render(child, child_region.intersection(content), buffer)?;
        }
        Ok(())
    }

    /// Render `id` again into the region it was last given.
    pub fn rerender(&mut self, id: NodeId, buffer: &mut ScreenBuffer) -> Result<()> {
        let region = self.region(id).ok_or(Error::StaleNode)?;
        if region.is_empty() || !self.is_visible(id) {
            return Ok(());
        }
        self.render(id, region, buffer)
    }

    fn forget_regions(&mut self, id: NodeId) {
        for node in self.walk_depth_first(id) {
            if let Some(node) = self.nodes.get_mut(node) {
                node.region = Region::EMPTY;
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    /// The topmost, deepest visible node whose last rendered region contains
    /// `(x, y)`.
    pub fn hit_test(&self, x: i32, y: i32) -> Option<NodeId> {
        self.roots
            .iter()
            .rev()
            .find_map(|&root| self.hit_in(root, x, y))
    }

    fn hit_in(&self, id: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let node = self.nodes.get(id)?;
        if !node.visible || !node.region.contains(x, y) {
            return None;
        }
        self.children(id)
            .iter()
            .rev()
            .find_map(|&child| self.hit_in(child, x, y))
            .or(Some(id))
    }

    /// Offer a key to the focused node, then to each ancestor until one
    /// consumes it. Returns the consumer.
    pub fn dispatch_key(&mut self, key: &KeyEvent) -> Option<NodeId> {
        let start = self.focused?;
        self.bubble(start, |component, ctx| component.handle_input(key.text(), key, ctx))
    }

    /// Offer a mouse event to the node under the pointer, then to its
    /// ancestors until one consumes it.
    pub fn dispatch_mouse(&mut self, mouse: &MouseEvent) -> Option<NodeId> {
        let start = self.hit_test(i32::from(mouse.x), i32::from(mouse.y))?;
        self.bubble(start, |component, ctx| component.handle_mouse(mouse, ctx))
    }

    fn bubble<F>(&mut self, start: NodeId, mut offer: F) -> Option<NodeId>
    where
        F: FnMut(&mut dyn Component, &mut EventContext) -> bool,
    {
        let mut path = vec![start];
        path.extend(self.ancestors(start));
        for id in path {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            let mut ctx = EventContext::new(id, node.region);
            let consumed = offer(node.component.as_mut(), &mut ctx);
            self.notifications.extend(ctx.into_notifications());
            if consumed {
                return Some(id);
            }
        }
        None
    }

    /// Drain queued notifications, oldest first.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }
}

impl Default for ComponentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentTree")
            .field("nodes", &self.nodes.len())
            .field("roots", &self.roots)
            .field("focused", &self.focused)
            .finish()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Card, Container, Label, Layout};
    use crate::event::input::{Key, Modifiers, MouseAction, MouseBtn};
    use crate::geometry::Size;
    use crate::testing::{InputProbe, SharedOutput, VirtualScreen};
    use pretty_assertions::assert_eq;

    /// ```text
    ///       root
    ///      /    \
    ///    a        b
    ///   / \
    ///  c   d
    /// ```
    fn build_tree() -> (ComponentTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root(Container::vertical());
        let a = tree.insert_child(root, Container::horizontal()).unwrap();
        let b = tree.insert_child(root, InputProbe::new("b")).unwrap();
        let c = tree.insert_child(a, InputProbe::new("c")).unwrap();
        let d = tree.insert_child(a, Label::new("d")).unwrap();
        (tree, root, a, b, c, d)
    }

    fn buffer(width: u16, height: u16) -> (ScreenBuffer, SharedOutput) {
        let out = SharedOutput::new();
        (ScreenBuffer::new(Box::new(out.clone()), Size::new(width, height)), out)
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(Key::Char(c), Modifiers::NONE)
    }

    // ── Structure ────────────────────────────────────────────────────

    #[test]
    fn parent_child_links() {
        let (tree, root, a, b, c, d) = build_tree();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.parent(root), None);
        assert_eq!(tree.children(root), &[a, b]);
        assert_eq!(tree.children(a), &[c, d]);
        assert_eq!(tree.ancestors(c), vec![a, root]);
        assert_eq!(tree.walk_depth_first(root), vec![root, a, c, d, b]);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn insert_under_stale_parent_fails() {
        let mut tree = ComponentTree::new();
        let gone = tree.insert_root(Container::default());
        tree.remove(gone);
        assert!(matches!(tree.insert_child(gone, Label::new("x")), Err(Error::StaleNode)));
    }

    #[test]
    fn remove_subtree_invalidates_handles() {
        let (mut tree, root, a, b, c, d) = build_tree();
        let removed = tree.remove(a).unwrap();
        assert_eq!(removed.name(), "Container");
        for id in [a, c, d] {
            assert!(!tree.contains(id));
        }
        assert_eq!(tree.children(root), &[b]);
        assert!(tree.remove(a).is_none());
    }

    #[test]
    fn remove_root_detaches_from_roots() {
        let (mut tree, root, ..) = build_tree();
        tree.remove(root);
        assert!(tree.is_empty());
        assert!(tree.roots().is_empty());
    }

    #[test]
    fn reparent_moves_subtree() {
        let (mut tree, root, a, b, c, _d) = build_tree();
        let e = tree.insert_child(b, Label::new("e"));
        assert!(e.is_ok());
        tree.reparent(c, Some(root)).unwrap();
        assert_eq!(tree.children(root).last(), Some(&c));
        assert!(!tree.children(a).contains(&c));

        tree.reparent(a, None).unwrap();
        assert_eq!(tree.roots(), &[root, a]);
        assert_eq!(tree.parent(a), None);
    }

    #[test]
    fn reparent_rejects_cycles() {
        let (mut tree, root, a, _b, c, _d) = build_tree();
        assert!(matches!(tree.reparent(root, Some(c)), Err(Error::Cycle)));
        assert!(matches!(tree.reparent(a, Some(a)), Err(Error::Cycle)));
        assert_eq!(tree.parent(a), Some(root));
    }

    #[test]
    fn typed_access() {
        let (mut tree, _root, _a, _b, _c, d) = build_tree();
        assert_eq!(tree.get_as::<Label>(d).map(Label::text), Some("d"));
        assert!(tree.get_as::<Card>(d).is_none());
        tree.get_as_mut::<Label>(d).unwrap().set_text("changed");
        assert_eq!(tree.get_as::<Label>(d).unwrap().text(), "changed");
    }

    // ── Focus ────────────────────────────────────────────────────────

    #[test]
    fn single_focus_with_notifications() {
        let (mut tree, _root, _a, b, c, _d) = build_tree();
        let change = tree.focus(c).unwrap();
        assert_eq!(change, FocusChange { blurred: None, focused: Some(c) });

        let change = tree.focus(b).unwrap();
        assert_eq!(change, FocusChange { blurred: Some(c), focused: Some(b) });
        assert_eq!(tree.focused(), Some(b));
        assert_eq!(
            tree.take_notifications(),
            vec![
                Notification::Focus { node: c },
                Notification::Blur { node: c },
                Notification::Focus { node: b },
            ]
        );
    }

    #[test]
    fn containers_and_plain_components_do_not_take_focus() {
        let (mut tree, root, _a, _b, _c, d) = build_tree();
        assert!(!tree.focus(root).unwrap().is_change());
        assert!(!tree.focus(d).unwrap().is_change());
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn focused_leaf_loses_focus_when_it_gains_a_child() {
        let (mut tree, _root, _a, b, ..) = build_tree();
        tree.focus(b).unwrap();
        tree.insert_child(b, Label::new("inner")).unwrap();
        assert_eq!(tree.focused(), None);
    }

    #[test]
    fn hiding_or_removing_focus_blurs() {
        let (mut tree, _root, a, b, c, _d) = build_tree();
        tree.focus(c).unwrap();
        tree.set_visible(a, false).unwrap();
        assert_eq!(tree.focused(), None);
        assert!(!tree.is_visible(c));

        tree.focus(b).unwrap();
        tree.remove(b);
        assert_eq!(tree.focused(), None);
        assert_eq!(tree.take_notifications().last(), Some(&Notification::Blur { node: b }));
    }

    #[test]
    fn tab_order_walks_focusable_leaves() {
        let (mut tree, _root, _a, b, c, _d) = build_tree();
        assert_eq!(tree.focus_next().unwrap().focused, Some(c));
        assert_eq!(tree.focus_next().unwrap().focused, Some(b));
        assert_eq!(tree.focus_next().unwrap().focused, Some(c));
        assert_eq!(tree.focus_previous().unwrap().focused, Some(b));
    }

    // ── Rendering ────────────────────────────────────────────────────

    #[test]
    fn render_assigns_non_overlapping_child_regions() {
        let (mut tree, root, a, b, c, d) = build_tree();
        let (mut buf, _out) = buffer(20, 6);
        tree.render(root, Region::new(0, 0, 20, 6), &mut buf).unwrap();

        assert_eq!(tree.region(a), Some(Region::new(0, 0, 20, 3)));
        assert_eq!(tree.region(b), Some(Region::new(0, 3, 20, 3)));
        assert_eq!(tree.region(c), Some(Region::new(0, 0, 10, 3)));
        assert_eq!(tree.region(d), Some(Region::new(10, 0, 10, 3)));
    }

    #[test]
    fn render_clears_the_whole_region_before_drawing() {
        let mut tree = ComponentTree::new();
        let label = tree.insert_root(Label::new("a much longer line"));
        let (mut buf, out) = buffer(20, 2);
        tree.render(label, Region::new(0, 0, 20, 2), &mut buf).unwrap();
        tree.get_as_mut::<Label>(label).unwrap().set_text("short");
        tree.rerender(label, &mut buf).unwrap();

        let mut screen = VirtualScreen::new(20, 2);
        screen.feed(&out.contents());
        assert_eq!(screen.row(0), "short");
    }

    #[test]
    fn empty_region_renders_nothing() {
        let mut tree = ComponentTree::new();
        let card = tree.insert_root(Card::new().with_title("x"));
        let (mut buf, out) = buffer(10, 5);
        tree.render(card, Region::new(0, 0, 0, 5), &mut buf).unwrap();
        tree.render(card, Region::new(2, 2, 4, -1), &mut buf).unwrap();
        assert_eq!(out.contents(), "");
        assert_eq!(tree.region(card), Some(Region::EMPTY));
    }

    #[test]
    fn hidden_children_give_up_their_share() {
        let mut tree = ComponentTree::new();
        let root = tree.insert_root(Container::new(Layout::rows(2)));
        let top = tree.insert_child(root, Label::new("top")).unwrap();
        let bottom = tree.insert_child(root, Label::new("bottom")).unwrap();
        tree.set_visible(top, false).unwrap();

        let (mut buf, _out) = buffer(10, 4);
        tree.render(root, Region::new(0, 0, 10, 4), &mut buf).unwrap();
        assert_eq!(tree.region(top), Some(Region::EMPTY));
        assert_eq!(tree.region(bottom), Some(Region::new(0, 0, 10, 4)));
    }

    #[test]
    fn card_children_stay_inside_the_border() {
        let mut tree = ComponentTree::new();
        let card = tree.insert_root(Card::new().with_title("System"));
        let body = tree.insert_child(card, Label::new("cpu 3%")).unwrap();
        let (mut buf, out) = buffer(40, 10);
        tree.render(card, Region::new(0, 0, 40, 10), &mut buf).unwrap();

        assert_eq!(tree.region(body), Some(Region::new(1, 1, 38, 8)));
        let mut screen = VirtualScreen::new(40, 10);
        screen.feed(&out.contents());
        assert_eq!(screen.row(1), format!("│cpu 3%{}│", " ".repeat(32)));
    }

    // ── Input ────────────────────────────────────────────────────────

    #[test]
    fn keys_bubble_from_focus_to_ancestors() {
        let (mut tree, _root, _a, b, ..) = build_tree();
        tree.focus(b).unwrap();
        tree.take_notifications();

        assert_eq!(tree.dispatch_key(&key('x')), Some(b));
        assert_eq!(tree.get_as::<InputProbe>(b).unwrap().value(), "x");
        assert_eq!(
            tree.take_notifications(),
            vec![Notification::Change { source: b, value: "x".into() }]
        );

        // Unconsumed keys reach the ancestors and then fall out.
        assert_eq!(tree.dispatch_key(&KeyEvent::new(Key::F(2), Modifiers::NONE)), None);
    }

    #[test]
    fn no_focus_means_no_key_dispatch() {
        let (mut tree, ..) = build_tree();
        assert_eq!(tree.dispatch_key(&key('x')), None);
    }

    #[test]
    fn hit_test_prefers_topmost_deepest() {
        let (mut tree, root, _a, b, c, _d) = build_tree();
        let overlay = tree.insert_root(InputProbe::new("overlay"));
        let (mut buf, _out) = buffer(20, 6);
        tree.render(root, Region::new(0, 0, 20, 6), &mut buf).unwrap();
        tree.render(overlay, Region::new(15, 0, 5, 1), &mut buf).unwrap();

        assert_eq!(tree.hit_test(1, 1), Some(c));
        assert_eq!(tree.hit_test(1, 4), Some(b));
        assert_eq!(tree.hit_test(16, 0), Some(overlay));
        assert_eq!(tree.hit_test(30, 30), None);

        let click = MouseEvent {
            kind: MouseAction::Down(MouseBtn::Left),
            x: 2,
            y: 4,
            modifiers: Modifiers::NONE,
        };
        assert_eq!(tree.dispatch_mouse(&click), Some(b));
    }
}
