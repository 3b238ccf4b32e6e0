//! Snapshot rendering helpers.
//!
//! Render a component (or a subtree) onto a [`VirtualScreen`] and return the
//! plain text a user would see, for `insta` snapshots and assertions.

use crate::component::Component;
use crate::error::Result;
use crate::geometry::Size;
use crate::render::ScreenBuffer;
use crate::tree::{ComponentTree, NodeId};

use super::output::SharedOutput;
use super::virtual_screen::VirtualScreen;

/// Render a single component into a `width` x `height` screen.
///
/// Each row becomes one line with trailing spaces trimmed; rows are joined
/// with `'\n'`.
///
/// ```
/// use termloom::component::Label;
/// use termloom::testing::render_to_string;
///
/// let text = render_to_string(Label::new("Hello"), 10, 2).unwrap();
/// assert_eq!(text, "Hello\n");
/// ```
pub fn render_to_string(component: impl Component, width: u16, height: u16) -> Result<String> {
    let mut tree = ComponentTree::new();
    let root = tree.insert_root(component);
    render_tree_to_string(&mut tree, root, width, height)
}

/// Render `root` and its subtree into a `width` x `height` screen.
pub fn render_tree_to_string(tree: &mut ComponentTree, root: NodeId, width: u16, height: u16) -> Result<String> {
    let size = Size::new(width, height);
    let out = SharedOutput::new();
    let mut buffer = ScreenBuffer::new(Box::new(out.clone()), size);
    tree.render(root, size.to_region(), &mut buffer)?;

    let mut screen = VirtualScreen::new(size.width, size.height);
    screen.feed(&out.contents());
    Ok(screen.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Card, Container, Label, Layout};

    #[test]
    fn nested_cards_in_a_grid() {
        let mut tree = ComponentTree::new();
        let grid = tree.insert_root(Container::new(Layout::Grid { columns: 2, rows: 1 }));
        for title in ["CPU", "MEM"] {
            let card = tree.insert_child(grid, Card::new().with_title(title)).unwrap();
            tree.insert_child(card, Label::new("ok")).unwrap();
        }

        let text = render_tree_to_string(&mut tree, grid, 20, 3).unwrap();
        insta::assert_snapshot!(text, @r"
        ┌──CPU───┐┌──MEM───┐
        │ok      ││ok      │
        └────────┘└────────┘
        ");
    }

    #[test]
    fn label_clips_to_width() {
        let text = render_to_string(Label::new("overflowing"), 4, 1).unwrap();
        assert_eq!(text, "over");
    }
}
