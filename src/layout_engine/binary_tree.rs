use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use tracing::trace;

use crate::layout_engine::GrowDirection;
use crate::layout_engine::geometry::Rect;

slotmap::new_key_type! { pub struct PackerNodeId; }

/// A slot in the packing tree. Unused nodes are free space; used nodes hold a
/// placed rectangle in their top-left corner and always have both children.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackerNode {
    pub rect: Rect,
    pub used: bool,
    pub down: Option<PackerNodeId>,
    pub right: Option<PackerNodeId>,
}

impl PackerNode {
    fn free(rect: Rect) -> Self {
        Self {
            rect,
            used: false,
            down: None,
            right: None,
        }
    }
}

/// Growing binary tree of free and occupied slots. The root starts at the
/// size of the first rectangle inserted and is extended to the right or
/// downward whenever the next rectangle does not fit anywhere.
#[derive(Default, Clone, Serialize, Deserialize)]
pub struct PackerTree {
    nodes: SlotMap<PackerNodeId, PackerNode>,
    root: Option<PackerNodeId>,
}

impl PackerTree {
    pub fn new() -> Self { Self::default() }

    pub fn with_root(w: f64, h: f64) -> Self {
        let mut tree = Self::default();
        tree.root = Some(tree.make_node(Rect::from_size(w, h)));
        tree
    }

    pub fn root(&self) -> Option<PackerNodeId> { self.root }

    /// Current bounds of the root, 0×0 before anything was inserted.
    pub fn root_rect(&self) -> Rect {
        self.root.and_then(|id| self.nodes.get(id)).map_or(Rect::default(), |n| n.rect)
    }

    pub fn node(&self, id: PackerNodeId) -> Option<&PackerNode> { self.nodes.get(id) }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    fn make_node(&mut self, rect: Rect) -> PackerNodeId { self.nodes.insert(PackerNode::free(rect)) }

    /// Depth-first search for a free node of at least `w × h`, trying the
    /// `right` subtree of every used node before its `down` subtree.
    pub fn find_node(&self, w: f64, h: f64) -> Option<PackerNodeId> {
        let mut stack = Vec::new();
        stack.extend(self.root);
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.used {
                // popped in reverse: right is visited first
                stack.extend(node.down);
                stack.extend(node.right);
            } else if node.rect.fits(w, h) {
                return Some(id);
            }
        }
        None
    }

    /// Occupies the top-left `w × h` of a free node and carves the rest into
    /// a `down` slot spanning the full node width and a `right` slot spanning
    /// only the placed height. Returns the placed rectangle.
    pub fn split_node(&mut self, id: PackerNodeId, w: f64, h: f64) -> Option<Rect> {
        let rect = self.nodes.get(id)?.rect;
        let down = self.make_node(Rect::new(rect.x, rect.y + h, rect.w, rect.h - h));
        let right = self.make_node(Rect::new(rect.x + w, rect.y, rect.w - w, h));

        let node = self.nodes.get_mut(id)?;
        node.used = true;
        node.down = Some(down);
        node.right = Some(right);
        Some(Rect::new(rect.x, rect.y, w, h))
    }

    /// Replaces the root with a larger one that keeps the old root as a child
    /// and adds a fresh strip sized for a `w × h` rectangle.
    pub fn grow(&mut self, direction: GrowDirection, w: f64, h: f64) {
        let Some(old_root) = self.root else {
            self.root = Some(self.make_node(Rect::from_size(w, h)));
            return;
        };
        let old = self.root_rect();
        let (bounds, strip) = match direction {
            GrowDirection::Right => (
                Rect::from_size(old.w + w, old.h),
                Rect::new(old.w, 0.0, w, old.h),
            ),
            GrowDirection::Down => (
                Rect::from_size(old.w, old.h + h),
                Rect::new(0.0, old.h, old.w, h),
            ),
        };
        let strip = self.make_node(strip);
        let (down, right) = match direction {
            GrowDirection::Right => (old_root, strip),
            GrowDirection::Down => (strip, old_root),
        };
        let root = self.nodes.insert(PackerNode {
            rect: bounds,
            used: true,
            down: Some(down),
            right: Some(right),
        });
        trace!(?direction, w = bounds.w, h = bounds.h, "grew packing root");
        self.root = Some(root);
    }

    /// Places a `w × h` rectangle, growing the root when needed. The first
    /// insertion into an empty tree seeds the root with the rectangle's size.
    /// `None` means neither growth direction could accommodate it.
    pub fn insert(&mut self, w: f64, h: f64) -> Option<Rect> {
        if self.is_empty() {
            self.root = Some(self.make_node(Rect::from_size(w, h)));
        }
        if let Some(node) = self.find_node(w, h) {
            return self.split_node(node, w, h);
        }
        let root = self.root_rect();
        let direction = GrowDirection::choose(root.w, root.h, w, h)?;
        self.grow(direction, w, h);
        let node = self.find_node(w, h)?;
        self.split_node(node, w, h)
    }

    /// Unused leaves, i.e. the free space left inside the root.
    pub fn free_slots(&self) -> Vec<Rect> {
        self.nodes.values().filter(|n| !n.used).map(|n| n.rect).collect()
    }

    pub fn draw_tree(&self) -> String {
        fn write_node(this: &PackerTree, id: PackerNodeId, out: &mut String, indent: usize) {
            let Some(node) = this.nodes.get(id) else { return };
            for _ in 0..indent {
                out.push_str("  ");
            }
            let r = node.rect;
            let tag = if node.used { "Used" } else { "Free" };
            out.push_str(&format!("{tag} ({}, {}) {}x{}\n", r.x, r.y, r.w, r.h));
            if let Some(right) = node.right {
                write_node(this, right, out, indent + 1);
            }
            if let Some(down) = node.down {
                write_node(this, down, out, indent + 1);
            }
        }
        match self.root {
            Some(root) => {
                let mut s = String::new();
                write_node(self, root, &mut s, 0);
                s
            }
            None => "<empty packer>".to_string(),
        }
    }
}
