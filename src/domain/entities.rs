//! Domain entities: core data structures

use std::slice;

use serde::{Deserialize, Serialize};

/// Identifier carried by a tree node into its nested-set entry.
pub type NodeId = i64;

/// Value of the depth-first traversal counter written into `left`/`right`.
pub type Position = usize;

/// Read-only view of a tree node, the only thing the builder needs from its input.
///
/// Implemented by `&TreeNode` and by arena handles. Children must be yielded
/// in their original order; that order becomes the sibling order of the
/// encoding.
pub trait HierarchyNode: Sized {
    /// Iterator over the direct children of a node.
    type Children: Iterator<Item = Self>;

    fn id(&self) -> NodeId;

    fn children(&self) -> Self::Children;
}

/// Owned tree node used as builder input.
///
/// A node owns its children, so a `TreeNode` is acyclic by construction.
/// Dropping is iterative; `Clone`, `PartialEq` and `Debug` recurse, so very
/// deep inputs are better kept in a [`TreeArena`](crate::domain::TreeArena).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub id: NodeId,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    /// Alias for [`TreeNode::new`] that reads better in fixtures.
    pub fn leaf(id: NodeId) -> Self {
        Self::new(id)
    }

    pub fn with_children(id: NodeId, children: Vec<TreeNode>) -> Self {
        Self { id, children }
    }

    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Always false: a tree node counts itself.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ids in pre-order depth-first order.
    pub fn preorder_ids(&self) -> Vec<NodeId> {
        let mut ids = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            ids.push(node.id);
            // Push children in reverse order for left-to-right traversal
            stack.extend(node.children.iter().rev());
        }
        ids
    }
}

impl Drop for TreeNode {
    fn drop(&mut self) {
        // detach descendants so no node is dropped with children still attached
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl<'a> HierarchyNode for &'a TreeNode {
    type Children = slice::Iter<'a, TreeNode>;

    fn id(&self) -> NodeId {
        self.id
    }

    fn children(&self) -> Self::Children {
        let node: &'a TreeNode = *self;
        node.children.iter()
    }
}

/// One node's position in the nested-set encoding.
///
/// `left` is written when the node is entered, `right` once all of its
/// descendants have been written, so `left < right` and every descendant's
/// interval lies strictly inside its ancestors' intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub id: NodeId,
    pub left: Position,
    pub right: Position,
}

impl Entry {
    /// True if `other` is a strict descendant of `self`.
    pub fn contains(&self, other: &Entry) -> bool {
        self.left < other.left && other.right < self.right
    }

    /// True if the interval has no room for a descendant.
    ///
    /// Only meaningful for dense positions, as the builder writes them. For
    /// encodings restored with gaps use [`NestedSet::is_leaf`](crate::domain::NestedSet::is_leaf).
    pub fn is_leaf(&self) -> bool {
        self.right == self.left + 1
    }

    /// Number of descendants, derived from the interval width alone.
    ///
    /// Dense positions only, see [`is_leaf`](Self::is_leaf).
    pub fn descendant_count(&self) -> usize {
        self.right.saturating_sub(self.left).saturating_sub(1) / 2
    }
}
