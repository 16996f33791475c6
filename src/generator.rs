//! Tree fixtures: fixed-shape generated trees and the canonical sample tree.

use std::collections::VecDeque;

use tracing::{debug, instrument};

use crate::domain::{DomainResult, NodeId, TreeArena, TreeNode};

/// Upper bound on arena slots reserved before generating; larger trees grow.
const MAX_PREALLOCATED_NODES: usize = 1 << 20;

/// Generates complete trees where every internal node has `fanout` children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeGenerator {
    fanout: usize,
}

impl TreeGenerator {
    pub fn new(fanout: usize) -> Self {
        Self { fanout }
    }

    pub fn fanout(&self) -> usize {
        self.fanout
    }

    /// Nodes in a tree with `depth` levels below the root, None if that
    /// does not fit in `usize`.
    pub fn node_count(&self, depth: u32) -> Option<usize> {
        let mut total: usize = 1;
        let mut level: usize = 1;
        for _ in 0..depth {
            level = level.checked_mul(self.fanout)?;
            total = total.checked_add(level)?;
        }
        Some(total)
    }

    /// Owned tree with `depth` levels below the root. Ids come from `next_id`
    /// in pre-order.
    pub fn create_fixed_size_tree<F>(&self, depth: u32, next_id: &mut F) -> TreeNode
    where
        F: FnMut() -> NodeId,
    {
        let mut node = TreeNode::new(next_id());
        if depth > 0 {
            node.children = (0..self.fanout)
                .map(|_| self.create_fixed_size_tree(depth - 1, next_id))
                .collect();
        }
        node
    }

    /// Same shape as [`create_fixed_size_tree`](Self::create_fixed_size_tree),
    /// stored in an arena. Built breadth-first, so ids come out in level order.
    #[instrument(level = "debug", skip(self, next_id))]
    pub fn create_arena_tree<F>(&self, depth: u32, mut next_id: F) -> DomainResult<TreeArena>
    where
        F: FnMut() -> NodeId,
    {
        let capacity = self
            .node_count(depth)
            .map_or(MAX_PREALLOCATED_NODES, |count| count.min(MAX_PREALLOCATED_NODES));
        let mut tree = TreeArena::with_capacity(capacity);
        let root = tree.insert_node(next_id(), None)?;

        let mut queue = VecDeque::new();
        queue.push_back((root, 0));

        while let Some((parent, level)) = queue.pop_front() {
            if level == depth {
                continue;
            }
            for _ in 0..self.fanout {
                let child = tree.insert_node(next_id(), Some(parent))?;
                queue.push_back((child, level + 1));
            }
        }

        debug!(nodes = tree.len(), "arena tree generated");
        Ok(tree)
    }
}

/// Id source counting up from `first`.
pub fn sequential_ids(first: NodeId) -> impl FnMut() -> NodeId {
    let mut next = first;
    move || {
        let id = next;
        next += 1;
        id
    }
}

/// The canonical six-node tree:
///
/// ```text
/// 1
/// ├── 2
/// │   ├── 3
/// │   └── 4
/// └── 5
///     └── 6
/// ```
pub fn sample_tree() -> TreeNode {
    TreeNode::with_children(
        1,
        vec![
            TreeNode::with_children(2, vec![TreeNode::leaf(3), TreeNode::leaf(4)]),
            TreeNode::with_children(5, vec![TreeNode::leaf(6)]),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_fanout_when_counting_nodes_then_sums_levels() {
        assert_eq!(TreeGenerator::new(2).node_count(0), Some(1));
        assert_eq!(TreeGenerator::new(2).node_count(3), Some(15));
        assert_eq!(TreeGenerator::new(6).node_count(5), Some(9331));
        assert_eq!(TreeGenerator::new(1).node_count(9), Some(10));
        assert_eq!(TreeGenerator::new(1).node_count(100), Some(101));
    }

    #[test]
    fn given_huge_shape_when_counting_nodes_then_none() {
        assert_eq!(TreeGenerator::new(3).node_count(100), None);
        assert_eq!(TreeGenerator::new(usize::MAX).node_count(2), None);
    }

    #[test]
    fn given_shape_above_reservation_cap_when_counting_then_still_exact() {
        // 2^21 - 1 nodes, more than is reserved up front
        assert_eq!(TreeGenerator::new(2).node_count(20), Some((1 << 21) - 1));
    }

    #[test]
    fn given_sequential_ids_when_called_then_counts_up() {
        let mut ids = sequential_ids(10);
        assert_eq!((ids(), ids(), ids()), (10, 11, 12));
    }
}
