//! Arena-backed input trees.
//!
//! Nodes live in a flat generational arena and refer to each other by
//! [`Index`], so very large or very deep trees can be built and dropped
//! without recursion.

use std::slice;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::entities::{HierarchyNode, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct ArenaTreeNode {
    /// Identifier copied into the nested-set entry
    pub id: NodeId,
    /// Index of parent node in the arena, None for the root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based tree structure.
///
/// Nodes can only be attached below a parent that is already in the arena
/// and nothing is ever removed, so every child index stays valid and the
/// structure cannot contain a cycle.
#[derive(Debug)]
pub struct TreeArena {
    /// Arena storage for all tree nodes
    arena: Arena<ArenaTreeNode>,
    /// Index of the root node, None for empty trees
    root: Option<Index>,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            arena: Arena::with_capacity(capacity),
            root: None,
        }
    }

    /// Inserts a node below `parent`, or as the root when `parent` is None.
    pub fn insert_node(&mut self, id: NodeId, parent: Option<Index>) -> DomainResult<Index> {
        match parent {
            Some(parent_idx) if !self.arena.contains(parent_idx) => {
                return Err(DomainError::InvalidParent(parent_idx));
            }
            None if self.root.is_some() => return Err(DomainError::DuplicateRoot),
            _ => {}
        }

        let node_idx = self.arena.insert(ArenaTreeNode {
            id,
            parent,
            children: Vec::new(),
        });

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.root = Some(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&ArenaTreeNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    /// Builder handle for the root, None for an empty arena.
    pub fn root_node(&self) -> Option<ArenaNode<'_>> {
        self.root.and_then(|idx| self.node(idx))
    }

    pub fn node(&self, idx: Index) -> Option<ArenaNode<'_>> {
        self.arena.get(idx).map(|node| ArenaNode { arena: self, node })
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Number of levels, 0 for an empty tree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(Index, usize)> = self.root.into_iter().map(|idx| (idx, 1)).collect();

        while let Some((idx, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            if let Some(node) = self.get_node(idx) {
                stack.extend(node.children.iter().map(|&child| (child, depth + 1)));
            }
        }
        max_depth
    }

    /// Ids of all leaf nodes in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_ids(&self) -> Vec<NodeId> {
        self.iter()
            .filter(|(_, node)| node.children.is_empty())
            .map(|(_, node)| node.id)
            .collect()
    }
}

/// Borrowed handle to one arena node, the arena's [`HierarchyNode`] view.
#[derive(Debug, Clone, Copy)]
pub struct ArenaNode<'a> {
    arena: &'a TreeArena,
    node: &'a ArenaTreeNode,
}

impl<'a> ArenaNode<'a> {
    pub fn parent(&self) -> Option<ArenaNode<'a>> {
        self.node.parent.and_then(|idx| self.arena.node(idx))
    }
}

impl<'a> HierarchyNode for ArenaNode<'a> {
    type Children = ArenaChildren<'a>;

    fn id(&self) -> NodeId {
        self.node.id
    }

    fn children(&self) -> Self::Children {
        ArenaChildren {
            arena: self.arena,
            indices: self.node.children.iter(),
        }
    }
}

/// Iterator over the children of an [`ArenaNode`].
#[derive(Debug, Clone)]
pub struct ArenaChildren<'a> {
    arena: &'a TreeArena,
    indices: slice::Iter<'a, Index>,
}

impl<'a> Iterator for ArenaChildren<'a> {
    type Item = ArenaNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // child indices always point at live nodes, the arena never removes
        self.indices.find_map(|&idx| self.arena.node(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.indices.len()))
    }
}

/// Pre-order iterator over an arena tree.
pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena) -> Self {
        Self {
            arena,
            stack: arena.root().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a ArenaTreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev());
                return Some((current_idx, node));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_empty_arena_when_querying_then_has_no_root() {
        let tree = TreeArena::new();
        assert!(tree.is_empty());
        assert!(tree.root_node().is_none());
        assert_eq!(tree.depth(), 0);
        assert_eq!(tree.iter().count(), 0);
    }

    #[test]
    fn given_second_root_when_inserting_then_fails() {
        let mut tree = TreeArena::new();
        tree.insert_node(1, None).unwrap();
        assert_eq!(tree.insert_node(2, None), Err(DomainError::DuplicateRoot));
    }

    #[test]
    fn given_foreign_parent_index_when_inserting_then_fails() {
        let mut other = TreeArena::new();
        let _ = other.insert_node(1, None).unwrap();
        let foreign = other.insert_node(2, other.root()).unwrap();

        let mut tree = TreeArena::new();
        tree.insert_node(1, None).unwrap();
        assert_eq!(
            tree.insert_node(3, Some(foreign)),
            Err(DomainError::InvalidParent(foreign))
        );
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn given_tree_when_iterating_then_visits_preorder() {
        let mut tree = TreeArena::new();
        let root = tree.insert_node(1, None).unwrap();
        let b = tree.insert_node(2, Some(root)).unwrap();
        tree.insert_node(3, Some(b)).unwrap();
        tree.insert_node(4, Some(b)).unwrap();
        let e = tree.insert_node(5, Some(root)).unwrap();
        tree.insert_node(6, Some(e)).unwrap();

        let ids: Vec<NodeId> = tree.iter().map(|(_, node)| node.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.leaf_ids(), vec![3, 4, 6]);

        let six = tree.node(tree.get_node(e).unwrap().children[0]).unwrap();
        assert_eq!(six.parent().map(|p| p.id()), Some(5));
    }
}
