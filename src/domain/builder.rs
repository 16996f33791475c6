//! Nested-set builder: depth-first linearization of a tree into interval-tagged entries.

use tracing::{debug, instrument, trace};

use crate::domain::entities::{Entry, HierarchyNode, NodeId, Position};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::nested_set::NestedSet;

/// First value handed out by the traversal counter.
pub const TRAVERSAL_ORIGIN: Position = 0;

/// Default number of entry slots reserved before the first growth.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Builds nested sets from trees.
///
/// The builder keeps no state between calls; every `build` works on its own
/// buffer, so a failed call leaves nothing behind.
#[derive(Debug, Clone)]
pub struct NestedSetBuilder {
    initial_capacity: usize,
}

impl Default for NestedSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NestedSetBuilder {
    pub fn new() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// Sets the number of slots reserved up front. Zero is bumped to one.
    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity.max(1);
        self
    }

    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Build a nested set from the tree rooted at `root`.
    ///
    /// Entries come out in pre-order. Each node gets `left` from the
    /// traversal counter when it is entered and `right` once all of its
    /// children are done, starting at [`TRAVERSAL_ORIGIN`].
    ///
    /// The traversal keeps its own stack of open nodes instead of recursing,
    /// so depth is bounded by memory, not by the call stack.
    ///
    /// # Errors
    ///
    /// * [`DomainError::InvalidInput`] if `root` is None.
    #[instrument(level = "debug", skip_all, fields(initial_capacity = self.initial_capacity))]
    pub fn build<N: HierarchyNode>(&self, root: Option<N>) -> DomainResult<NestedSet> {
        let root = root.ok_or(DomainError::InvalidInput)?;

        let mut entries: Vec<Entry> = Vec::with_capacity(self.initial_capacity);
        let mut position = TRAVERSAL_ORIGIN;
        // (slot of the open node in `entries`, its remaining children)
        let mut stack = Vec::new();

        open(&mut entries, &mut position, root.id());
        stack.push((0, root.children()));

        while let Some((slot, children)) = stack.last_mut() {
            let slot = *slot;
            match children.next() {
                Some(child) => {
                    let child_slot = entries.len();
                    open(&mut entries, &mut position, child.id());
                    stack.push((child_slot, child.children()));
                }
                None => {
                    // all descendants have taken their positions
                    entries[slot].right = next_position(&mut position);
                    stack.pop();
                }
            }
        }

        debug!(
            entries = entries.len(),
            capacity = entries.capacity(),
            "nested set built"
        );
        Ok(NestedSet::from_entries(entries))
    }
}

fn next_position(position: &mut Position) -> Position {
    let current = *position;
    *position += 1;
    current
}

/// Append a node whose right bound is not known yet.
fn open(entries: &mut Vec<Entry>, position: &mut Position, id: NodeId) {
    if entries.len() == entries.capacity() {
        // double, so the whole build stays linear
        let additional = entries.capacity().max(1);
        trace!(from = entries.capacity(), additional, "growing entry buffer");
        entries.reserve_exact(additional);
    }
    let left = next_position(position);
    entries.push(Entry {
        id,
        left,
        right: left,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::TreeNode;

    #[test]
    fn given_single_node_when_building_then_one_entry_with_origin_bounds() {
        let tree = TreeNode::leaf(42);
        let set = NestedSetBuilder::new().build(Some(&tree)).unwrap();

        assert_eq!(
            set.entries(),
            &[Entry {
                id: 42,
                left: TRAVERSAL_ORIGIN,
                right: TRAVERSAL_ORIGIN + 1
            }]
        );
    }

    #[test]
    fn given_absent_root_when_building_then_invalid_input() {
        let result = NestedSetBuilder::new().build(None::<&TreeNode>);
        assert_eq!(result, Err(DomainError::InvalidInput));
    }

    #[test]
    fn given_tiny_capacity_when_building_then_length_is_exact() {
        let tree = TreeNode::with_children(1, (2..=40).map(TreeNode::leaf).collect());
        let set = NestedSetBuilder::new()
            .with_initial_capacity(0)
            .build(Some(&tree))
            .unwrap();

        assert_eq!(set.len(), 40);
        assert_eq!(set.entries().len(), 40);
    }
}
