//! Nested-set encoding of trees.
//!
//! A tree is flattened depth-first into `(id, left, right)` entries where
//! every descendant's interval lies strictly inside its ancestors'. The
//! resulting [`NestedSet`](domain::NestedSet) answers subtree and ancestor
//! questions from the bounds alone, and
//! [`NestedSetEnumerator`](domain::NestedSetEnumerator) walks it with a
//! cursor that can absorb a whole subtree in one call.
//!
//! ```
//! use nested_sets::domain::{NestedSetBuilder, TreeNode};
//!
//! let tree = TreeNode::with_children(
//!     1,
//!     vec![
//!         TreeNode::with_children(2, vec![TreeNode::leaf(3), TreeNode::leaf(4)]),
//!         TreeNode::with_children(5, vec![TreeNode::leaf(6)]),
//!     ],
//! );
//! let set = NestedSetBuilder::new().build(Some(&tree))?;
//!
//! let mut enumerator = set.enumerator();
//! enumerator.advance();
//! let mut subtree = Vec::new();
//! enumerator.extract_subtree(|id| subtree.push(id))?;
//! assert_eq!(subtree, vec![2, 3, 4]);
//!
//! enumerator.advance();
//! assert_eq!(enumerator.current_id()?, 5);
//! # Ok::<(), nested_sets::domain::DomainError>(())
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod generator;
pub mod tree_traits;
pub mod util;

pub use domain::{
    DomainError, DomainResult, Entry, NestedSet, NestedSetBuilder, NestedSetEnumerator, NodeId,
    TreeNode,
};
