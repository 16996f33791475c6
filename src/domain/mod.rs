//! Domain layer: entities and the nested-set algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod entities;
pub mod enumerator;
pub mod error;
pub mod nested_set;

pub use arena::{ArenaNode, ArenaTreeNode, TreeArena};
pub use builder::{NestedSetBuilder, DEFAULT_INITIAL_CAPACITY, TRAVERSAL_ORIGIN};
pub use entities::{Entry, HierarchyNode, NodeId, Position, TreeNode};
pub use enumerator::NestedSetEnumerator;
pub use error::{DomainError, DomainResult};
pub use nested_set::NestedSet;
