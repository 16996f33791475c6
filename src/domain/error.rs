//! Domain-level errors (no external dependencies)

use generational_arena::Index;
use thiserror::Error;

use crate::domain::entities::Position;

/// Domain errors represent violations of the nested-set contract.
/// Every operation is a pure computation, so none of these are retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid input: tree root is absent")]
    InvalidInput,

    #[error("cursor at position {position} is out of bounds for a nested set of {len} entries")]
    OutOfBounds { position: usize, len: usize },

    #[error("invalid parent node: {0:?}")]
    InvalidParent(Index),

    #[error("tree already has a root node")]
    DuplicateRoot,

    #[error("nested set invariant violated at position {position}: {reason}")]
    InvariantViolated { position: Position, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
