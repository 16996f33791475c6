//! Cursor over a nested set.

use tracing::{instrument, trace};

use crate::domain::entities::{Entry, NodeId};
use crate::domain::error::{DomainError, DomainResult};

/// Forward-only cursor over the entries of a nested set.
///
/// Each enumerator owns its position and only borrows the entries, so many
/// of them can walk the same set independently. A single enumerator is not
/// meant to be shared between threads.
///
/// The cursor is terminal once it has moved past the last entry (or from
/// the start, for an empty set) and stays terminal.
#[derive(Debug, Clone)]
pub struct NestedSetEnumerator<'a> {
    entries: &'a [Entry],
    cursor: usize,
}

impl<'a> NestedSetEnumerator<'a> {
    pub(crate) fn new(entries: &'a [Entry]) -> Self {
        Self { entries, cursor: 0 }
    }

    /// Index of the cursor in the encoding.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn is_terminal(&self) -> bool {
        self.cursor >= self.entries.len()
    }

    /// Entry under the cursor, None when terminal.
    pub fn current(&self) -> Option<&'a Entry> {
        self.entries.get(self.cursor)
    }

    /// Id under the cursor.
    ///
    /// # Errors
    ///
    /// * [`DomainError::OutOfBounds`] if the cursor is terminal.
    pub fn current_id(&self) -> DomainResult<NodeId> {
        self.current()
            .map(|entry| entry.id)
            .ok_or_else(|| self.out_of_bounds())
    }

    /// Moves one entry forward. Does nothing once terminal.
    pub fn advance(&mut self) {
        if !self.is_terminal() {
            self.cursor += 1;
        }
    }

    /// Visits the current entry and every entry of its subtree, in order.
    ///
    /// The next entry belongs to the subtree while its `left` is below the
    /// subtree root's `right`. The cursor absorbs each such entry and ends up
    /// *on* the last one visited, not past it; call [`advance`](Self::advance)
    /// to move beyond the subtree. Returns the number of ids visited.
    ///
    /// # Errors
    ///
    /// * [`DomainError::OutOfBounds`] if the cursor is terminal; nothing is visited.
    #[instrument(level = "trace", skip_all, fields(position = self.cursor))]
    pub fn extract_subtree<F>(&mut self, mut visit: F) -> DomainResult<usize>
    where
        F: FnMut(NodeId),
    {
        let root = *self.current().ok_or_else(|| self.out_of_bounds())?;
        visit(root.id);
        let mut visited = 1;

        while let Some(next) = self.entries.get(self.cursor + 1) {
            if next.left >= root.right {
                break;
            }
            self.cursor += 1;
            visit(next.id);
            visited += 1;
        }

        trace!(root = root.id, visited, "subtree extracted");
        Ok(visited)
    }

    fn out_of_bounds(&self) -> DomainError {
        DomainError::OutOfBounds {
            position: self.cursor,
            len: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::nested_set::NestedSet;

    #[test]
    fn given_empty_set_when_enumerating_then_terminal_immediately() {
        let set = NestedSet::empty();
        let mut enumerator = set.enumerator();

        assert!(enumerator.is_terminal());
        assert_eq!(
            enumerator.current_id(),
            Err(DomainError::OutOfBounds {
                position: 0,
                len: 0
            })
        );

        let mut visited = Vec::new();
        assert!(enumerator.extract_subtree(|id| visited.push(id)).is_err());
        assert!(visited.is_empty());

        enumerator.advance();
        assert!(enumerator.is_terminal());
        assert_eq!(enumerator.position(), 0);
    }
}
