//! The flat nested-set encoding.

use tracing::instrument;

use crate::domain::entities::{Entry, NodeId};
use crate::domain::enumerator::NestedSetEnumerator;
use crate::domain::error::{DomainError, DomainResult};

/// Immutable, pre-ordered sequence of interval-tagged entries.
///
/// Entries are sorted by `left`, which is the same as pre-order of the
/// source tree. The set never hands out mutable access, so any number of
/// enumerators on any number of threads can read it at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NestedSet {
    entries: Box<[Entry]>,
}

impl NestedSet {
    /// The empty encoding; its enumerators start out terminal.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Takes ownership of built entries, dropping any spare capacity.
    pub(crate) fn from_entries(entries: Vec<Entry>) -> Self {
        Self {
            entries: entries.into_boxed_slice(),
        }
    }

    /// Restores a set from entries that were stored elsewhere.
    ///
    /// # Errors
    ///
    /// * [`DomainError::InvariantViolated`] if the entries are not a valid encoding.
    pub fn try_from_entries(entries: Vec<Entry>) -> DomainResult<Self> {
        let set = Self::from_entries(entries);
        set.validate()?;
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Ids in encoding order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.entries.iter().map(|entry| entry.id)
    }

    /// New cursor positioned on the first entry.
    pub fn enumerator(&self) -> NestedSetEnumerator<'_> {
        NestedSetEnumerator::new(&self.entries)
    }

    /// Index of the first entry carrying `id`.
    pub fn position_of(&self, id: NodeId) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// The entry at `index` followed by all of its descendants.
    ///
    /// The run ends at the first entry starting at or past the root's right
    /// bound, so gaps between positions do not matter.
    pub fn subtree(&self, index: usize) -> Option<&[Entry]> {
        let root = self.entries.get(index)?;
        let descendants = self.entries[index + 1..]
            .iter()
            .take_while(|entry| entry.left < root.right)
            .count();
        self.entries.get(index..=index + descendants)
    }

    /// True if the entry at `index` contains no other entry, None if out of range.
    pub fn is_leaf(&self, index: usize) -> Option<bool> {
        let entry = self.entries.get(index)?;
        Some(
            self.entries
                .get(index + 1)
                .map_or(true, |next| next.left >= entry.right),
        )
    }

    /// Entries whose interval contains the entry at `index`, outermost first.
    pub fn ancestors(&self, index: usize) -> impl Iterator<Item = &Entry> + '_ {
        let target = self.entries.get(index).copied();
        self.entries[..index.min(self.entries.len())]
            .iter()
            .filter(move |entry| target.is_some_and(|target| entry.contains(&target)))
    }

    /// Re-checks the interval invariants on every entry.
    ///
    /// Sets produced by the builder always pass. Useful for encodings that
    /// went through a consumer's own storage and came back.
    #[instrument(level = "debug", skip(self), fields(len = self.len()))]
    pub fn validate(&self) -> DomainResult<()> {
        // right bounds of entries that are still open at the current position
        let mut open: Vec<usize> = Vec::new();
        let mut previous_left = None;

        for (position, entry) in self.entries.iter().enumerate() {
            let violation = |reason: String| DomainError::InvariantViolated { position, reason };

            if entry.left >= entry.right {
                return Err(violation(format!(
                    "left {} is not below right {}",
                    entry.left, entry.right
                )));
            }
            if previous_left.is_some_and(|previous| entry.left <= previous) {
                return Err(violation("entries are not ordered by left bound".to_string()));
            }
            previous_left = Some(entry.left);

            while open.last().is_some_and(|&right| right < entry.left) {
                open.pop();
            }
            match open.last() {
                Some(&right) if entry.right >= right => {
                    return Err(violation(format!(
                        "interval overlaps its parent ending at {right}"
                    )));
                }
                None if position > 0 => {
                    return Err(violation("interval lies outside the root".to_string()));
                }
                _ => {}
            }
            open.push(entry.right);
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a NestedSet {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl TryFrom<Vec<Entry>> for NestedSet {
    type Error = DomainError;

    fn try_from(entries: Vec<Entry>) -> DomainResult<Self> {
        Self::try_from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: NodeId, left: usize, right: usize) -> Entry {
        Entry { id, left, right }
    }

    fn sample_entries() -> Vec<Entry> {
        // 1 -> {2 -> {3, 4}, 5 -> {6}}
        vec![
            entry(1, 0, 11),
            entry(2, 1, 6),
            entry(3, 2, 3),
            entry(4, 4, 5),
            entry(5, 7, 10),
            entry(6, 8, 9),
        ]
    }

    #[test]
    fn given_entries_when_slicing_subtree_then_returns_contiguous_run() {
        let set = NestedSet::from_entries(sample_entries());

        let ids: Vec<NodeId> = set.subtree(1).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 3, 4]);
        assert_eq!(set.subtree(5).unwrap().len(), 1);
        assert_eq!(set.subtree(0).unwrap().len(), 6);
        assert!(set.subtree(6).is_none());
    }

    #[test]
    fn given_gapped_positions_when_slicing_subtree_then_follows_containment() {
        // 1 -> {2, 3, 4, 5, 6} with room left inside 2, as after deleting its children
        let set = NestedSet::try_from_entries(vec![
            entry(1, 0, 20),
            entry(2, 1, 10),
            entry(3, 11, 12),
            entry(4, 13, 14),
            entry(5, 15, 16),
            entry(6, 17, 18),
        ])
        .unwrap();

        let ids: Vec<NodeId> = set.subtree(1).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(set.subtree(0).unwrap().len(), 6);
        assert_eq!(set.is_leaf(1), Some(true));
        assert_eq!(set.is_leaf(0), Some(false));
        assert_eq!(set.is_leaf(6), None);

        let mut enumerator = set.enumerator();
        enumerator.advance();
        let mut extracted = Vec::new();
        enumerator.extract_subtree(|id| extracted.push(id)).unwrap();
        assert_eq!(extracted, ids);
    }

    #[test]
    fn given_entries_when_listing_ancestors_then_outermost_first() {
        let set = NestedSet::from_entries(sample_entries());

        let ids: Vec<NodeId> = set.ancestors(3).map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(set.ancestors(0).count(), 0);
        assert_eq!(set.ancestors(99).count(), 0);
    }

    #[test]
    fn given_valid_entries_when_validating_then_ok() {
        assert!(NestedSet::from_entries(sample_entries()).validate().is_ok());
        assert!(NestedSet::empty().validate().is_ok());
    }

    #[test]
    fn given_overlapping_sibling_when_validating_then_reports_position() {
        let mut entries = sample_entries();
        entries[3].right = 7;

        let err = NestedSet::from_entries(entries).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolated { position: 3, .. }));
    }

    #[test]
    fn given_second_root_when_validating_then_fails() {
        let mut entries = sample_entries();
        entries.push(entry(7, 12, 13));

        let err = NestedSet::from_entries(entries).validate().unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolated { position: 6, .. }));
    }

    #[test]
    fn given_inverted_interval_when_validating_then_fails() {
        let entries = vec![entry(1, 3, 3)];
        let err = NestedSet::try_from(entries).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolated { position: 0, .. }));
    }

    #[test]
    fn given_stored_entries_when_restoring_then_equals_original() {
        let restored = NestedSet::try_from_entries(sample_entries()).unwrap();
        assert_eq!(restored, NestedSet::from_entries(sample_entries()));
    }
}
