//! Predicate application against the record store
//!
//! Filtering is a pure projection: the store is never touched, the result is
//! an index set over it. All predicate components are conjunctive and are
//! applied in one pass before any view transform sees the subset.

use crate::filter::predicate::FilterPredicate;
use crate::store::FlowStore;
use crate::types::FlowRecord;

/// Subset of a store selected by a predicate
///
/// Holds indices into the store rather than copies of the records, so a
/// filtered view is cheap even over large stores. An empty view is a valid
/// outcome, not an error.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    store: &'a FlowStore,
    indices: Vec<usize>,
}

impl<'a> FilteredView<'a> {
    /// Number of records in the subset
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the subset is empty
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Store indices of the selected records, in store order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Iterate the selected records in store order
    pub fn iter(&self) -> impl Iterator<Item = &'a FlowRecord> + '_ {
        let records = self.store.records();
        self.indices.iter().map(move |&i| &records[i])
    }
}

/// Apply a predicate to a store, producing the matching subset
pub fn apply<'a>(predicate: &FilterPredicate, store: &'a FlowStore) -> FilteredView<'a> {
    let indices = store
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| predicate.matches(record))
        .map(|(i, _)| i)
        .collect();
    FilteredView { store, indices }
}
