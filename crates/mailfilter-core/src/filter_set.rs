//! The ordered, id-unique collection of filters being edited.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::identity::IdAllocator;
use crate::merge::{self, IdReassignment, MergeOutcome, MergePolicy};
use crate::record::{Conditions, FilterRecord};

/// Suffix appended to the name of a duplicated filter.
pub const COPY_SUFFIX: &str = " (Copied)";

/// Errors from editing operations on a [`FilterSet`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterSetError {
    /// No filter has the given id.
    #[error("filter not found: {0}")]
    NotFound(String),

    /// The set must keep at least one filter.
    #[error("cannot remove the last remaining filter")]
    LastFilter,

    /// A reorder index is outside the set.
    #[error("position {index} is out of range (set has {len} filter(s))")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Result type for filter set operations.
pub type FilterSetResult<T> = std::result::Result<T, FilterSetError>;

/// An ordered sequence of filters, unique by id.
///
/// Order is the display and export order. Records are owned here; the codec
/// only borrows them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    filters: Vec<FilterRecord>,
}

impl FilterSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps records as loaded, without checking ids.
    ///
    /// Call [`ensure_unique_ids`](Self::ensure_unique_ids) before relying on
    /// uniqueness.
    pub fn from_records(filters: Vec<FilterRecord>) -> Self {
        Self { filters }
    }

    /// Returns the records in order.
    pub fn records(&self) -> &[FilterRecord] {
        &self.filters
    }

    /// Consumes the set, returning its records.
    pub fn into_records(self) -> Vec<FilterRecord> {
        self.filters
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FilterRecord> {
        self.filters.iter()
    }

    /// Returns the filter with the given id.
    pub fn get(&self, id: &str) -> Option<&FilterRecord> {
        self.filters.iter().find(|f| f.id == id)
    }

    /// Returns the filter with the given id, mutably.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut FilterRecord> {
        self.filters.iter_mut().find(|f| f.id == id)
    }

    /// Returns the position of the filter with the given id.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.filters.iter().position(|f| f.id == id)
    }

    /// Returns an allocator that avoids every id in the set.
    pub fn id_allocator(&self) -> IdAllocator {
        IdAllocator::with_used(self.filters.iter().map(|f| f.id.clone()))
    }

    /// Appends a fresh untitled filter and returns its id.
    pub fn add_new(&mut self) -> String {
        let id = self.id_allocator().allocate(self.filters.len());
        self.filters.push(FilterRecord::new(id.clone()));
        id
    }

    /// Appends a deep copy of a filter under a new id and returns that id.
    pub fn duplicate(&mut self, id: &str) -> FilterSetResult<String> {
        let source = self.require(id)?.clone();
        Ok(self.push_copy(source))
    }

    /// Appends a copy that keeps only the actions of a filter.
    ///
    /// Conditions are reset to their defaults.
    pub fn duplicate_actions(&mut self, id: &str) -> FilterSetResult<String> {
        let mut source = self.require(id)?.clone();
        source.conditions = Conditions::default();
        Ok(self.push_copy(source))
    }

    fn push_copy(&mut self, mut record: FilterRecord) -> String {
        let new_id = self.id_allocator().allocate(self.filters.len());
        record.id = new_id.clone();
        record.name.push_str(COPY_SUFFIX);
        self.filters.push(record);
        new_id
    }

    fn require(&self, id: &str) -> FilterSetResult<&FilterRecord> {
        self.get(id)
            .ok_or_else(|| FilterSetError::NotFound(id.to_string()))
    }

    /// Removes a filter and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`FilterSetError::LastFilter`] if it is the only filter left,
    /// or [`FilterSetError::NotFound`] if no filter has that id.
    pub fn remove(&mut self, id: &str) -> FilterSetResult<FilterRecord> {
        let index = self
            .position(id)
            .ok_or_else(|| FilterSetError::NotFound(id.to_string()))?;
        if self.filters.len() <= 1 {
            return Err(FilterSetError::LastFilter);
        }
        Ok(self.filters.remove(index))
    }

    /// Moves the filter at `from` to position `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> FilterSetResult<()> {
        let len = self.filters.len();
        for index in [from, to] {
            if index >= len {
                return Err(FilterSetError::IndexOutOfRange { index, len });
            }
        }
        let record = self.filters.remove(from);
        self.filters.insert(to, record);
        Ok(())
    }

    /// Repairs missing and duplicate ids; see [`merge::ensure_unique_ids`].
    pub fn ensure_unique_ids(&mut self) -> Vec<IdReassignment> {
        let mut ids = IdAllocator::new();
        merge::ensure_unique_ids(&mut self.filters, &mut ids)
    }

    /// Combines imported filters with this set.
    ///
    /// The set is only replaced once the merged result is complete.
    pub fn merge_imported(
        &mut self,
        imported: Vec<FilterRecord>,
        policy: MergePolicy,
    ) -> Vec<IdReassignment> {
        let mut ids = IdAllocator::new();
        let MergeOutcome {
            filters,
            reassigned,
        } = merge::merge_filter_sets(&self.filters, imported, policy, &mut ids);
        self.filters = filters;
        reassigned
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a FilterRecord;
    type IntoIter = std::slice::Iter<'a, FilterRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

impl From<Vec<FilterRecord>> for FilterSet {
    fn from(filters: Vec<FilterRecord>) -> Self {
        Self::from_records(filters)
    }
}
