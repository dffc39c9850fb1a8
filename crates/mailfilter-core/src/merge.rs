//! Merge logic for combining imported filters with the existing set.
//!
//! Existing records are never touched: imported records are appended, and
//! any imported id that clashes with one already present is reallocated
//! first. The same id bookkeeping drives the integrity pass that repairs
//! missing or duplicate ids before a set is persisted or exported.

use std::collections::HashSet;

use log::{info, warn};

use crate::identity::IdAllocator;
use crate::record::FilterRecord;

/// How imported filters combine with the existing ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// The imported filters become the whole set.
    Replace,
    /// The imported filters are appended after the existing ones.
    #[default]
    Merge,
}

/// An id that was replaced to keep the set unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdReassignment {
    /// Position of the record in the resulting set.
    pub index: usize,
    /// The id the record had before (possibly empty).
    pub old_id: String,
    /// The freshly allocated id.
    pub new_id: String,
}

/// Result of a merge: the complete new set and the ids that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub filters: Vec<FilterRecord>,
    pub reassigned: Vec<IdReassignment>,
}

/// Merges `imported` into `existing` according to `policy`.
///
/// The merge is all-or-nothing: it builds and returns a new vector and
/// leaves both inputs alone, so the caller keeps the pre-merge set until it
/// decides to store the outcome. Merging into an empty set behaves like
/// [`MergePolicy::Replace`].
pub fn merge_filter_sets(
    existing: &[FilterRecord],
    imported: Vec<FilterRecord>,
    policy: MergePolicy,
    ids: &mut IdAllocator,
) -> MergeOutcome {
    let policy = if existing.is_empty() {
        MergePolicy::Replace
    } else {
        policy
    };

    let mut filters: Vec<FilterRecord> = Vec::with_capacity(existing.len() + imported.len());
    let mut seen: HashSet<String> = HashSet::new();
    if policy == MergePolicy::Merge {
        filters.extend_from_slice(existing);
        seen.extend(existing.iter().map(|f| f.id.clone()));
    }

    for record in filters.iter().chain(imported.iter()) {
        if !record.id.is_empty() {
            ids.reserve(record.id.clone());
        }
    }

    let imported_count = imported.len();
    let mut reassigned = Vec::new();

    for mut record in imported {
        let index = filters.len();
        if record.id.is_empty() || seen.contains(&record.id) {
            let new_id = ids.allocate(index);
            warn!(
                "imported filter {:?} has id {:?} already in use; assigned {}",
                record.display_name(),
                record.id,
                new_id
            );
            reassigned.push(IdReassignment {
                index,
                old_id: std::mem::replace(&mut record.id, new_id.clone()),
                new_id,
            });
        }
        seen.insert(record.id.clone());
        filters.push(record);
    }

    info!(
        "{:?} of {} imported filter(s): {} total, {} id(s) reassigned",
        policy,
        imported_count,
        filters.len(),
        reassigned.len()
    );

    MergeOutcome {
        filters,
        reassigned,
    }
}

/// Repairs missing and duplicate ids in place.
///
/// The first record seen with a given id keeps it; later duplicates and
/// records without an id get a fresh one. Returns what was changed, in
/// record order.
pub fn ensure_unique_ids(records: &mut [FilterRecord], ids: &mut IdAllocator) -> Vec<IdReassignment> {
    for record in records.iter() {
        if !record.id.is_empty() {
            ids.reserve(record.id.clone());
        }
    }

    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    let mut repaired = Vec::new();

    for (index, record) in records.iter_mut().enumerate() {
        if !record.id.is_empty() && seen.insert(record.id.clone()) {
            continue;
        }

        let new_id = ids.allocate(index);
        warn!(
            "filter {:?} at position {} has {} id; assigned {}",
            record.display_name(),
            index,
            if record.id.is_empty() { "no" } else { "a duplicate" },
            new_id
        );
        seen.insert(new_id.clone());
        repaired.push(IdReassignment {
            index,
            old_id: std::mem::replace(&mut record.id, new_id.clone()),
            new_id,
        });
    }

    repaired
}
