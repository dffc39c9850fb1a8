//! Mail filter rules: condition grammar, filter document codec and storage.
//!
//! This crate converts filter rules between three representations:
//! - the structured [`ConditionExpr`] model (OR-groups of AND-terms) used for editing
//! - flat query strings like `(a AND b) OR c`, via [`condition`]
//! - the Gmail-compatible Atom XML filter document, via [`codec`]
//!
//! Around that it keeps the [`FilterSet`] being edited unique by id, merges
//! imported filters into it, and persists filters and [`AppSettings`]
//! through a [`KeyValueStore`].
//!
//! # Example
//!
//! ```
//! use mailfilter_core::{codec, FilterSet, MergePolicy};
//!
//! let mut filters = FilterSet::new();
//! let id = filters.add_new();
//! let record = filters.get_mut(&id).unwrap();
//! record.name = "Receipts".to_string();
//! record.conditions.from = mailfilter_core::condition::parse_condition("shop@example.com");
//! record.actions.skip_inbox = true;
//!
//! let xml = codec::export_document(filters.records(), &codec::ExportOptions::default());
//! assert!(xml.contains(r#"<apps:property name="from" value="shop@example.com"/>"#));
//!
//! let imported = codec::import_document(&xml, &mut filters.id_allocator()).unwrap();
//! filters.merge_imported(imported, MergePolicy::Merge);
//! assert_eq!(filters.len(), 2);
//! ```

pub mod codec;
pub mod condition;
mod filter_set;
mod identity;
mod merge;
mod record;
mod repository;
mod settings;
mod store;

pub use codec::{CodecError, CodecResult, ExportOptions};
pub use condition::{AndGroup, ConditionExpr, ConditionParser, ParseOutcome};
pub use filter_set::{FilterSet, FilterSetError, FilterSetResult, COPY_SUFFIX};
pub use identity::IdAllocator;
pub use merge::{ensure_unique_ids, merge_filter_sets, IdReassignment, MergeOutcome, MergePolicy};
pub use record::{
    ActionSet, CategoryAction, ConditionField, Conditions, FilterRecord, ForwardAction,
    LabelAction, SizeCondition, SizeOperator, DEFAULT_SIZE_UNIT, UNTITLED_NAME,
};
pub use repository::{FilterRepository, FILTERS_KEY, SETTINGS_KEY};
pub use settings::AppSettings;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError, StoreResult};
