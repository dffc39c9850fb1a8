//! Output formatting utilities for the mf CLI.
//!
//! This module provides functions for formatting data as tables or JSON.
//! It is organized into submodules:
//!
//! - [`filters`] - Filter output formatting (list, show, add, duplicate, remove, move)
//! - [`transfer`] - Export, import, query and settings output formatting
//! - [`helpers`] - Common formatting utilities (truncation, condition and action summaries)

mod filters;
pub mod helpers;
mod transfer;

// Filters
pub use filters::{
    format_created_filter, format_duplicated_filter, format_filter_details_json,
    format_filter_details_table, format_filters_json, format_filters_table, format_moved_filter,
    format_removed_filter,
};

// Export, import, query, settings
pub use transfer::{
    format_export_result, format_import_result, format_query_json, format_query_table,
    format_settings_json, format_settings_table,
};
