//! Filter output formatting.

use mailfilter_core::{ConditionField, FilterRecord};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::filters::{
    FilterAddResult, FilterDuplicateResult, FilterMoveResult, FilterRemoveResult, FilterShowResult,
};

use super::helpers::{describe_actions, describe_size, format_flag, summarize_conditions, truncate_str};

/// JSON output structure for the list command.
#[derive(Serialize)]
pub struct FiltersListOutput<'a> {
    pub filters: Vec<FilterOutput<'a>>,
}

/// JSON output structure for a single filter in a list.
#[derive(Serialize)]
pub struct FilterOutput<'a> {
    pub position: usize,
    pub id: &'a str,
    pub name: &'a str,
    pub conditions: String,
    pub actions: Vec<String>,
}

/// Formats filters as JSON.
pub fn format_filters_json(filters: &[FilterRecord]) -> Result<String, serde_json::Error> {
    let filters_output: Vec<FilterOutput> = filters
        .iter()
        .enumerate()
        .map(|(index, f)| FilterOutput {
            position: index + 1,
            id: &f.id,
            name: &f.name,
            conditions: summarize_conditions(&f.conditions),
            actions: describe_actions(&f.actions),
        })
        .collect();

    let output = FiltersListOutput {
        filters: filters_output,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats filters as a table.
pub fn format_filters_table(filters: &[FilterRecord], use_colors: bool) -> String {
    if filters.is_empty() {
        return "No filters found.\n".to_string();
    }

    let mut output = String::new();

    let header = format!("{:<4} {:<26} {:<25} {}", "#", "ID", "Name", "Conditions");
    if use_colors {
        output.push_str(&format!("{}\n", header.dimmed()));
    } else {
        output.push_str(&header);
        output.push('\n');
    }

    for (index, filter) in filters.iter().enumerate() {
        let name = truncate_str(filter.display_name(), 25);
        let name = if filter.name.is_empty() && use_colors {
            format!("{:<25}", name).dimmed().to_string()
        } else {
            format!("{:<25}", name)
        };
        let conditions = truncate_str(&summarize_conditions(&filter.conditions), 50);

        let line = format!("{:<4} {:<26} {} {}", index + 1, filter.id, name, conditions);
        output.push_str(&line);
        output.push('\n');
    }

    output
}

/// JSON output structure for filter details (show command).
#[derive(Serialize)]
pub struct FilterDetailsOutput<'a> {
    pub position: usize,
    pub total: usize,
    #[serde(flatten)]
    pub filter: &'a FilterRecord,
    /// Canonical query strings for the set condition fields.
    pub queries: Vec<QueryOutput>,
    pub delete_exported: bool,
}

/// One canonical condition query.
#[derive(Serialize)]
pub struct QueryOutput {
    pub field: &'static str,
    pub query: String,
}

/// Formats filter details as JSON.
pub fn format_filter_details_json(result: &FilterShowResult) -> Result<String, serde_json::Error> {
    let queries = ConditionField::ALL
        .into_iter()
        .filter_map(|field| {
            result
                .filter
                .conditions
                .field(field)
                .to_query_string()
                .map(|query| QueryOutput {
                    field: field.label(),
                    query,
                })
        })
        .collect();

    let output = FilterDetailsOutput {
        position: result.position,
        total: result.total,
        filter: &result.filter,
        queries,
        delete_exported: result.filter.actions.delete && result.delete_enabled,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats filter details as a human-readable table.
pub fn format_filter_details_table(result: &FilterShowResult, use_colors: bool) -> String {
    let filter = &result.filter;
    let mut output = String::new();

    let name_label = if use_colors {
        "Filter:".bold().to_string()
    } else {
        "Filter:".to_string()
    };
    output.push_str(&format!("{} {}\n", name_label, filter.display_name()));
    output.push_str(&format!("ID: {}\n", filter.id));
    output.push_str(&format!("Position: {} of {}\n", result.position, result.total));

    output.push_str("\nConditions:\n");
    if filter.conditions.is_empty() {
        output.push_str("  (none)\n");
    }
    for field in ConditionField::ALL {
        if let Some(query) = filter.conditions.field(field).to_query_string() {
            output.push_str(&format!("  {}: {}\n", field.label(), query));
        }
    }
    if let Some(size) = describe_size(&filter.conditions) {
        output.push_str(&format!("  size: {}\n", size));
    }
    if filter.conditions.has_attachment {
        output.push_str(&format!(
            "  has attachment: {}\n",
            format_flag(true, use_colors)
        ));
    }

    output.push_str("\nActions:\n");
    let actions = describe_actions(&filter.actions);
    if actions.is_empty() {
        output.push_str("  (none)\n");
    }
    for action in actions {
        if action == "Delete" && !result.delete_enabled {
            let note = "(not exported: delete action is disabled)";
            let note = if use_colors {
                note.yellow().to_string()
            } else {
                note.to_string()
            };
            output.push_str(&format!("  {} {}\n", action, note));
        } else {
            output.push_str(&format!("  {}\n", action));
        }
    }

    output
}

/// JSON output structure for a created filter.
#[derive(Serialize)]
pub struct CreatedFilterOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub position: usize,
    pub literal_fields: Vec<&'static str>,
    pub delete_suppressed: bool,
}

/// Formats a created filter as JSON.
pub fn format_created_filter(result: &FilterAddResult) -> Result<String, serde_json::Error> {
    let output = CreatedFilterOutput {
        id: &result.id,
        name: &result.name,
        position: result.position,
        literal_fields: result.literal_fields.iter().map(|f| f.label()).collect(),
        delete_suppressed: result.delete_suppressed,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a duplicated filter.
#[derive(Serialize)]
pub struct DuplicatedFilterOutput<'a> {
    pub source_id: &'a str,
    pub id: &'a str,
    pub name: &'a str,
    pub actions_only: bool,
}

/// Formats a duplicated filter as JSON.
pub fn format_duplicated_filter(result: &FilterDuplicateResult) -> Result<String, serde_json::Error> {
    let output = DuplicatedFilterOutput {
        source_id: &result.source_id,
        id: &result.id,
        name: &result.name,
        actions_only: result.actions_only,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a removed filter.
#[derive(Serialize)]
pub struct RemovedFilterOutput<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub remaining: usize,
}

/// Formats a removed filter as JSON.
pub fn format_removed_filter(result: &FilterRemoveResult) -> Result<String, serde_json::Error> {
    let output = RemovedFilterOutput {
        id: &result.id,
        name: &result.name,
        remaining: result.remaining,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a moved filter.
#[derive(Serialize)]
pub struct MovedFilterOutput<'a> {
    pub id: &'a str,
    pub from: usize,
    pub to: usize,
}

/// Formats a moved filter as JSON.
pub fn format_moved_filter(result: &FilterMoveResult) -> Result<String, serde_json::Error> {
    let output = MovedFilterOutput {
        id: &result.id,
        from: result.from,
        to: result.to,
    };

    serde_json::to_string_pretty(&output)
}
