//! Export, import, query and settings output formatting.

use mailfilter_core::AppSettings;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::commands::query::QueryResult;
use crate::commands::transfer::{ExportResult, ImportResult};

use super::helpers::format_flag;

/// JSON output structure for an export.
#[derive(Serialize)]
pub struct ExportOutput {
    pub path: String,
    pub count: usize,
    pub delete_suppressed: usize,
}

/// Formats an export result as JSON.
pub fn format_export_result(result: &ExportResult) -> Result<String, serde_json::Error> {
    let output = ExportOutput {
        path: result.path.display().to_string(),
        count: result.count,
        delete_suppressed: result.delete_suppressed,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for an import.
#[derive(Serialize)]
pub struct ImportOutput {
    pub path: String,
    pub imported: usize,
    pub total: usize,
    pub policy: &'static str,
    pub reassigned_ids: usize,
}

/// Formats an import result as JSON.
pub fn format_import_result(result: &ImportResult) -> Result<String, serde_json::Error> {
    let output = ImportOutput {
        path: result.path.display().to_string(),
        imported: result.imported,
        total: result.total,
        policy: if result.replaced { "replace" } else { "merge" },
        reassigned_ids: result.reassigned,
    };

    serde_json::to_string_pretty(&output)
}

/// JSON output structure for a parsed query.
#[derive(Serialize)]
pub struct QueryOutput<'a> {
    pub input: &'a str,
    pub outcome: &'static str,
    pub groups: &'a [Vec<String>],
    pub canonical: Option<&'a str>,
}

/// Formats a parsed query as JSON.
pub fn format_query_json(result: &QueryResult) -> Result<String, serde_json::Error> {
    let output = QueryOutput {
        input: &result.input,
        outcome: if result.literal { "literal" } else { "structured" },
        groups: &result.groups,
        canonical: result.canonical.as_deref(),
    };

    serde_json::to_string_pretty(&output)
}

/// Formats a parsed query for humans.
pub fn format_query_table(result: &QueryResult, use_colors: bool) -> String {
    let mut output = String::new();

    let outcome = if result.literal {
        let text = "literal (kept as a single term)";
        if use_colors {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    } else {
        "structured".to_string()
    };
    output.push_str(&format!("Parsed: {}\n", outcome));

    if result.groups.is_empty() {
        output.push_str("Groups: (none)\n");
    } else {
        output.push_str("Groups:\n");
        for (index, group) in result.groups.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", index + 1, group.join(" AND ")));
        }
    }

    let canonical = result.canonical.as_deref().unwrap_or("(empty)");
    let label = if use_colors {
        "Canonical:".bold().to_string()
    } else {
        "Canonical:".to_string()
    };
    output.push_str(&format!("{} {}\n", label, canonical));

    output
}

/// JSON output structure for settings.
#[derive(Serialize)]
pub struct SettingsOutput<'a> {
    pub delete_action_enabled: bool,
    pub last_updated: String,
    pub settings: &'a AppSettings,
}

/// Formats settings as JSON.
pub fn format_settings_json(settings: &AppSettings) -> Result<String, serde_json::Error> {
    let output = SettingsOutput {
        delete_action_enabled: settings.enable_delete_action,
        last_updated: settings.last_updated.to_rfc3339(),
        settings,
    };

    serde_json::to_string_pretty(&output)
}

/// Formats settings for humans.
pub fn format_settings_table(settings: &AppSettings, use_colors: bool) -> String {
    let header = if use_colors {
        "Settings".green().bold().to_string()
    } else {
        "Settings".to_string()
    };

    format!(
        "{}\n\nDelete action exported: {}\nLast updated: {}\n",
        header,
        format_flag(settings.enable_delete_action, use_colors),
        settings
            .last_updated
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M:%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::query::analyze;
    use chrono::{DateTime, Utc};
    use std::path::PathBuf;

    #[test]
    fn test_format_query_table_structured() {
        let output = format_query_table(&analyze("(a AND b) OR c"), false);
        assert_eq!(
            output,
            "Parsed: structured\nGroups:\n  1. a AND b\n  2. c\nCanonical: (a AND b) OR c\n"
        );
    }

    #[test]
    fn test_format_query_table_empty() {
        let output = format_query_table(&analyze(""), false);
        assert!(output.contains("Groups: (none)\n"));
        assert!(output.contains("Canonical: (empty)\n"));
    }

    #[test]
    fn test_format_query_json_literal() {
        let json = format_query_json(&analyze("(a")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"], "literal");
        assert_eq!(value["groups"][0][0], "(a");
    }

    #[test]
    fn test_format_import_result_policy() {
        let result = ImportResult {
            path: PathBuf::from("in.xml"),
            imported: 2,
            total: 5,
            replaced: false,
            reassigned: 0,
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_import_result(&result).unwrap()).unwrap();
        assert_eq!(value["policy"], "merge");
        assert_eq!(value["total"], 5);
    }

    #[test]
    fn test_format_settings_json() {
        let settings = AppSettings {
            enable_delete_action: true,
            last_updated: DateTime::<Utc>::UNIX_EPOCH,
        };
        let value: serde_json::Value =
            serde_json::from_str(&format_settings_json(&settings).unwrap()).unwrap();

        assert_eq!(value["delete_action_enabled"], true);
        assert_eq!(value["settings"]["enableDeleteAction"], true);
        assert_eq!(value["last_updated"], "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_format_settings_table_plain() {
        let output = format_settings_table(&AppSettings::default(), false);
        assert!(output.starts_with("Settings\n\n"));
        assert!(output.contains("Delete action exported: no\n"));
    }
}
