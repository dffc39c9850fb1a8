//! Command implementations for the mf CLI.
//!
//! This module contains the actual command handlers that are invoked by the CLI.

pub mod completions;
pub mod config;
pub mod filters;
pub mod query;
pub mod settings;
pub mod transfer;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use dialoguer::Confirm;
use mailfilter_core::{FilterRecord, FilterRepository, FilterSet, JsonFileStore};
use strsim::levenshtein;

use crate::cli::Cli;
use config::Config;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Filter storage error.
    #[error("store error: {0}")]
    Store(#[from] mailfilter_core::StoreError),

    /// Filter document error.
    #[error("document error: {0}")]
    Codec(#[from] mailfilter_core::CodecError),

    /// Filter set editing error.
    #[error("filter error: {0}")]
    FilterSet(#[from] mailfilter_core::FilterSetError),

    /// No filter matched the given id, prefix or name.
    #[error("{}", format_not_found_error(query, suggestion.as_deref()))]
    NotFound {
        /// The id, prefix or name that was searched for.
        query: String,
        /// Optional suggestion for a similar filter name.
        suggestion: Option<String>,
    },

    /// An id prefix matched more than one filter.
    #[error("'{query}' matches {count} filters; use a longer id prefix")]
    Ambiguous {
        /// The prefix that was searched for.
        query: String,
        /// How many filters matched.
        count: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Formats the "not found" error message, optionally including a suggestion.
fn format_not_found_error(query: &str, suggestion: Option<&str>) -> String {
    let base = format!("Filter '{}' not found. Run 'mf list' to see all filters.", query);
    match suggestion {
        Some(s) => format!("{} Did you mean '{}'?", base, s),
        None => base,
    }
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// Whether to output JSON.
    pub json_output: bool,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
    /// Whether to be verbose.
    pub verbose: bool,
    /// Store file override; `None` means the default data directory.
    pub store_path: Option<PathBuf>,
}

impl CommandContext {
    /// Creates a new command context from CLI arguments and the loaded config.
    ///
    /// Flags win over the config file.
    pub fn from_cli(cli: &Cli, config: &Config) -> Self {
        Self {
            json_output: cli.json,
            use_colors: !cli.no_color && config.output.color.unwrap_or(true),
            quiet: cli.quiet,
            verbose: cli.verbose,
            store_path: cli.store.clone().or_else(|| config.store.path.clone()),
        }
    }

    /// Opens the filter repository this invocation works on.
    pub fn repository(&self) -> Result<FilterRepository<JsonFileStore>> {
        let store = match &self.store_path {
            Some(path) => JsonFileStore::with_path(path.clone()),
            None => JsonFileStore::new()?,
        };
        if self.verbose {
            eprintln!("Using store {}", store.path().display());
        }
        Ok(FilterRepository::new(store))
    }
}

/// Resolves a filter by exact id, unique id prefix, or name.
///
/// Returns the full id of the match.
pub fn resolve_filter_id(filters: &FilterSet, query: &str) -> Result<String> {
    if let Some(filter) = filters.get(query) {
        return Ok(filter.id.clone());
    }

    let by_prefix: Vec<&FilterRecord> = filters
        .iter()
        .filter(|f| !query.is_empty() && f.id.starts_with(query))
        .collect();
    match by_prefix.as_slice() {
        [only] => return Ok(only.id.clone()),
        [] => {}
        many => {
            return Err(CommandError::Ambiguous {
                query: query.to_string(),
                count: many.len(),
            })
        }
    }

    let query_lower = query.to_lowercase();
    if let Some(filter) = filters
        .iter()
        .find(|f| !f.name.is_empty() && f.name.to_lowercase() == query_lower)
    {
        return Ok(filter.id.clone());
    }

    Err(CommandError::NotFound {
        query: query.to_string(),
        suggestion: find_similar_name(query, filters.iter().map(|f| f.name.as_str())),
    })
}

/// Finds the best matching name from a list of candidates using Levenshtein distance.
///
/// Returns the best match if its edit distance is within the threshold,
/// otherwise returns `None`.
fn find_similar_name<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<String> {
    let query_lower = query.to_lowercase();

    let (best_match, best_distance) = candidates
        .filter(|name| !name.is_empty())
        .map(|name| {
            let distance = levenshtein(&query_lower, &name.to_lowercase());
            (name.to_string(), distance)
        })
        .min_by_key(|(_, d)| *d)?;

    if best_distance > 0 && best_distance <= MAX_SUGGESTION_DISTANCE {
        Some(best_match)
    } else {
        None
    }
}

/// Result of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmResult {
    /// The user confirmed, or no prompt was needed.
    Confirmed,
    /// The user declined.
    Aborted,
}

/// Asks before a destructive operation.
///
/// No prompt is shown when `force` is set or stdin is not a terminal.
pub fn confirm_destructive(prompt: &str, force: bool) -> Result<ConfirmResult> {
    if force || !io::stdin().is_terminal() {
        return Ok(ConfirmResult::Confirmed);
    }

    let confirmed = Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()
        .map_err(|e| CommandError::Io(io::Error::other(e.to_string())))?;

    Ok(if confirmed {
        ConfirmResult::Confirmed
    } else {
        ConfirmResult::Aborted
    })
}
