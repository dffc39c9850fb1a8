//! Export and import commands.
//!
//! Export writes the filter document to a generated file name in the
//! current directory, a chosen path, or stdout. Import reads a document and
//! merges it into the stored set, or replaces the set with `--replace`.

use std::path::PathBuf;

use chrono::Local;
use mailfilter_core::codec::{export_document, export_file_name, import_document, ExportScope};
use mailfilter_core::{FilterRecord, FilterSetError, MergePolicy};

use super::{confirm_destructive, resolve_filter_id, CommandContext, ConfirmResult, Result};
use crate::output::{format_export_result, format_import_result};

// ============================================================================
// Export Command
// ============================================================================

/// Options for the export command.
#[derive(Debug, Default)]
pub struct FilterExportOptions {
    /// Export only this filter (id, prefix or name).
    pub id: Option<String>,
    /// Output file; defaults to a generated name.
    pub output: Option<PathBuf>,
    /// Write to stdout instead of a file.
    pub stdout: bool,
}

/// Result of a file export.
#[derive(Debug)]
pub struct ExportResult {
    /// Where the document was written.
    pub path: PathBuf,
    /// Number of filters exported.
    pub count: usize,
    /// Filters whose delete action was left out.
    pub delete_suppressed: usize,
}

/// Executes the export command.
///
/// # Errors
///
/// Returns an error if the store cannot be read or the file cannot be written.
pub async fn execute_export(ctx: &CommandContext, opts: &FilterExportOptions) -> Result<()> {
    let repo = ctx.repository()?;
    let filters = repo.load_filters().await?;
    let settings = repo.load_settings().await?;
    let options = settings.export_options();

    let selected: Vec<FilterRecord> = match &opts.id {
        Some(query) => {
            let id = resolve_filter_id(&filters, query)?;
            let record = filters
                .get(&id)
                .cloned()
                .ok_or(FilterSetError::NotFound(id))?;
            vec![record]
        }
        None => filters.into_records(),
    };

    let xml = export_document(&selected, &options);

    if opts.stdout {
        println!("{xml}");
        return Ok(());
    }

    let path = match &opts.output {
        Some(path) => path.clone(),
        None => {
            let scope = match (&opts.id, selected.first()) {
                (Some(_), Some(record)) => ExportScope::Single(&record.name),
                _ => ExportScope::All,
            };
            PathBuf::from(export_file_name(scope, &Local::now()))
        }
    };

    tokio::fs::write(&path, xml.as_bytes()).await?;

    let result = ExportResult {
        path,
        count: selected.len(),
        delete_suppressed: if options.delete_enabled {
            0
        } else {
            selected.iter().filter(|f| f.actions.delete).count()
        },
    };

    if ctx.json_output {
        let output = format_export_result(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        if result.delete_suppressed > 0 {
            eprintln!(
                "Note: delete action left out of {} filter(s); enable it with 'mf settings delete-action on'",
                result.delete_suppressed
            );
        }
        println!(
            "Exported {} filter(s) to {}",
            result.count,
            result.path.display()
        );
    }

    Ok(())
}

// ============================================================================
// Import Command
// ============================================================================

/// Options for the import command.
#[derive(Debug)]
pub struct FilterImportOptions {
    /// Document to read.
    pub path: PathBuf,
    /// How imported filters combine with the stored ones.
    pub policy: MergePolicy,
    /// Skip the confirmation before replacing.
    pub force: bool,
}

/// Result of an import.
#[derive(Debug)]
pub struct ImportResult {
    /// Document that was read.
    pub path: PathBuf,
    /// Filters found in the document.
    pub imported: usize,
    /// Filters in the set afterwards.
    pub total: usize,
    /// Whether the set was replaced.
    pub replaced: bool,
    /// Ids reassigned to keep the set unique.
    pub reassigned: usize,
}

/// Executes the import command.
///
/// A document without entries leaves the stored set untouched.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not well-formed XML, or
/// the store cannot be read or written.
pub async fn execute_import(ctx: &CommandContext, opts: &FilterImportOptions) -> Result<()> {
    let xml = tokio::fs::read_to_string(&opts.path).await?;

    let repo = ctx.repository()?;
    let mut filters = repo.load_filters().await?;

    let imported = import_document(&xml, &mut filters.id_allocator())?;
    if imported.is_empty() {
        if !ctx.quiet {
            eprintln!("No filters found in {}", opts.path.display());
        }
        return Ok(());
    }

    if opts.policy == MergePolicy::Replace && !filters.is_empty() {
        let prompt = format!(
            "Replace all {} filter(s) with {} imported?",
            filters.len(),
            imported.len()
        );
        if confirm_destructive(&prompt, opts.force)? == ConfirmResult::Aborted {
            if !ctx.quiet {
                eprintln!("Aborted.");
            }
            return Ok(());
        }
    }

    let count = imported.len();
    let reassigned = filters.merge_imported(imported, opts.policy);
    repo.save_filters(&mut filters).await?;

    let result = ImportResult {
        path: opts.path.clone(),
        imported: count,
        total: filters.len(),
        replaced: opts.policy == MergePolicy::Replace,
        reassigned: reassigned.len(),
    };

    if ctx.json_output {
        let output = format_import_result(&result)?;
        println!("{output}");
    } else if !ctx.quiet {
        let verb = if result.replaced { "Replaced with" } else { "Imported" };
        println!(
            "{} {} filter(s) from {} ({} total)",
            verb,
            result.imported,
            result.path.display(),
            result.total
        );
    }

    Ok(())
}
