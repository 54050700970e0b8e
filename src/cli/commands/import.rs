use std::path::Path;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use crate::adapters::parsers::json_import_parser::JsonImportParser;
use crate::cli::commands::diff::print_diff_table;
use crate::cli::commands::workspace::Workspace;
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::{GearlogError, Result};
use crate::core::models::import_row::{ImportChange, ImportChangeKind};
use crate::core::models::target::TargetType;
use crate::core::traits::import_parser::ImportParser;

/// Execute the `gearlog import` command.
///
/// Without `--yes` this only previews: new ids and changed fields are
/// listed and nothing is written. With `--yes` each previewed row is
/// applied and logged on its own.
pub fn execute(kind: TargetType, file: &str, apply: bool, actor: Option<&str>) -> Result<()> {
    let path = Path::new(file);
    if !path.exists() {
        return Err(GearlogError::ImportError {
            file: path.to_path_buf(),
            detail: "file not found".into(),
        });
    }

    let parser = JsonImportParser;
    check_extension(&parser, path)?;
    let content = std::fs::read_to_string(path)?;
    let rows = parser.parse(&content, path)?;
    for row in &rows {
        validate_entity_id(&row.id)?;
    }

    let ws = Workspace::open()?;
    let catalog = ws.catalog();
    let changes = catalog.preview_import(kind, &rows)?;

    output::header(&format!("gearlog import {kind} {file}"));
    println!("  {} row(s) read, {} would change\n", rows.len(), changes.len());

    if changes.is_empty() {
        output::success("Catalog already matches the import");
        return Ok(());
    }

    print_preview(&changes);

    if !apply {
        println!();
        output::warning("Preview only, nothing written. Re-run with --yes to apply.");
        return Ok(());
    }

    let actor = ws.actor(actor);
    let bar = ProgressBar::new(changes.len() as u64);
    bar.set_style(
        ProgressStyle::with_template("  {bar:30.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut applied = 0;
    let mut warnings = Vec::new();
    for change in &changes {
        bar.set_message(change.id.clone());
        let report = catalog.apply_import_change(kind, change, actor)?;
        if report.applied {
            applied += 1;
        }
        if let Some(warning) = report.audit_warning {
            warnings.push(format!("{}: {warning}", change.id));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    for warning in &warnings {
        output::warning(&format!("Could not write audit log for {warning}"));
    }
    println!();
    output::success(&format!("Imported {applied} {kind} row(s)"));
    Ok(())
}

fn check_extension(parser: &impl ImportParser, path: &Path) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    if parser.supported_extensions().contains(&ext.as_str()) {
        return Ok(());
    }
    Err(GearlogError::ImportError {
        file: path.to_path_buf(),
        detail: format!(
            "unsupported file type, expected one of: {}",
            parser.supported_extensions().join(", ")
        ),
    })
}

fn print_preview(changes: &[ImportChange]) {
    for change in changes {
        match &change.kind {
            ImportChangeKind::New => {
                println!(
                    "  {} {} ({} field(s))",
                    "+".green(),
                    change.id.green(),
                    change.incoming.len()
                );
            }
            ImportChangeKind::Changed(diff) => {
                println!("  {} {}", "~".yellow(), change.id.yellow());
                print_diff_table(diff);
            }
        }
    }
}
