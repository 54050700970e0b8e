use colored::Colorize;

use crate::cli::commands::workspace::Workspace;
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::record::stringify;
use crate::core::models::target::TargetType;

/// Execute the `gearlog show` command.
pub fn execute(kind: TargetType, id: &str) -> Result<()> {
    validate_entity_id(id)?;

    let ws = Workspace::open()?;
    let record = ws.catalog().show(kind, id)?;

    output::header(&format!("{kind} {id}"));
    if record.is_empty() {
        println!("  {}", "(no fields)".dimmed());
        return Ok(());
    }

    let width = record.keys().map(|k| k.len()).max().unwrap_or(0);
    for (field, value) in &record {
        println!("  {:<width$}   {}", field.bold(), stringify(value), width = width);
    }
    Ok(())
}
