use colored::Colorize;

use crate::adapters::parsers::field_assignment::FieldAssignmentParser;
use crate::cli::commands::workspace::Workspace;
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::diff_result::DiffResult;
use crate::core::models::target::TargetType;

/// Execute the `gearlog diff` command.
///
/// Shows which fields an edit with the same `--set` values would change,
/// without writing anything.
pub fn execute(kind: TargetType, id: &str, set: &[String]) -> Result<()> {
    validate_entity_id(id)?;
    let fields = FieldAssignmentParser::parse_all(set)?;

    let ws = Workspace::open()?;
    let result = ws.catalog().preview_edit(kind, id, &fields)?;

    output::header(&format!("gearlog diff {kind} {id}"));

    if result.is_empty() {
        output::success("No differences found");
        return Ok(());
    }

    print_diff_table(&result);
    println!();
    output::success(&format!("{} field(s) would change", result.len()));

    Ok(())
}

/// Print the changes as a three-column table. Also used by `import`.
pub fn print_diff_table(result: &DiffResult) {
    let field_width = result
        .entries
        .iter()
        .map(|e| e.field.chars().count())
        .max()
        .unwrap_or(8)
        .max(8);

    let header = format!(
        "  {:<width$}   {:<20}   {}",
        "Field",
        "Current",
        "New",
        width = field_width
    );
    println!("{}", header.bold());
    println!("  {}", "─".repeat(header.chars().count().saturating_sub(2)));

    for entry in &result.entries {
        let old = if entry.change.old.is_empty() {
            "—".dimmed().to_string()
        } else {
            output::truncate(&entry.change.old, 20)
        };
        let new = if entry.change.new.is_empty() {
            "(cleared)".red().to_string()
        } else {
            output::truncate(&entry.change.new, 20).yellow().to_string()
        };
        println!(
            "  {:<width$}   {:<20}   {}",
            entry.field.yellow(),
            old,
            new,
            width = field_width
        );
    }
}
