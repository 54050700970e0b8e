use crate::adapters::parsers::field_assignment::FieldAssignmentParser;
use crate::cli::commands::workspace::{Workspace, display_value};
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::target::TargetType;

/// Execute the `gearlog bulk-edit` command.
///
/// Every id must exist before anything is written. Each changed entity
/// gets its own log entry so it can be restored on its own.
pub fn execute(kind: TargetType, ids: &[String], set: &[String], actor: Option<&str>) -> Result<()> {
    for id in ids {
        validate_entity_id(id)?;
    }
    let fields = FieldAssignmentParser::parse_all(set)?;

    let ws = Workspace::open()?;
    let reports = ws.catalog().bulk_edit(kind, ids, &fields, ws.actor(actor))?;

    output::header(&format!("gearlog bulk-edit {kind} ({} ids)", ids.len()));

    let mut changed = 0;
    for report in &reports {
        if !report.applied {
            println!("  {} unchanged", report.target_id);
            continue;
        }
        changed += 1;
        let summary: Vec<String> = report
            .changes
            .entries
            .iter()
            .map(|e| {
                format!(
                    "{}: {} → {}",
                    e.field,
                    display_value(&e.change.old),
                    display_value(&e.change.new)
                )
            })
            .collect();
        let logged = report
            .entry
            .as_ref()
            .map(|e| format!(" [{}]", e.id))
            .unwrap_or_default();
        println!("  {} {}{}", report.target_id, summary.join(", "), logged);
        if let Some(warning) = &report.audit_warning {
            output::warning(&format!("Could not write audit log: {warning}"));
        }
    }

    println!();
    output::success(&format!(
        "{changed} updated, {} unchanged",
        reports.len() - changed
    ));
    Ok(())
}
