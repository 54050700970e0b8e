use crate::adapters::parsers::field_assignment::FieldAssignmentParser;
use crate::cli::commands::workspace::{Workspace, print_report};
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::{GearlogError, Result};
use crate::core::models::target::TargetType;

/// Execute the `gearlog edit` command.
///
/// Only fields whose value actually changes are written and logged.
pub fn execute(
    kind: TargetType,
    id: &str,
    set: &[String],
    unset: &[String],
    actor: Option<&str>,
) -> Result<()> {
    validate_entity_id(id)?;
    if set.is_empty() && unset.is_empty() {
        return Err(GearlogError::InvalidMutation {
            detail: "nothing to change, pass --set field=value or --unset field".into(),
        });
    }
    let fields = FieldAssignmentParser::parse_all(set)?;

    let ws = Workspace::open()?;
    let report = ws
        .catalog()
        .edit(kind, id, &fields, unset, ws.actor(actor))?;

    output::header(&format!("gearlog edit {kind} {id}"));
    print_report(
        &report,
        &format!("Updated {} field(s) on {kind} '{id}'", report.changes.len()),
    );
    Ok(())
}
