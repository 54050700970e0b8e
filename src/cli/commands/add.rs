use crate::adapters::parsers::field_assignment::FieldAssignmentParser;
use crate::cli::commands::workspace::{Workspace, print_report};
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::target::TargetType;

/// Execute the `gearlog add` command.
pub fn execute(kind: TargetType, id: &str, set: &[String], actor: Option<&str>) -> Result<()> {
    validate_entity_id(id)?;
    let fields = FieldAssignmentParser::parse_all(set)?;

    let ws = Workspace::open()?;
    let report = ws.catalog().add(kind, id, &fields, ws.actor(actor))?;

    output::header(&format!("gearlog add {kind} {id}"));
    print_report(&report, &format!("Added {kind} '{id}'"));
    Ok(())
}
