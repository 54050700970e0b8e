use crate::cli::commands::workspace::{Workspace, print_report};
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::target::TargetType;

/// Execute the `gearlog delete` command.
pub fn execute(kind: TargetType, id: &str, actor: Option<&str>) -> Result<()> {
    validate_entity_id(id)?;

    let ws = Workspace::open()?;
    let report = ws.catalog().delete(kind, id, ws.actor(actor))?;

    output::header(&format!("gearlog delete {kind} {id}"));
    print_report(&report, &format!("Deleted {kind} '{id}'"));
    output::warning("Deletes are not captured in full and cannot be restored");
    Ok(())
}
