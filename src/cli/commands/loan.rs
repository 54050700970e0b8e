use crate::cli::commands::workspace::{Workspace, print_report};
use crate::cli::context::validate_entity_id;
use crate::cli::output;
use crate::core::errors::{GearlogError, Result};

/// Execute the `gearlog loan` command.
///
/// `borrower` of `None` marks the equipment as returned.
pub fn execute(id: &str, borrower: Option<&str>, actor: Option<&str>) -> Result<()> {
    validate_entity_id(id)?;
    if borrower.is_some_and(|b| b.trim().is_empty()) {
        return Err(GearlogError::InvalidMutation {
            detail: "borrower name cannot be empty, use --return to mark as returned".into(),
        });
    }

    let ws = Workspace::open()?;
    let report = ws.catalog().loan(id, borrower, ws.actor(actor))?;

    output::header(&format!("gearlog loan {id}"));
    let done = match borrower {
        Some(name) => format!("Lent equipment '{id}' to {name}"),
        None => format!("Equipment '{id}' returned"),
    };
    print_report(&report, &done);
    Ok(())
}
