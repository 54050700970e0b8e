use crate::cli::commands::workspace::Workspace;
use crate::cli::output;
use crate::core::errors::{GearlogError, Result};
use crate::core::models::restore_outcome::RestoreOutcome;

/// Execute the `gearlog restore` command.
///
/// A rejected restore leaves the catalog and log untouched and exits
/// with a non-zero status.
pub fn execute(log_id: &str, actor: Option<&str>) -> Result<()> {
    let ws = Workspace::open()?;
    let outcome = ws.restore_engine().restore(log_id.trim(), ws.actor(actor))?;

    let logged_as = match &outcome {
        RestoreOutcome::Restored { entry, .. } => Some(entry.id.clone()),
        RestoreOutcome::Rejected(rejection) => {
            tracing::info!(log_id, kind = ?rejection.kind(), "restore rejected");
            None
        }
    };

    let (success, message) = outcome.into_parts();
    if !success {
        return Err(GearlogError::RestoreRejected { reason: message });
    }

    output::header("gearlog restore");
    output::success(&message);
    if let Some(id) = logged_as {
        println!("    Logged as {id}");
    }
    Ok(())
}
