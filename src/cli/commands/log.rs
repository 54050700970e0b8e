use chrono::Local;
use colored::Colorize;

use crate::cli::commands::workspace::Workspace;
use crate::cli::output;
use crate::core::errors::Result;
use crate::core::models::log_entry::{LogEntry, LogFilter, Page};
use crate::core::traits::log_store::LogStore;

/// Execute the `gearlog log` command.
///
/// Lists audit entries newest first, optionally filtered by actor and
/// target id. `limit` defaults to `display.page_size`.
pub fn execute(
    actor: Option<&str>,
    target: Option<&str>,
    limit: Option<usize>,
    offset: usize,
) -> Result<()> {
    let ws = Workspace::open()?;
    let store = ws.recorder.store();

    let filter = LogFilter {
        actor_id: actor.map(str::to_string),
        target_id: target.map(str::to_string),
    };
    let limit = limit.unwrap_or(ws.config.display.page_size);
    let total = store.count(&filter)?;
    let entries = store.list(&filter, Page::new(Some(limit), offset))?;

    if entries.is_empty() {
        output::header("gearlog log");
        output::warning("No audit entries found");
        if actor.is_some() || target.is_some() || offset > 0 {
            println!("  Try removing filters to see all entries.");
        }
        return Ok(());
    }

    output::header(&format!(
        "gearlog log ({}-{} of {total})",
        offset + 1,
        offset + entries.len()
    ));
    println!();

    for entry in &entries {
        print_entry(entry);
    }

    if offset + entries.len() < total {
        println!();
        println!(
            "  {}",
            format!("More entries: --offset {}", offset + entries.len()).dimmed()
        );
    }

    Ok(())
}

/// Print a single audit entry as a formatted row.
fn print_entry(entry: &LogEntry) {
    let date = entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S");
    let actor = entry.actor_id.as_deref().unwrap_or("—");
    let target = format!("{} {}", entry.target_type, entry.target_id);
    let detail = describe(entry);

    println!(
        "  {} {} {:<14} {:<20} {:<12} {}",
        date.to_string().dimmed(),
        "│".dimmed(),
        output::action(entry.action),
        target,
        actor,
        detail.dimmed(),
    );
    println!("    {}", entry.id.dimmed());
}

/// Short summary of what an entry changed.
fn describe(entry: &LogEntry) -> String {
    let (Some(before), Some(after)) = (&entry.before, &entry.after) else {
        return String::new();
    };

    let mut fields: Vec<&str> = after
        .iter()
        .filter(|(k, v)| before.get(*k) != Some(*v))
        .map(|(k, _)| k.as_str())
        .chain(
            before
                .keys()
                .filter(|k| !after.contains_key(*k))
                .map(String::as_str),
        )
        .collect();
    fields.sort_unstable();
    fields.join(", ")
}
