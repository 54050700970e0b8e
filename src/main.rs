mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let args = Cli::parse();

    init_tracing(args.quiet, args.verbose);
    cli::context::init(args.dir.as_deref());

    let actor = args.actor.as_deref();

    let result = match &args.command {
        Commands::Init => cli::commands::init::execute(args.verbose),
        Commands::Add { kind, id, set } => cli::commands::add::execute(*kind, id, set, actor),
        Commands::Edit {
            kind,
            id,
            set,
            unset,
        } => cli::commands::edit::execute(*kind, id, set, unset, actor),
        Commands::Delete { kind, id } => cli::commands::delete::execute(*kind, id, actor),
        Commands::BulkEdit { kind, ids, set } => {
            cli::commands::bulk_edit::execute(*kind, ids, set, actor)
        }
        Commands::Import { kind, file, yes } => {
            cli::commands::import::execute(*kind, file, *yes, actor)
        }
        Commands::Loan { id, to, returned } => {
            let borrower = if *returned { None } else { to.as_deref() };
            cli::commands::loan::execute(id, borrower, actor)
        }
        Commands::Show { kind, id } => cli::commands::show::execute(*kind, id),
        Commands::Diff { kind, id, set } => cli::commands::diff::execute(*kind, id, set),
        Commands::Log {
            by,
            target,
            limit,
            offset,
        } => cli::commands::log::execute(by.as_deref(), target.as_deref(), *limit, *offset),
        Commands::Restore { log_id } => cli::commands::restore::execute(log_id, actor),
    };

    if let Err(e) = result {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so they never mix with command output.
/// `GEARLOG_LOG` overrides the level chosen by `-q`/`-v`.
fn init_tracing(quiet: bool, verbose: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GEARLOG_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
