pub mod commands;
pub mod context;
pub mod output;

use clap::{Parser, Subcommand};

use crate::core::models::target::TargetType;

/// Track outdoor gear and defects. Every change is logged and can be undone.
#[derive(Parser, Debug)]
#[command(name = "gearlog", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Who is making the change, recorded in the audit log
    #[arg(long, global = true, env = "GEARLOG_ACTOR")]
    pub actor: Option<String>,

    /// Path to the workspace directory (default: .gearlog)
    #[arg(long, global = true)]
    pub dir: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: only show errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a gearlog workspace in the current directory
    Init,

    /// Add a new equipment item or defect
    Add {
        /// Entity kind: equipment or defect
        kind: TargetType,
        /// Identifier of the new entity
        id: String,
        /// Field assignment, repeatable: --set name="Tent A"
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },

    /// Change fields on an existing entity
    Edit {
        kind: TargetType,
        id: String,
        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Field to remove, repeatable
        #[arg(long = "unset", value_name = "FIELD")]
        unset: Vec<String>,
    },

    /// Delete an entity (deletes cannot be restored)
    Delete { kind: TargetType, id: String },

    /// Apply the same fields to several entities
    BulkEdit {
        kind: TargetType,
        /// Identifiers of the entities to change
        #[arg(required = true)]
        ids: Vec<String>,
        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Preview or apply a JSON import
    Import {
        kind: TargetType,
        /// JSON file with an array of objects, each with an "id"
        file: String,
        /// Apply the previewed changes
        #[arg(long)]
        yes: bool,
    },

    /// Lend equipment or mark it returned
    Loan {
        /// Equipment identifier
        id: String,
        /// Borrower name
        #[arg(long, conflicts_with = "returned", required_unless_present = "returned")]
        to: Option<String>,
        /// Mark the equipment as returned
        #[arg(long = "return")]
        returned: bool,
    },

    /// Show an entity
    Show { kind: TargetType, id: String },

    /// Preview what an edit would change, without writing
    Diff {
        kind: TargetType,
        id: String,
        /// Field assignment, repeatable
        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        set: Vec<String>,
    },

    /// Show change history, newest first
    Log {
        /// Only entries by this actor
        #[arg(long = "by", value_name = "ACTOR")]
        by: Option<String>,
        /// Only entries for this entity id
        #[arg(long)]
        target: Option<String>,
        /// Maximum entries to show (default: display.page_size)
        #[arg(long)]
        limit: Option<usize>,
        /// Entries to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Undo the change recorded by a log entry
    Restore {
        /// Log entry id
        log_id: String,
    },
}
