use std::path::PathBuf;

/// All domain errors for gearlog.
///
/// Each variant provides enough context to diagnose the issue
/// without needing a debugger. Expected restore failures are not
/// errors: they travel as `Rejection` values inside a `RestoreOutcome`.
#[derive(Debug, thiserror::Error)]
pub enum GearlogError {
    #[error(
        "gearlog is not initialized in {path}\n\n  \
         Run 'gearlog init' to create the workspace."
    )]
    NotInitialized { path: PathBuf },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error(
        "This workspace uses format version {project_version}, but this build \
         only supports up to version {supported_version}.\n\n  \
         Update gearlog before touching this workspace."
    )]
    FormatVersionTooNew {
        project_version: u32,
        supported_version: u32,
    },

    #[error(
        "Unknown entity kind '{value}'\n\n  \
         Valid kinds: equipment, defect"
    )]
    UnknownTargetType { value: String },

    #[error(
        "Invalid identifier '{id}'\n\n  \
         Identifiers start with a letter or digit and may contain\n  \
         letters, digits, '-', '_' and '.'."
    )]
    InvalidEntityId { id: String },

    #[error(
        "Invalid field assignment '{spec}'\n\n  \
         Expected format: field=value (e.g. --set color=green)"
    )]
    InvalidFieldSpec { spec: String },

    #[error("{kind} '{id}' not found")]
    EntityNotFound { kind: String, id: String },

    #[error(
        "{kind} '{id}' already exists\n\n  \
         Use 'gearlog edit {kind} {id}' to change it."
    )]
    EntityAlreadyExists { kind: String, id: String },

    #[error("Invalid mutation: {detail}")]
    InvalidMutation { detail: String },

    #[error(
        "Import failed for {file}: {detail}\n\n  \
         Expected a JSON array of objects, each with an \"id\" field."
    )]
    ImportError { file: PathBuf, detail: String },

    #[error("Audit log error: {detail}")]
    AuditError { detail: String },

    #[error("Entity store error: {detail}")]
    StoreError { detail: String },

    /// Raised by the CLI when a restore outcome is a rejection, so the
    /// process exits non-zero.
    #[error("Restore rejected: {reason}")]
    RestoreRejected { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GearlogError>;
