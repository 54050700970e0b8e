use std::path::{Path, PathBuf};
use std::sync::{LazyLock, OnceLock};

use regex::Regex;

use crate::core::errors::{GearlogError, Result};

static GEARLOG_DIR: OnceLock<PathBuf> = OnceLock::new();

static ENTITY_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]*$").expect("static regex is valid"));

/// Initialize the global workspace directory path.
/// If `custom` is provided, uses that path; otherwise defaults to `.gearlog`.
pub fn init(custom: Option<&str>) {
    let dir = custom
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".gearlog"));
    let _ = GEARLOG_DIR.set(dir);
}

/// Get the current workspace directory path.
pub fn gearlog_dir() -> &'static Path {
    GEARLOG_DIR
        .get()
        .map(|p| p.as_path())
        .unwrap_or(Path::new(".gearlog"))
}

/// Check that an entity id is safe to store and show.
pub fn validate_entity_id(id: &str) -> Result<()> {
    if ENTITY_ID.is_match(id) {
        Ok(())
    } else {
        Err(GearlogError::InvalidEntityId { id: id.to_string() })
    }
}

/// Reject names read from config that could escape the workspace:
/// path separators, parent references and empty strings.
pub fn validate_simple_filename(name: &str, what: &str) -> Result<()> {
    let invalid = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0');

    if invalid {
        return Err(GearlogError::InvalidConfig {
            detail: format!("{what} must be a plain name inside the workspace, got '{name}'"),
        });
    }
    Ok(())
}
