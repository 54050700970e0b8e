use serde::Deserialize;
use std::path::Path;

use crate::core::errors::{GearlogError, Result};

/// Top-level gearlog configuration read from `.gearlog/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub gearlog: GearlogSection,
    pub audit: Option<AuditSection>,
    #[serde(default)]
    pub store: StoreSection,
    #[serde(default)]
    pub restore: RestoreSection,
    #[serde(default)]
    pub display: DisplaySection,
}

impl AppConfig {
    /// Load the configuration from `{gearlog_dir}/config.toml`.
    ///
    /// After parsing, validates the file names taken from the config so a
    /// tampered config cannot point the stores outside the workspace.
    pub fn load(gearlog_dir: &Path) -> Result<Self> {
        let config_path = gearlog_dir.join("config.toml");
        if !config_path.exists() {
            return Err(GearlogError::NotInitialized {
                path: gearlog_dir.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content).map_err(|e| GearlogError::InvalidConfig {
            detail: format!("Failed to parse config.toml: {e}"),
        })?;

        if config.gearlog.format_version > CURRENT_FORMAT_VERSION {
            return Err(GearlogError::FormatVersionTooNew {
                project_version: config.gearlog.format_version,
                supported_version: CURRENT_FORMAT_VERSION,
            });
        }

        if let Some(audit) = &config.audit {
            crate::cli::context::validate_simple_filename(&audit.log_file, "audit log file")?;
        }
        crate::cli::context::validate_simple_filename(&config.store.data_dir, "data directory")?;

        if config.display.page_size == 0 {
            return Err(GearlogError::InvalidConfig {
                detail: "display.page_size must be at least 1".into(),
            });
        }

        Ok(config)
    }
}

/// Current format version supported by this build of gearlog.
pub const CURRENT_FORMAT_VERSION: u32 = 1;

/// Default configuration written by `gearlog init`.
pub const DEFAULT_CONFIG: &str = r#"[gearlog]
version = "0.1.0"
format_version = 1

[audit]
enabled = true
log_file = "audit.log"

[store]
data_dir = "data"

[restore]
# Cached or computed fields that are never written into snapshots
# and never restored.
derived_fields = ["photo_urls"]

[display]
page_size = 20
"#;

/// The `[gearlog]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GearlogSection {
    pub version: String,
    /// Format version for backward compatibility. Defaults to 1 if missing.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    /// Actor recorded when none is given on the command line.
    pub default_actor: Option<String>,
}

fn default_format_version() -> u32 {
    1
}

/// The `[audit]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AuditSection {
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_audit_enabled() -> bool {
    true
}

fn default_log_file() -> String {
    "audit.log".to_string()
}

/// The `[store]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

fn default_data_dir() -> String {
    "data".to_string()
}

/// The `[restore]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RestoreSection {
    #[serde(default = "default_derived_fields")]
    pub derived_fields: Vec<String>,
}

impl Default for RestoreSection {
    fn default() -> Self {
        Self {
            derived_fields: default_derived_fields(),
        }
    }
}

fn default_derived_fields() -> Vec<String> {
    vec!["photo_urls".to_string()]
}

/// The `[display]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySection {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    20
}
