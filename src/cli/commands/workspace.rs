use std::path::Path;

use crate::adapters::entity_stores::json_entity_store::JsonEntityStore;
use crate::adapters::log_stores::jsonl_log_store::JsonlLogStore;
use crate::cli::output;
use crate::config::app_config::AppConfig;
use crate::core::errors::Result;
use crate::core::services::audit_recorder::AuditRecorder;
use crate::core::services::catalog_service::{CatalogService, MutationReport};
use crate::core::services::restore_engine::RestoreEngine;

/// An opened workspace: configuration plus the stores it points at.
pub struct Workspace {
    pub config: AppConfig,
    pub recorder: AuditRecorder<JsonlLogStore>,
    pub entities: JsonEntityStore,
    audit_enabled: bool,
}

impl Workspace {
    /// Open the workspace at the configured directory.
    pub fn open() -> Result<Self> {
        Self::open_at(crate::cli::context::gearlog_dir())
    }

    pub fn open_at(gearlog_dir: &Path) -> Result<Self> {
        let config = AppConfig::load(gearlog_dir)?;
        let audit_section = config.audit.as_ref();
        let audit_enabled = JsonlLogStore::is_enabled(audit_section);
        let recorder = AuditRecorder::new(JsonlLogStore::from_config(gearlog_dir, audit_section));
        let entities = JsonEntityStore::new(gearlog_dir.join(&config.store.data_dir));

        tracing::debug!(
            dir = %gearlog_dir.display(),
            audit_enabled,
            "opened workspace"
        );

        Ok(Self {
            config,
            recorder,
            entities,
            audit_enabled,
        })
    }

    /// Catalog operations. Mutations are not recorded when auditing is
    /// disabled in the config.
    pub fn catalog(&self) -> CatalogService<'_, JsonlLogStore, JsonEntityStore> {
        let recorder = self.audit_enabled.then_some(&self.recorder);
        CatalogService::new(recorder, &self.entities, &self.config.restore.derived_fields)
    }

    pub fn restore_engine(&self) -> RestoreEngine<'_, JsonlLogStore, JsonEntityStore> {
        RestoreEngine::new(
            &self.recorder,
            &self.entities,
            &self.config.restore.derived_fields,
        )
    }

    /// The actor to record: the `--actor` flag (or `GEARLOG_ACTOR`), then
    /// `gearlog.default_actor` from the config.
    pub fn actor<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.config.gearlog.default_actor.as_deref())
            .filter(|a| !a.trim().is_empty())
    }
}

/// Print the outcome of a single mutation.
pub fn print_report(report: &MutationReport, done: &str) {
    if !report.applied {
        output::warning(&format!(
            "{} '{}' already matches, nothing to change",
            report.target_type, report.target_id
        ));
        return;
    }

    output::success(done);
    for entry in &report.changes.entries {
        println!(
            "    {}: {} → {}",
            entry.field,
            display_value(&entry.change.old),
            display_value(&entry.change.new)
        );
    }
    if let Some(entry) = &report.entry {
        println!("    Logged as {}", entry.id);
    }
    if let Some(warning) = &report.audit_warning {
        output::warning(&format!("Could not write audit log: {warning}"));
    }
}

/// Render an empty value as a dash.
pub fn display_value(value: &str) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        output::truncate(value, 40)
    }
}
