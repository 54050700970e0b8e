use std::collections::HashSet;

use serde_json::{Value, json};

use crate::core::errors::{GearlogError, Result};
use crate::core::models::diff_result::{DiffEntry, DiffResult, FieldChange};
use crate::core::models::import_row::{ImportChange, ImportChangeKind, ImportRow};
use crate::core::models::log_entry::{AuditAction, LogEntry};
use crate::core::models::record::{IDENTITY_FIELD, Record, strip_fields, stringify};
use crate::core::models::target::TargetType;
use crate::core::services::audit_recorder::{AuditRecorder, Mutation};
use crate::core::services::diff_service::DiffService;
use crate::core::traits::entity_store::EntityStore;
use crate::core::traits::log_store::LogStore;

/// Field set by `loan` on equipment records.
pub const LOAN_FIELD: &str = "loaned_to";

/// What a catalog mutation did.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationReport {
    pub target_type: TargetType,
    pub target_id: String,
    /// False when the request changed nothing and was skipped.
    pub applied: bool,
    pub changes: DiffResult,
    /// The audit entry, when auditing is on and the write succeeded.
    pub entry: Option<LogEntry>,
    /// Set when the mutation stands but recording it failed.
    pub audit_warning: Option<String>,
}

/// Mutating operations on the catalog, each captured in the audit log.
///
/// This is the caller side of the audit write path: it reads the current
/// record before overwriting it so that every entry carries a usable
/// `before` snapshot. Deletes deliberately record none.
pub struct CatalogService<'a, L: LogStore, E: EntityStore> {
    recorder: Option<&'a AuditRecorder<L>>,
    entities: &'a E,
    derived_fields: &'a [String],
}

impl<'a, L: LogStore, E: EntityStore> CatalogService<'a, L, E> {
    /// `recorder` is `None` when auditing is disabled.
    pub fn new(
        recorder: Option<&'a AuditRecorder<L>>,
        entities: &'a E,
        derived_fields: &'a [String],
    ) -> Self {
        Self {
            recorder,
            entities,
            derived_fields,
        }
    }

    /// Current record for `id`.
    pub fn show(&self, kind: TargetType, id: &str) -> Result<Record> {
        self.entities
            .get(kind, id)?
            .ok_or_else(|| not_found(kind, id))
    }

    /// Changes `set` would make to `id`, without writing anything.
    pub fn preview_edit(&self, kind: TargetType, id: &str, set: &Record) -> Result<DiffResult> {
        let current = self.show(kind, id)?;
        Ok(DiffService.diff(Some(&current), &without_identity(set)))
    }

    /// Create a new entity.
    pub fn add(
        &self,
        kind: TargetType,
        id: &str,
        fields: &Record,
        actor: Option<&str>,
    ) -> Result<MutationReport> {
        if self.entities.get(kind, id)?.is_some() {
            return Err(GearlogError::EntityAlreadyExists {
                kind: kind.to_string(),
                id: id.to_string(),
            });
        }

        let record = without_identity(fields);
        let changes = DiffService.diff(None, &record);
        self.entities.put(kind, id, &record)?;

        let mutation = Mutation::new(AuditAction::Add, kind, id)
            .actor(actor)
            .after(self.snapshot(&record));
        Ok(self.applied(kind, id, changes, mutation))
    }

    /// Set and remove fields on an existing entity.
    ///
    /// Only fields whose value actually changes are written; if nothing
    /// changes, nothing is written or recorded.
    pub fn edit(
        &self,
        kind: TargetType,
        id: &str,
        set: &Record,
        unset: &[String],
        actor: Option<&str>,
    ) -> Result<MutationReport> {
        let current = self.show(kind, id)?;
        let mut changes = DiffService.diff(Some(&current), &without_identity(set));

        for field in unset {
            if let Some(old) = current.get(field)
                && changes.get(field).is_none()
            {
                changes.entries.push(DiffEntry {
                    field: field.clone(),
                    change: FieldChange {
                        old: stringify(old).trim().to_string(),
                        new: String::new(),
                    },
                });
            }
        }
        changes.entries.sort_by(|a, b| a.field.cmp(&b.field));

        if changes.is_empty() {
            tracing::debug!(kind = %kind, id, "edit changes nothing, skipping");
            return Ok(self.skipped(kind, id));
        }

        let mut updated = current.clone();
        for field in changes.fields() {
            match set.get(field) {
                Some(value) if !unset.iter().any(|u| u == field) => {
                    updated.insert(field.to_string(), value.clone());
                }
                _ => {
                    updated.remove(field);
                }
            }
        }
        self.entities.put(kind, id, &updated)?;

        let mutation = Mutation::new(AuditAction::Edit, kind, id)
            .actor(actor)
            .before(self.snapshot(&current))
            .after(self.snapshot(&updated));
        Ok(self.applied(kind, id, changes, mutation))
    }

    /// Remove an entity. No `before` snapshot is captured, so the entry
    /// cannot be restored.
    pub fn delete(&self, kind: TargetType, id: &str, actor: Option<&str>) -> Result<MutationReport> {
        if !self.entities.delete(kind, id)? {
            return Err(not_found(kind, id));
        }

        let mutation = Mutation::new(AuditAction::Delete, kind, id).actor(actor);
        Ok(self.applied(kind, id, DiffResult::default(), mutation))
    }

    /// Apply the same fields to many entities.
    ///
    /// All ids are checked before anything is written. A repeated id is
    /// handled once, at its first position. Entities the fields would not
    /// change are reported as skipped.
    pub fn bulk_edit(
        &self,
        kind: TargetType,
        ids: &[String],
        fields: &Record,
        actor: Option<&str>,
    ) -> Result<Vec<MutationReport>> {
        let fields = without_identity(fields);
        let mut seen = HashSet::with_capacity(ids.len());
        let mut targets = Vec::with_capacity(ids.len());
        for id in ids.iter().filter(|id| seen.insert(id.as_str())) {
            targets.push((id, self.show(kind, id)?));
        }

        let mut reports = Vec::with_capacity(targets.len());
        for (id, current) in targets {
            let changes = DiffService.diff(Some(&current), &fields);
            if changes.is_empty() {
                reports.push(self.skipped(kind, id));
                continue;
            }

            let updated = merge_changed(&current, &fields, &changes);
            self.entities.put(kind, id, &updated)?;

            let mutation = Mutation::new(AuditAction::BulkEdit, kind, id.as_str())
                .actor(actor)
                .before(self.snapshot(&current))
                .after(self.snapshot(&updated))
                .details(json!({ "fields": changes.fields() }));
            reports.push(self.applied(kind, id, changes, mutation));
        }
        Ok(reports)
    }

    /// Rows of an import that would change the catalog.
    pub fn preview_import(&self, kind: TargetType, rows: &[ImportRow]) -> Result<Vec<ImportChange>> {
        let current = self.entities.list(kind)?;
        Ok(DiffService.preview_import(&current, rows))
    }

    /// Apply one reviewed import row.
    ///
    /// New rows are recorded as `add`; rows for existing entities merge
    /// their changed fields and are recorded as `import`. The change set
    /// is recomputed against the current record, so a row that no longer
    /// changes anything is skipped.
    pub fn apply_import_change(
        &self,
        kind: TargetType,
        change: &ImportChange,
        actor: Option<&str>,
    ) -> Result<MutationReport> {
        let id = change.id.as_str();
        let incoming = without_identity(&change.incoming);

        let Some(current) = self.entities.get(kind, id)? else {
            let changes = DiffService.diff(None, &incoming);
            self.entities.put(kind, id, &incoming)?;
            let mutation = Mutation::new(AuditAction::Add, kind, id)
                .actor(actor)
                .after(self.snapshot(&incoming))
                .details(json!({ "source": "import" }));
            return Ok(self.applied(kind, id, changes, mutation));
        };

        if change.kind == ImportChangeKind::New {
            tracing::debug!(kind = %kind, id, "import row became an update since preview");
        }

        let changes = DiffService.diff(Some(&current), &incoming);
        if changes.is_empty() {
            return Ok(self.skipped(kind, id));
        }

        let updated = merge_changed(&current, &incoming, &changes);
        self.entities.put(kind, id, &updated)?;

        let mutation = Mutation::new(AuditAction::Import, kind, id)
            .actor(actor)
            .before(self.snapshot(&current))
            .after(self.snapshot(&updated))
            .details(json!({ "fields": changes.fields() }));
        Ok(self.applied(kind, id, changes, mutation))
    }

    /// Lend equipment to `borrower`, or mark it returned with `None`.
    pub fn loan(&self, id: &str, borrower: Option<&str>, actor: Option<&str>) -> Result<MutationReport> {
        let kind = TargetType::Equipment;
        let current = self.show(kind, id)?;

        let mut updated = current.clone();
        match borrower {
            Some(name) => {
                updated.insert(LOAN_FIELD.to_string(), Value::String(name.to_string()));
            }
            None => {
                updated.remove(LOAN_FIELD);
            }
        }

        let mut proposed = Record::new();
        proposed.insert(
            LOAN_FIELD.to_string(),
            Value::String(borrower.unwrap_or_default().to_string()),
        );
        let changes = DiffService.diff(Some(&current), &proposed);
        if changes.is_empty() {
            return Ok(self.skipped(kind, id));
        }

        self.entities.put(kind, id, &updated)?;

        let mutation = Mutation::new(AuditAction::Loan, kind, id)
            .actor(actor)
            .before(self.snapshot(&current))
            .after(self.snapshot(&updated))
            .details(json!({ "borrower": borrower }));
        Ok(self.applied(kind, id, changes, mutation))
    }

    fn snapshot(&self, record: &Record) -> Record {
        strip_fields(record, self.derived_fields)
    }

    fn skipped(&self, kind: TargetType, id: &str) -> MutationReport {
        MutationReport {
            target_type: kind,
            target_id: id.to_string(),
            applied: false,
            changes: DiffResult::default(),
            entry: None,
            audit_warning: None,
        }
    }

    /// Record a mutation that has already been applied. A failed audit
    /// write is reported on the result; the mutation is kept.
    fn applied(
        &self,
        kind: TargetType,
        id: &str,
        changes: DiffResult,
        mutation: Mutation,
    ) -> MutationReport {
        let (entry, audit_warning) = match self.recorder.map(|r| r.record(mutation)) {
            None => (None, None),
            Some(Ok(entry)) => (Some(entry), None),
            Some(Err(e)) => {
                tracing::warn!(kind = %kind, id, error = %e, "mutation applied but not audited");
                (None, Some(e.to_string()))
            }
        };

        MutationReport {
            target_type: kind,
            target_id: id.to_string(),
            applied: true,
            changes,
            entry,
            audit_warning,
        }
    }
}

fn not_found(kind: TargetType, id: &str) -> GearlogError {
    GearlogError::EntityNotFound {
        kind: kind.to_string(),
        id: id.to_string(),
    }
}

fn without_identity(record: &Record) -> Record {
    let mut r = record.clone();
    r.remove(IDENTITY_FIELD);
    r
}

/// `current` with the changed fields taken from `fields`.
fn merge_changed(current: &Record, fields: &Record, changes: &DiffResult) -> Record {
    let mut merged = current.clone();
    for field in changes.fields() {
        if let Some(value) = fields.get(field) {
            merged.insert(field.to_string(), value.clone());
        }
    }
    merged
}
