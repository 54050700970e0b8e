use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::record::Snapshot;
use super::target::TargetType;

/// Mutation kinds recorded in the audit log.
///
/// The set is closed: the restore engine has an explicit rule for every
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Add,
    Edit,
    Delete,
    Import,
    BulkEdit,
    Loan,
    Restore,
    RestoreDelete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Add => "add",
            AuditAction::Edit => "edit",
            AuditAction::Delete => "delete",
            AuditAction::Import => "import",
            AuditAction::BulkEdit => "bulk_edit",
            AuditAction::Loan => "loan",
            AuditAction::Restore => "restore",
            AuditAction::RestoreDelete => "restore_delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single immutable entry in the audit log (JSON lines format).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: String,
    #[serde(default)]
    pub actor_id: Option<String>,
    pub action: AuditAction,
    /// Kept as written so that entries with an unknown kind can still be
    /// listed and rejected by restore instead of failing to load.
    pub target_type: String,
    #[serde(default)]
    pub target_id: String,
    /// `None` means "not captured"; `Some` of an empty map is a captured
    /// empty state.
    #[serde(default)]
    pub before: Option<Snapshot>,
    #[serde(default)]
    pub after: Option<Snapshot>,
    #[serde(default)]
    pub details: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// The entity kind this entry targets, if it is a known one.
    pub fn target_kind(&self) -> Option<TargetType> {
        self.target_type.parse().ok()
    }
}

/// Optional filters for log queries. Empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LogFilter {
    pub actor_id: Option<String>,
    pub target_id: Option<String>,
}

impl LogFilter {
    pub fn matches(&self, entry: &LogEntry) -> bool {
        if let Some(actor) = &self.actor_id
            && entry.actor_id.as_deref() != Some(actor.as_str())
        {
            return false;
        }
        if let Some(target) = &self.target_id
            && entry.target_id != *target
        {
            return false;
        }
        true
    }
}

/// Window over an ordered result set.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: usize,
}

impl Page {
    pub fn new(limit: Option<usize>, offset: usize) -> Self {
        Self { limit, offset }
    }
}
