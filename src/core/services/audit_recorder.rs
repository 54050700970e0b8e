use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

use crate::core::errors::{GearlogError, Result};
use crate::core::models::log_entry::{AuditAction, LogEntry};
use crate::core::models::record::Snapshot;
use crate::core::models::target::TargetType;
use crate::core::traits::log_store::LogStore;

/// A mutation to be written to the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub actor_id: Option<String>,
    pub action: AuditAction,
    pub target_type: TargetType,
    pub target_id: String,
    pub before: Option<Snapshot>,
    pub after: Option<Snapshot>,
    pub details: Option<Value>,
}

impl Mutation {
    pub fn new(action: AuditAction, target_type: TargetType, target_id: impl Into<String>) -> Self {
        Self {
            actor_id: None,
            action,
            target_type,
            target_id: target_id.into(),
            before: None,
            after: None,
            details: None,
        }
    }

    pub fn actor(mut self, actor_id: Option<&str>) -> Self {
        self.actor_id = actor_id.map(String::from);
        self
    }

    pub fn before(mut self, snapshot: Snapshot) -> Self {
        self.before = Some(snapshot);
        self
    }

    pub fn after(mut self, snapshot: Snapshot) -> Self {
        self.after = Some(snapshot);
        self
    }

    pub fn details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// The audit write path: turns a `Mutation` into a persisted `LogEntry`.
///
/// The recorder never reads entity state; whatever `before`/`after` the
/// caller hands over is what gets stored.
pub struct AuditRecorder<L: LogStore> {
    store: L,
    last_timestamp: Mutex<Option<DateTime<Utc>>>,
}

impl<L: LogStore> AuditRecorder<L> {
    pub fn new(store: L) -> Self {
        Self {
            store,
            last_timestamp: Mutex::new(None),
        }
    }

    /// The underlying log store, for queries.
    pub fn store(&self) -> &L {
        &self.store
    }

    /// Append one entry for `mutation` with a fresh id and timestamp.
    ///
    /// Store failures propagate; nothing the caller already changed is
    /// rolled back.
    pub fn record(&self, mutation: Mutation) -> Result<LogEntry> {
        if mutation.target_id.trim().is_empty() {
            return Err(GearlogError::InvalidMutation {
                detail: format!("'{}' entry requires a target id", mutation.action),
            });
        }
        if mutation.action == AuditAction::Add && mutation.before.is_some() {
            return Err(GearlogError::InvalidMutation {
                detail: "'add' entries never carry a before snapshot".into(),
            });
        }

        let entry = LogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            actor_id: mutation.actor_id,
            action: mutation.action,
            target_type: mutation.target_type.as_str().to_string(),
            target_id: mutation.target_id,
            before: mutation.before,
            after: mutation.after,
            details: mutation.details,
            timestamp: self.next_timestamp()?,
        };

        self.store.append(&entry)?;
        tracing::info!(
            id = %entry.id,
            action = %entry.action,
            target_type = %entry.target_type,
            target_id = %entry.target_id,
            actor = entry.actor_id.as_deref().unwrap_or("-"),
            "recorded mutation"
        );
        Ok(entry)
    }

    /// Wall-clock time, nudged forward so that successive writes through
    /// this recorder never share or reverse a timestamp.
    fn next_timestamp(&self) -> Result<DateTime<Utc>> {
        let mut last = self
            .last_timestamp
            .lock()
            .map_err(|_| GearlogError::AuditError {
                detail: "audit clock lock poisoned".into(),
            })?;

        let now = Utc::now();
        let ts = match *last {
            Some(prev) if now <= prev => prev + Duration::microseconds(1),
            _ => now,
        };
        *last = Some(ts);
        Ok(ts)
    }
}
