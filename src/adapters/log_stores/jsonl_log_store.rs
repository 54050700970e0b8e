use std::cmp::Reverse;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use crate::config::app_config::AuditSection;
use crate::core::errors::{GearlogError, Result};
use crate::core::models::log_entry::{LogEntry, LogFilter, Page};
use crate::core::traits::log_store::LogStore;

/// Log store that appends entries as JSON lines to a file.
///
/// Each line in the log file is a self-contained JSON object representing
/// one `LogEntry`. Line position is the insertion order, used to break
/// timestamp ties.
pub struct JsonlLogStore {
    log_path: PathBuf,
}

impl JsonlLogStore {
    /// Create a store that writes to `{gearlog_dir}/{log_file}`.
    pub fn new(gearlog_dir: &Path, log_file: &str) -> Self {
        Self {
            log_path: gearlog_dir.join(log_file),
        }
    }

    /// Create a store from the `[audit]` section, falling back to
    /// defaults if the section is missing.
    pub fn from_config(gearlog_dir: &Path, audit_section: Option<&AuditSection>) -> Self {
        let log_file = audit_section
            .map(|a| a.log_file.as_str())
            .unwrap_or("audit.log");
        Self::new(gearlog_dir, log_file)
    }

    /// Check whether auditing is enabled in the configuration.
    /// Returns `true` when the section is absent (enabled by default).
    pub fn is_enabled(audit_section: Option<&AuditSection>) -> bool {
        audit_section.map(|a| a.enabled).unwrap_or(true)
    }

    /// Read every entry in insertion order.
    fn read_all(&self) -> Result<Vec<LogEntry>> {
        if !self.log_path.exists() {
            return Ok(Vec::new());
        }

        let file = fs::File::open(&self.log_path).map_err(|e| GearlogError::AuditError {
            detail: format!("Cannot read audit log: {e}"),
        })?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| GearlogError::AuditError {
                detail: format!("Error reading audit log line {}: {e}", line_num + 1),
            })?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let entry: LogEntry =
                serde_json::from_str(trimmed).map_err(|e| GearlogError::AuditError {
                    detail: format!("Malformed audit entry at line {}: {e}", line_num + 1),
                })?;
            entries.push(entry);
        }

        Ok(entries)
    }
}

impl LogStore for JsonlLogStore {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut line = serde_json::to_string(entry).map_err(|e| GearlogError::AuditError {
            detail: format!("Failed to serialize audit entry: {e}"),
        })?;
        line.push('\n');

        if let Some(parent) = self.log_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| GearlogError::AuditError {
                detail: format!("Cannot open audit log at {}: {e}", self.log_path.display()),
            })?;

        // One write per line keeps concurrent appenders from interleaving.
        file.write_all(line.as_bytes())
            .map_err(|e| GearlogError::AuditError {
                detail: format!("Failed to write audit entry: {e}"),
            })?;

        tracing::debug!(id = %entry.id, action = %entry.action, "appended audit entry");
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<LogEntry>> {
        Ok(self.read_all()?.into_iter().find(|e| e.id == id))
    }

    fn list(&self, filter: &LogFilter, page: Page) -> Result<Vec<LogEntry>> {
        let mut matching: Vec<(usize, LogEntry)> = self
            .read_all()?
            .into_iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .collect();

        matching.sort_by_key(|(seq, e)| (Reverse(e.timestamp), Reverse(*seq)));

        let window = matching.into_iter().skip(page.offset).map(|(_, e)| e);
        Ok(match page.limit {
            Some(limit) => window.take(limit).collect(),
            None => window.collect(),
        })
    }

    fn count(&self, filter: &LogFilter) -> Result<usize> {
        Ok(self.read_all()?.iter().filter(|e| filter.matches(e)).count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::log_entry::AuditAction;
    use chrono::{Duration, TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_entry(id: &str, actor: &str, target: &str) -> LogEntry {
        LogEntry {
            id: id.to_string(),
            actor_id: Some(actor.to_string()),
            action: AuditAction::Edit,
            target_type: "equipment".to_string(),
            target_id: target.to_string(),
            before: None,
            after: None,
            details: None,
            timestamp: Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    fn at(entry: LogEntry, minutes: i64) -> LogEntry {
        LogEntry {
            timestamp: entry.timestamp + Duration::minutes(minutes),
            ..entry
        }
    }

    #[test]
    fn append_and_get_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        store.append(&sample_entry("a", "alice", "E1")).unwrap();

        let found = store.get("a").unwrap().unwrap();
        assert_eq!(found.actor_id.as_deref(), Some("alice"));
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        store.append(&at(sample_entry("mid", "a", "E1"), 5)).unwrap();
        store.append(&at(sample_entry("old", "a", "E1"), 0)).unwrap();
        store.append(&at(sample_entry("new", "a", "E1"), 10)).unwrap();

        let ids: Vec<_> = store
            .list(&LogFilter::default(), Page::default())
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn timestamp_ties_follow_reverse_insertion() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        store.append(&sample_entry("first", "a", "E1")).unwrap();
        store.append(&sample_entry("second", "a", "E1")).unwrap();
        store.append(&sample_entry("third", "a", "E1")).unwrap();

        let ids: Vec<_> = store
            .list(&LogFilter::default(), Page::default())
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["third", "second", "first"]);
    }

    #[test]
    fn sequential_pages_do_not_overlap() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        for i in 0..7 {
            store
                .append(&at(sample_entry(&format!("e{i}"), "a", "E1"), i % 3))
                .unwrap();
        }

        let filter = LogFilter::default();
        let first = store.list(&filter, Page::new(Some(4), 0)).unwrap();
        let second = store.list(&filter, Page::new(Some(4), 4)).unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 3);
        for e in &second {
            assert!(first.iter().all(|f| f.id != e.id));
        }
    }

    #[test]
    fn filter_by_actor_and_target() {
        let tmp = TempDir::new().unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        store.append(&sample_entry("a1", "alice", "E1")).unwrap();
        store.append(&sample_entry("b1", "bob", "E1")).unwrap();
        store.append(&sample_entry("a2", "alice", "E2")).unwrap();

        let by_alice = LogFilter {
            actor_id: Some("alice".into()),
            target_id: None,
        };
        assert_eq!(store.count(&by_alice).unwrap(), 2);

        let by_target = LogFilter {
            actor_id: None,
            target_id: Some("E1".into()),
        };
        let results = store.list(&by_target, Page::default()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|e| e.target_id == "E1"));
    }

    #[test]
    fn query_nonexistent_file_returns_empty() {
        let store = JsonlLogStore::new(Path::new("/nonexistent"), "audit.log");

        assert!(store.list(&LogFilter::default(), Page::default()).unwrap().is_empty());
        assert_eq!(store.count(&LogFilter::default()).unwrap(), 0);
    }

    #[test]
    fn malformed_line_is_a_storage_fault() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("audit.log"), "{not json}\n").unwrap();
        let store = JsonlLogStore::new(tmp.path(), "audit.log");

        let err = store.get("x").unwrap_err();
        assert!(matches!(err, GearlogError::AuditError { .. }));
    }

    #[test]
    fn is_enabled_defaults_to_true() {
        assert!(JsonlLogStore::is_enabled(None));
    }

    #[test]
    fn is_enabled_respects_config() {
        let disabled = AuditSection {
            enabled: false,
            log_file: "audit.log".to_string(),
        };
        assert!(!JsonlLogStore::is_enabled(Some(&disabled)));
    }
}
