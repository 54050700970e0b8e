use serde_json::json;

use crate::core::errors::Result;
use crate::core::models::log_entry::{AuditAction, LogEntry};
use crate::core::models::record::strip_fields;
use crate::core::models::restore_outcome::{Rejection, RestoreOutcome};
use crate::core::models::target::TargetType;
use crate::core::services::audit_recorder::{AuditRecorder, Mutation};
use crate::core::traits::entity_store::EntityStore;
use crate::core::traits::log_store::LogStore;

/// Undoes a single recorded mutation against the live entity store.
///
/// | action                              | undo                          |
/// |-------------------------------------|-------------------------------|
/// | `add`                               | delete the entity             |
/// | `edit` `bulk_edit` `import` `restore` | full replace with `before`  |
/// | `delete`                            | rejected, nothing captured    |
/// | `loan` `restore_delete`             | rejected, not restorable      |
///
/// Every restoration is itself recorded, so restores chain. Reading the
/// current state and overwriting it are separate store calls; an edit
/// landing in between is overwritten.
pub struct RestoreEngine<'a, L: LogStore, E: EntityStore> {
    recorder: &'a AuditRecorder<L>,
    entities: &'a E,
    derived_fields: &'a [String],
}

impl<'a, L: LogStore, E: EntityStore> RestoreEngine<'a, L, E> {
    pub fn new(recorder: &'a AuditRecorder<L>, entities: &'a E, derived_fields: &'a [String]) -> Self {
        Self {
            recorder,
            entities,
            derived_fields,
        }
    }

    /// Undo the mutation recorded as `log_id` on behalf of `actor_id`.
    ///
    /// Expected failures come back as `RestoreOutcome::Rejected` with
    /// both stores untouched; only storage faults are `Err`.
    pub fn restore(&self, log_id: &str, actor_id: Option<&str>) -> Result<RestoreOutcome> {
        let Some(entry) = self.recorder.store().get(log_id)? else {
            return Ok(reject(Rejection::LogNotFound {
                log_id: log_id.to_string(),
            }));
        };

        let Some(kind) = entry.target_kind() else {
            return Ok(reject(Rejection::InvalidTargetType {
                log_id: entry.id.clone(),
                target_type: entry.target_type.clone(),
            }));
        };

        if entry.target_id.trim().is_empty() {
            return Ok(reject(Rejection::MissingTargetId {
                log_id: entry.id.clone(),
            }));
        }

        tracing::debug!(log_id, action = %entry.action, kind = %kind, target = %entry.target_id, "restoring");

        match entry.action {
            AuditAction::Add => self.undo_add(&entry, kind, actor_id),
            AuditAction::Edit
            | AuditAction::BulkEdit
            | AuditAction::Import
            | AuditAction::Restore => self.restore_before(&entry, kind, actor_id),
            AuditAction::Delete => Ok(reject(Rejection::NothingToRestore {
                log_id: entry.id.clone(),
                action: entry.action,
            })),
            AuditAction::Loan | AuditAction::RestoreDelete => {
                Ok(reject(Rejection::NotRestorable {
                    action: entry.action,
                }))
            }
        }
    }

    fn undo_add(
        &self,
        entry: &LogEntry,
        kind: TargetType,
        actor_id: Option<&str>,
    ) -> Result<RestoreOutcome> {
        let Some(current) = self.entities.get(kind, &entry.target_id)? else {
            return Ok(reject(Rejection::TargetGone {
                target_type: kind,
                target_id: entry.target_id.clone(),
            }));
        };

        self.entities.delete(kind, &entry.target_id)?;

        let logged = self.recorder.record(
            Mutation::new(AuditAction::RestoreDelete, kind, entry.target_id.clone())
                .actor(actor_id)
                .before(strip_fields(&current, self.derived_fields))
                .details(json!({ "restored_from_log_id": entry.id })),
        )?;

        tracing::info!(log_id = %entry.id, kind = %kind, target = %entry.target_id, "undid add");
        Ok(RestoreOutcome::Restored {
            message: format!(
                "Removed {kind} '{}' (undo of add {})",
                entry.target_id, entry.id
            ),
            entry: logged,
        })
    }

    fn restore_before(
        &self,
        entry: &LogEntry,
        kind: TargetType,
        actor_id: Option<&str>,
    ) -> Result<RestoreOutcome> {
        let snapshot = entry
            .before
            .as_ref()
            .map(|before| strip_fields(before, self.derived_fields))
            .unwrap_or_default();
        if snapshot.is_empty() {
            return Ok(reject(Rejection::NothingToRestore {
                log_id: entry.id.clone(),
                action: entry.action,
            }));
        }

        let Some(current) = self.entities.get(kind, &entry.target_id)? else {
            return Ok(reject(Rejection::TargetNotFound {
                target_type: kind,
                target_id: entry.target_id.clone(),
            }));
        };

        self.entities.put(kind, &entry.target_id, &snapshot)?;

        let logged = self.recorder.record(
            Mutation::new(AuditAction::Restore, kind, entry.target_id.clone())
                .actor(actor_id)
                .before(strip_fields(&current, self.derived_fields))
                .after(snapshot)
                .details(json!({ "restored_from_log_id": entry.id })),
        )?;

        tracing::info!(log_id = %entry.id, kind = %kind, target = %entry.target_id, "restored prior state");
        Ok(RestoreOutcome::Restored {
            message: format!(
                "Restored {kind} '{}' to its state before {} {}",
                entry.target_id, entry.action, entry.id
            ),
            entry: logged,
        })
    }
}

fn reject(rejection: Rejection) -> RestoreOutcome {
    tracing::debug!(reason = %rejection, "restore rejected");
    RestoreOutcome::Rejected(rejection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::entity_stores::json_entity_store::JsonEntityStore;
    use crate::adapters::log_stores::jsonl_log_store::JsonlLogStore;
    use crate::core::errors::GearlogError;
    use crate::core::models::log_entry::{LogFilter, Page};
    use crate::core::models::record::{Record, Snapshot};
    use crate::core::models::restore_outcome::RejectionKind;
    use proptest::prelude::*;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        recorder: AuditRecorder<JsonlLogStore>,
        entities: JsonEntityStore,
        derived: Vec<String>,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let recorder = AuditRecorder::new(JsonlLogStore::new(tmp.path(), "audit.log"));
            let entities = JsonEntityStore::new(tmp.path().join("data"));
            Self {
                _tmp: tmp,
                recorder,
                entities,
                derived: vec!["photo_urls".to_string()],
            }
        }

        fn engine(&self) -> RestoreEngine<'_, JsonlLogStore, JsonEntityStore> {
            RestoreEngine::new(&self.recorder, &self.entities, &self.derived)
        }

        fn log_count(&self) -> usize {
            self.recorder.store().count(&LogFilter::default()).unwrap()
        }

        fn entity(&self, id: &str) -> Option<Record> {
            self.entities.get(TargetType::Equipment, id).unwrap()
        }

        /// Create `id` with `state` and record the add.
        fn add(&self, id: &str, state: &Record) -> LogEntry {
            self.entities.put(TargetType::Equipment, id, state).unwrap();
            self.recorder
                .record(
                    Mutation::new(AuditAction::Add, TargetType::Equipment, id)
                        .after(state.clone()),
                )
                .unwrap()
        }

        /// Overwrite `id` with `state` and record the edit.
        fn edit(&self, id: &str, state: &Record) -> LogEntry {
            let before = self.entity(id).unwrap();
            self.entities.put(TargetType::Equipment, id, state).unwrap();
            self.recorder
                .record(
                    Mutation::new(AuditAction::Edit, TargetType::Equipment, id)
                        .actor(Some("alice"))
                        .before(before)
                        .after(state.clone()),
                )
                .unwrap()
        }

        fn record(&self, mutation: Mutation) -> LogEntry {
            self.recorder.record(mutation).unwrap()
        }
    }

    fn tent(color: &str) -> Record {
        let mut r = Record::new();
        r.insert("name".into(), json!("Tent A"));
        r.insert("color".into(), json!(color));
        r
    }

    fn restored_entry(outcome: RestoreOutcome) -> LogEntry {
        match outcome {
            RestoreOutcome::Restored { entry, .. } => entry,
            RestoreOutcome::Rejected(r) => panic!("expected success, got rejection: {r}"),
        }
    }

    fn rejection(outcome: RestoreOutcome) -> Rejection {
        match outcome {
            RestoreOutcome::Rejected(r) => r,
            RestoreOutcome::Restored { message, .. } => panic!("expected rejection, got: {message}"),
        }
    }

    #[test]
    fn tent_scenario_restores_previous_color() {
        let fx = Fixture::new();
        let l1 = fx.add("E1", &tent("green"));
        assert_eq!(l1.before, None);
        let l2 = fx.edit("E1", &tent("blue"));
        assert_eq!(l2.before, Some(tent("green")));

        let outcome = fx.engine().restore(&l2.id, Some("quartermaster")).unwrap();
        assert!(outcome.is_success());
        assert!(outcome.message().contains("equipment 'E1'"));

        let l3 = restored_entry(outcome);
        assert_eq!(fx.entity("E1"), Some(tent("green")));
        assert_eq!(l3.action, AuditAction::Restore);
        assert_eq!(l3.actor_id.as_deref(), Some("quartermaster"));
        assert_eq!(l3.before, Some(tent("blue")));
        assert_eq!(l3.after, Some(tent("green")));
        assert_eq!(l3.details, Some(json!({ "restored_from_log_id": l2.id })));
    }

    #[test]
    fn restore_is_full_replace_not_merge() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let mut s1 = tent("blue");
        s1.insert("notes".into(), json!("new seam"));
        let edit = fx.edit("E1", &s1);

        restored_entry(fx.engine().restore(&edit.id, None).unwrap());

        let now = fx.entity("E1").unwrap();
        assert_eq!(now, tent("green"));
        assert!(!now.contains_key("notes"));
    }

    #[test]
    fn undo_add_deletes_then_reports_gone() {
        let fx = Fixture::new();
        let add = fx.add("E1", &tent("green"));

        let first = fx.engine().restore(&add.id, Some("alice")).unwrap();
        let logged = restored_entry(first);
        assert_eq!(fx.entity("E1"), None);
        assert_eq!(logged.action, AuditAction::RestoreDelete);
        assert_eq!(logged.details, Some(json!({ "restored_from_log_id": add.id })));
        assert_eq!(logged.before, Some(tent("green")));

        let count = fx.log_count();
        let second = rejection(fx.engine().restore(&add.id, Some("alice")).unwrap());
        assert!(matches!(second, Rejection::TargetGone { .. }));
        assert_eq!(second.kind(), RejectionKind::NotFound);
        assert_eq!(fx.log_count(), count);
    }

    #[test]
    fn chained_restores_return_to_first_restore_after() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let edit = fx.edit("E1", &tent("blue"));

        let first = restored_entry(fx.engine().restore(&edit.id, None).unwrap());
        assert_eq!(fx.entity("E1"), Some(tent("green")));

        let second = restored_entry(fx.engine().restore(&first.id, None).unwrap());
        assert_eq!(second.action, AuditAction::Restore);
        assert_eq!(second.before, Some(tent("green")));
        assert_eq!(fx.entity("E1"), Some(tent("blue")));

        let third = restored_entry(fx.engine().restore(&second.id, None).unwrap());
        assert_eq!(fx.entity("E1"), first.after);
        assert_eq!(third.after, first.after);
    }

    #[test]
    fn restoring_same_entry_twice_writes_two_entries() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let edit = fx.edit("E1", &tent("blue"));

        let a = restored_entry(fx.engine().restore(&edit.id, None).unwrap());
        let b = restored_entry(fx.engine().restore(&edit.id, None).unwrap());

        assert_ne!(a.id, b.id);
        assert_eq!(fx.entity("E1"), Some(tent("green")));
        assert_eq!(b.before, Some(tent("green")));
        assert_eq!(fx.log_count(), 4);
    }

    #[test]
    fn non_restorable_kinds_are_rejected_without_side_effects() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let entries = [
            fx.record(Mutation::new(AuditAction::Delete, TargetType::Equipment, "E1")),
            fx.record(
                Mutation::new(AuditAction::Loan, TargetType::Equipment, "E1")
                    .before(tent("red"))
                    .after(tent("green")),
            ),
            fx.record(
                Mutation::new(AuditAction::RestoreDelete, TargetType::Equipment, "E1")
                    .before(tent("red")),
            ),
        ];
        let count = fx.log_count();

        for entry in &entries {
            let outcome = fx.engine().restore(&entry.id, Some("alice")).unwrap();
            assert!(!outcome.is_success());
            assert!(!outcome.message().is_empty());
            assert_eq!(rejection(outcome).kind(), RejectionKind::InvalidState);
        }

        assert_eq!(fx.entity("E1"), Some(tent("green")));
        assert_eq!(fx.log_count(), count);
    }

    #[test]
    fn delete_entry_has_nothing_to_restore() {
        let fx = Fixture::new();
        let del = fx.record(Mutation::new(AuditAction::Delete, TargetType::Equipment, "E1"));

        let r = rejection(fx.engine().restore(&del.id, None).unwrap());
        assert!(matches!(r, Rejection::NothingToRestore { action: AuditAction::Delete, .. }));
    }

    #[test]
    fn unknown_log_id_is_not_found() {
        let fx = Fixture::new();

        let r = rejection(fx.engine().restore("no-such-entry", None).unwrap());
        assert!(matches!(r, Rejection::LogNotFound { .. }));
        assert_eq!(fx.log_count(), 0);
    }

    #[test]
    fn missing_or_empty_before_has_nothing_to_restore() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let no_before = fx.record(Mutation::new(AuditAction::Import, TargetType::Equipment, "E1"));
        let empty_before = fx.record(
            Mutation::new(AuditAction::BulkEdit, TargetType::Equipment, "E1")
                .before(Snapshot::new()),
        );

        for entry in [no_before, empty_before] {
            let r = rejection(fx.engine().restore(&entry.id, None).unwrap());
            assert!(matches!(r, Rejection::NothingToRestore { .. }));
        }
        assert_eq!(fx.entity("E1"), Some(tent("green")));
    }

    #[test]
    fn deleted_target_is_not_resurrected() {
        let fx = Fixture::new();
        fx.add("E1", &tent("green"));
        let edit = fx.edit("E1", &tent("blue"));
        fx.entities.delete(TargetType::Equipment, "E1").unwrap();

        let r = rejection(fx.engine().restore(&edit.id, None).unwrap());
        assert!(matches!(r, Rejection::TargetNotFound { .. }));
        assert_eq!(fx.entity("E1"), None);
    }

    #[test]
    fn identity_and_derived_fields_are_stripped() {
        let fx = Fixture::new();
        fx.add("E1", &tent("blue"));
        let mut polluted = tent("green");
        polluted.insert("id".into(), json!("E1"));
        polluted.insert("photo_urls".into(), json!(["https://cdn/x.jpg"]));
        let edit = fx.record(
            Mutation::new(AuditAction::Edit, TargetType::Equipment, "E1").before(polluted),
        );

        let logged = restored_entry(fx.engine().restore(&edit.id, None).unwrap());

        assert_eq!(fx.entity("E1"), Some(tent("green")));
        assert_eq!(logged.after, Some(tent("green")));
    }

    #[test]
    fn invalid_target_type_is_rejected() {
        let fx = Fixture::new();
        let mut legacy = fx.record(
            Mutation::new(AuditAction::Edit, TargetType::Equipment, "E1").before(tent("green")),
        );
        legacy.id = "legacy-1".into();
        legacy.target_type = "sprzet".into();
        fx.recorder.store().append(&legacy).unwrap();

        let r = rejection(fx.engine().restore("legacy-1", None).unwrap());
        assert!(matches!(r, Rejection::InvalidTargetType { .. }));
    }

    #[test]
    fn restore_of_defect_uses_defect_collection() {
        let fx = Fixture::new();
        let mut open = Record::new();
        open.insert("status".into(), json!("open"));
        let mut closed = Record::new();
        closed.insert("status".into(), json!("closed"));

        fx.entities.put(TargetType::Defect, "D1", &closed).unwrap();
        let edit = fx.record(
            Mutation::new(AuditAction::Edit, TargetType::Defect, "D1")
                .before(open.clone())
                .after(closed),
        );

        let outcome = fx.engine().restore(&edit.id, None).unwrap();
        assert!(outcome.message().contains("defect 'D1'"));
        assert_eq!(fx.entities.get(TargetType::Defect, "D1").unwrap(), Some(open));
        assert_eq!(fx.entity("D1"), None);
    }

    /// Log store whose reads always fail.
    struct BrokenLogStore;

    impl LogStore for BrokenLogStore {
        fn append(&self, _entry: &LogEntry) -> Result<()> {
            Err(GearlogError::AuditError {
                detail: "unreachable".into(),
            })
        }
        fn get(&self, _id: &str) -> Result<Option<LogEntry>> {
            Err(GearlogError::AuditError {
                detail: "unreachable".into(),
            })
        }
        fn list(&self, _filter: &LogFilter, _page: Page) -> Result<Vec<LogEntry>> {
            Ok(Vec::new())
        }
        fn count(&self, _filter: &LogFilter) -> Result<usize> {
            Ok(0)
        }
    }

    #[test]
    fn storage_faults_propagate() {
        let tmp = TempDir::new().unwrap();
        let recorder = AuditRecorder::new(BrokenLogStore);
        let entities = JsonEntityStore::new(tmp.path().join("data"));
        let engine = RestoreEngine::new(&recorder, &entities, &[]);

        let err = engine.restore("anything", None).unwrap_err();
        assert!(matches!(err, GearlogError::AuditError { .. }));
    }

    fn state_strategy() -> impl Strategy<Value = Record> {
        prop::collection::btree_map("[a-e]{1,3}", "[a-z0-9 ]{0,6}".prop_map(Value::String), 1..6)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn edit_then_restore_yields_exact_prior_state(
            s0 in state_strategy(),
            s1 in state_strategy(),
        ) {
            let fx = Fixture::new();
            fx.add("E1", &s0);
            let edit = fx.edit("E1", &s1);

            let outcome = fx.engine().restore(&edit.id, None).unwrap();
            prop_assert!(outcome.is_success());
            prop_assert_eq!(fx.entity("E1"), Some(s0));
        }

        #[test]
        fn listing_stays_newest_first_across_restores(
            states in prop::collection::vec(state_strategy(), 2..5),
        ) {
            let fx = Fixture::new();
            fx.add("E1", &states[0]);
            let mut edits = BTreeMap::new();
            for (i, s) in states.iter().enumerate().skip(1) {
                edits.insert(i, fx.edit("E1", s));
            }
            for edit in edits.values() {
                fx.engine().restore(&edit.id, None).unwrap();
            }

            let listed = fx.recorder.store().list(&LogFilter::default(), Page::default()).unwrap();
            prop_assert!(listed.windows(2).all(|w| w[0].timestamp >= w[1].timestamp));
        }
    }
}
