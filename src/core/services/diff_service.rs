use std::collections::BTreeMap;

use crate::core::models::diff_result::{DiffEntry, DiffResult, FieldChange};
use crate::core::models::import_row::{ImportChange, ImportChangeKind, ImportRow};
use crate::core::models::record::{Record, stringify};

/// Compares flat records and produces a structured diff.
pub struct DiffService;

impl DiffService {
    /// Compare proposed fields against a current record.
    ///
    /// - Only keys present in `new` are considered; keys only in `old`
    ///   are not treated as removals
    /// - Values are compared as trimmed strings, so `5` equals `"5"` and
    ///   `" green "` equals `"green"`
    /// - A missing `old` (new entity) or missing key compares as `""`
    ///
    /// Results are sorted alphabetically by field.
    pub fn diff(&self, old: Option<&Record>, new: &Record) -> DiffResult {
        let entries = new
            .iter()
            .filter_map(|(field, new_value)| {
                let old_str = old
                    .and_then(|o| o.get(field))
                    .map(stringify)
                    .unwrap_or_default();
                let new_str = stringify(new_value);

                let old_trimmed = old_str.trim();
                let new_trimmed = new_str.trim();
                (old_trimmed != new_trimmed).then(|| DiffEntry {
                    field: field.clone(),
                    change: FieldChange {
                        old: old_trimmed.to_string(),
                        new: new_trimmed.to_string(),
                    },
                })
            })
            .collect();

        DiffResult { entries }
    }

    /// Classify import rows against the current catalog.
    ///
    /// Rows for unknown ids are `New`; rows for known ids are `Changed`
    /// when at least one field differs and dropped otherwise.
    pub fn preview_import(
        &self,
        current: &BTreeMap<String, Record>,
        rows: &[ImportRow],
    ) -> Vec<ImportChange> {
        rows.iter()
            .filter_map(|row| {
                let kind = match current.get(&row.id) {
                    None => ImportChangeKind::New,
                    Some(existing) => {
                        let changes = self.diff(Some(existing), &row.fields);
                        if changes.is_empty() {
                            return None;
                        }
                        ImportChangeKind::Changed(changes)
                    }
                };
                Some(ImportChange {
                    id: row.id.clone(),
                    kind,
                    incoming: row.fields.clone(),
                })
            })
            .collect()
    }
}
