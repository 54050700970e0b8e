use serde::Serialize;

/// Old and new rendering of one changed field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldChange {
    pub old: String,
    pub new: String,
}

/// One entry in a diff comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffEntry {
    pub field: String,
    #[serde(flatten)]
    pub change: FieldChange,
}

/// Fields that differ between a current record and proposed fields.
///
/// Entries are sorted by field name. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiffResult {
    pub entries: Vec<DiffEntry>,
}

impl DiffResult {
    /// Returns true if there are no differences.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The change recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&FieldChange> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| &e.change)
    }

    /// Names of the changed fields, in order.
    pub fn fields(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.field.as_str()).collect()
    }
}
