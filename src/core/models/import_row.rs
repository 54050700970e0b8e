use super::diff_result::DiffResult;
use super::record::Record;

/// One normalized row of an import file.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub id: String,
    pub fields: Record,
}

/// How an import row relates to the current catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportChangeKind {
    /// No entity with this id exists yet.
    New,
    /// The entity exists and these fields would change.
    Changed(DiffResult),
}

/// A row that would change the catalog, shown for review before applying.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportChange {
    pub id: String,
    pub kind: ImportChangeKind,
    pub incoming: Record,
}
