use std::collections::BTreeMap;

use crate::core::errors::Result;
use crate::core::models::record::Record;
use crate::core::models::target::TargetType;

/// Port for the live catalog of tracked entities.
pub trait EntityStore: Send + Sync {
    /// Current record for `id`, or `None` if it does not exist.
    fn get(&self, kind: TargetType, id: &str) -> Result<Option<Record>>;

    /// Create or fully replace the record for `id`.
    fn put(&self, kind: TargetType, id: &str, record: &Record) -> Result<()>;

    /// Remove the record. Returns whether it existed.
    fn delete(&self, kind: TargetType, id: &str) -> Result<bool>;

    /// Every record of the given kind, keyed by id.
    fn list(&self, kind: TargetType) -> Result<BTreeMap<String, Record>>;
}
