use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::core::errors::{GearlogError, Result};
use crate::core::models::record::Record;
use crate::core::models::target::TargetType;
use crate::core::traits::entity_store::EntityStore;

type Collection = BTreeMap<String, Record>;

/// File-based entity store: one JSON document per collection.
///
/// Layout under the data directory:
/// ```text
/// data/equipment.json   { "E1": { "name": "Tent A", ... }, ... }
/// data/defects.json     { "D1": { "description": "...", ... }, ... }
/// ```
///
/// Every write replaces the whole document atomically. Writers in the
/// same process are serialized; separate processes are not coordinated.
pub struct JsonEntityStore {
    data_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonEntityStore {
    /// Create a store rooted at the given data directory.
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            write_lock: Mutex::new(()),
        }
    }

    fn collection_path(&self, kind: TargetType) -> PathBuf {
        self.data_dir.join(format!("{}.json", kind.collection()))
    }

    fn load(&self, kind: TargetType) -> Result<Collection> {
        let path = self.collection_path(kind);
        if !path.exists() {
            return Ok(Collection::new());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| GearlogError::StoreError {
            detail: format!("Cannot read {}: {e}", path.display()),
        })?;
        if content.trim().is_empty() {
            return Ok(Collection::new());
        }

        serde_json::from_str(&content).map_err(|e| GearlogError::StoreError {
            detail: format!("Malformed collection {}: {e}", path.display()),
        })
    }

    fn save(&self, kind: TargetType, collection: &Collection) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)?;
        let path = self.collection_path(kind);

        let json =
            serde_json::to_string_pretty(collection).map_err(|e| GearlogError::StoreError {
                detail: format!("Failed to serialize {}: {e}", kind.collection()),
            })?;

        let mut tmp = tempfile::NamedTempFile::new_in(&self.data_dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.write_all(b"\n")?;
        tmp.persist(&path).map_err(|e| GearlogError::StoreError {
            detail: format!("Cannot replace {}: {e}", path.display()),
        })?;
        Ok(())
    }

    /// Load, mutate and save one collection under the write lock.
    fn update<T>(&self, kind: TargetType, f: impl FnOnce(&mut Collection) -> T) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| GearlogError::StoreError {
                detail: "entity store lock poisoned".into(),
            })?;
        let mut collection = self.load(kind)?;
        let out = f(&mut collection);
        self.save(kind, &collection)?;
        Ok(out)
    }
}

impl EntityStore for JsonEntityStore {
    fn get(&self, kind: TargetType, id: &str) -> Result<Option<Record>> {
        Ok(self.load(kind)?.remove(id))
    }

    fn put(&self, kind: TargetType, id: &str, record: &Record) -> Result<()> {
        self.update(kind, |c| {
            c.insert(id.to_string(), record.clone());
        })?;
        tracing::debug!(kind = %kind, id, "wrote entity");
        Ok(())
    }

    fn delete(&self, kind: TargetType, id: &str) -> Result<bool> {
        let existed = self.update(kind, |c| c.remove(id).is_some())?;
        tracing::debug!(kind = %kind, id, existed, "deleted entity");
        Ok(existed)
    }

    fn list(&self, kind: TargetType) -> Result<BTreeMap<String, Record>> {
        self.load(kind)
    }
}
