//! JSON-file scaffold store: the CLI's default persistence.
//!
//! The whole store is one JSON document read and rewritten per operation.
//! Scaffold definitions are small and operations are request-scoped, so the
//! simplicity beats an embedded database; the full-document rewrite also
//! gives the replace-all field semantics for free.

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crudforge_core::application::ports::{
    ScaffoldFilter, ScaffoldId, ScaffoldRecord, ScaffoldStore, StoreError,
};
use crudforge_core::domain::ScaffoldPayload;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    next_id: ScaffoldId,
    records: Vec<ScaffoldRecord>,
}

/// File-backed store. The mutex serializes read-modify-write cycles within
/// one process; cross-process coordination is the caller's concern (one
/// admin process, per the concurrency model).
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            guard: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_file(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }
        let raw = std::fs::read_to_string(&self.path).map_err(|e| StoreError::Backend {
            reason: format!("reading {}: {e}", self.path.display()),
        })?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Backend {
            reason: format!("parsing {}: {e}", self.path.display()),
        })
    }

    fn store_file(&self, file: &StoreFile) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
                reason: format!("creating {}: {e}", parent.display()),
            })?;
        }
        let raw = serde_json::to_string_pretty(file).map_err(|e| StoreError::Backend {
            reason: format!("serializing store: {e}"),
        })?;
        std::fs::write(&self.path, raw).map_err(|e| StoreError::Backend {
            reason: format!("writing {}: {e}", self.path.display()),
        })
    }
}

impl ScaffoldStore for JsonFileStore {
    fn save(
        &self,
        payload: ScaffoldPayload,
        existing: Option<ScaffoldId>,
    ) -> Result<ScaffoldId, StoreError> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Backend {
            reason: "store lock poisoned".into(),
        })?;
        let mut file = self.load_file()?;

        let id = match existing {
            Some(id) => {
                let record = file
                    .records
                    .iter_mut()
                    .find(|r| r.id == id)
                    .ok_or(StoreError::NotFound { id })?;
                record.payload = payload;
                id
            }
            None => {
                file.next_id += 1;
                let id = file.next_id;
                file.records.push(ScaffoldRecord { id, payload });
                id
            }
        };

        self.store_file(&file)?;
        debug!(id, path = %self.path.display(), "scaffold saved");
        Ok(id)
    }

    fn load(&self, id: ScaffoldId) -> Result<ScaffoldRecord, StoreError> {
        self.load_file()?
            .records
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { id })
    }

    fn list(&self, filter: &ScaffoldFilter) -> Result<Vec<ScaffoldRecord>, StoreError> {
        Ok(super::filter_and_sort(self.load_file()?.records, filter))
    }

    fn delete(&self, id: ScaffoldId) -> Result<(), StoreError> {
        let _guard = self.guard.lock().map_err(|_| StoreError::Backend {
            reason: "store lock poisoned".into(),
        })?;
        let mut file = self.load_file()?;
        let before = file.records.len();
        file.records.retain(|r| r.id != id);
        if file.records.len() == before {
            return Err(StoreError::NotFound { id });
        }
        self.store_file(&file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::domain::FieldSpec;

    fn payload(table: &str) -> ScaffoldPayload {
        ScaffoldPayload {
            table_name: table.into(),
            fields: vec![FieldSpec {
                name: "title".into(),
                order: Some(3),
                ..FieldSpec::default()
            }],
            ..ScaffoldPayload::default()
        }
    }

    #[test]
    fn round_trip_preserves_fields_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("scaffolds.json"));

        let id = store.save(payload("posts"), None).unwrap();
        let record = store.load(id).unwrap();
        assert_eq!(record.payload.table_name, "posts");
        assert_eq!(record.payload.fields[0].order, Some(3));
    }

    #[test]
    fn ids_survive_deletion() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("scaffolds.json"));

        let a = store.save(payload("a"), None).unwrap();
        let b = store.save(payload("b"), None).unwrap();
        store.delete(a).unwrap();
        let c = store.save(payload("c"), None).unwrap();

        assert!(c > b, "deleted ids are never reused");
        assert_eq!(store.load(a).unwrap_err(), StoreError::NotFound { id: a });
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nope/scaffolds.json"));
        assert!(store.list(&ScaffoldFilter::default()).unwrap().is_empty());
    }
}
