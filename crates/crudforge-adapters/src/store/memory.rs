//! In-memory scaffold store for tests.

use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

use crudforge_core::application::ports::{
    ScaffoldFilter, ScaffoldId, ScaffoldRecord, ScaffoldStore, StoreError,
};
use crudforge_core::domain::ScaffoldPayload;

/// Map-backed store. Saving replaces the whole payload (and with it the
/// whole field list) in one step, mirroring the transactional replace-all
/// the persistence contract demands.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    next_id: ScaffoldId,
    records: BTreeMap<ScaffoldId, ScaffoldPayload>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_err() -> StoreError {
    StoreError::Backend {
        reason: "store lock poisoned".into(),
    }
}

impl ScaffoldStore for MemoryStore {
    fn save(
        &self,
        payload: ScaffoldPayload,
        existing: Option<ScaffoldId>,
    ) -> Result<ScaffoldId, StoreError> {
        let mut inner = self.inner.write().map_err(|_| lock_err())?;
        match existing {
            Some(id) => {
                if !inner.records.contains_key(&id) {
                    return Err(StoreError::NotFound { id });
                }
                inner.records.insert(id, payload);
                Ok(id)
            }
            None => {
                inner.next_id += 1;
                let id = inner.next_id;
                inner.records.insert(id, payload);
                Ok(id)
            }
        }
    }

    fn load(&self, id: ScaffoldId) -> Result<ScaffoldRecord, StoreError> {
        let inner = self.inner.read().map_err(|_| lock_err())?;
        inner
            .records
            .get(&id)
            .cloned()
            .map(|payload| ScaffoldRecord { id, payload })
            .ok_or(StoreError::NotFound { id })
    }

    fn list(&self, filter: &ScaffoldFilter) -> Result<Vec<ScaffoldRecord>, StoreError> {
        let inner = self.inner.read().map_err(|_| lock_err())?;
        let records = inner
            .records
            .iter()
            .map(|(id, payload)| ScaffoldRecord {
                id: *id,
                payload: payload.clone(),
            })
            .collect();
        Ok(super::filter_and_sort(records, filter))
    }

    fn delete(&self, id: ScaffoldId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| lock_err())?;
        inner
            .records
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crudforge_core::domain::FieldSpec;

    fn payload(table: &str, fields: &[&str]) -> ScaffoldPayload {
        ScaffoldPayload {
            table_name: table.into(),
            fields: fields
                .iter()
                .map(|n| FieldSpec {
                    name: (*n).into(),
                    ..FieldSpec::default()
                })
                .collect(),
            ..ScaffoldPayload::default()
        }
    }

    #[test]
    fn update_replaces_the_entire_field_list() {
        let store = MemoryStore::new();
        let id = store.save(payload("posts", &["title", "body"]), None).unwrap();

        store.save(payload("posts", &["headline"]), Some(id)).unwrap();

        let reloaded = store.load(id).unwrap();
        let names: Vec<_> = reloaded.payload.fields.iter().map(|f| f.name.clone()).collect();
        assert_eq!(names, vec!["headline"]);
    }

    #[test]
    fn updating_a_missing_record_is_not_found() {
        let store = MemoryStore::new();
        let err = store.save(payload("posts", &["a"]), Some(42)).unwrap_err();
        assert_eq!(err, StoreError::NotFound { id: 42 });
    }

    #[test]
    fn list_filters_and_sorts() {
        let store = MemoryStore::new();
        store.save(payload("posts", &["a"]), None).unwrap();
        store.save(payload("authors", &["a"]), None).unwrap();
        store.save(payload("post_tags", &["a"]), None).unwrap();

        let filter = ScaffoldFilter {
            search: Some("post".into()),
            sort: crudforge_core::application::ports::SortColumn::TableName,
            descending: false,
        };
        let tables: Vec<_> = store
            .list(&filter)
            .unwrap()
            .into_iter()
            .map(|r| r.payload.table_name)
            .collect();
        assert_eq!(tables, vec!["post_tags", "posts"]);
    }
}
