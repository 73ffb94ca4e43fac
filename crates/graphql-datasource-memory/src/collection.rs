use std::sync::Arc;

use async_trait::async_trait;
use graphql_datasource_storage::{Collection, CollectionError, ListOptions, Page, Record};
use papaya::HashMap as PapayaHashMap;
use serde_json::Value;
use tracing::trace;

use crate::query;

/// In-memory collection using papaya lock-free HashMap.
///
/// Records are keyed by identifier and always carry the identifier under the
/// collection's identifier field. `update` and `upsert` merge the supplied
/// fields into the stored record, so server-managed fields such as `created`
/// survive partial writes.
#[derive(Debug)]
pub struct InMemoryCollection {
    name: String,
    id_field: String,
    records: Arc<PapayaHashMap<String, Record>>,
}

impl InMemoryCollection {
    /// Creates an empty collection.
    pub fn new(name: impl Into<String>, id_field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id_field: id_field.into(),
            records: Arc::new(PapayaHashMap::new()),
        }
    }

    /// Returns the collection (root type) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the identifier field name.
    pub fn id_field(&self) -> &str {
        &self.id_field
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.pin().len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the stored record, bypassing the async contract.
    pub fn get(&self, id: &str) -> Option<Record> {
        self.records.pin().get(id).cloned()
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.records.pin().clear();
    }

    fn with_id(&self, id: &str, mut data: Record) -> Record {
        data.insert(self.id_field.clone(), Value::String(id.to_string()));
        data
    }

    fn merged(&self, id: &str, existing: &Record, data: &Record) -> Record {
        let mut merged = existing.clone();
        for (key, value) in data {
            merged.insert(key.clone(), value.clone());
        }
        merged.insert(self.id_field.clone(), Value::String(id.to_string()));
        merged
    }
}

#[async_trait]
impl Collection for InMemoryCollection {
    async fn find(&self, id: &str) -> Result<Option<Record>, CollectionError> {
        Ok(self.get(id))
    }

    async fn list(&self, options: &ListOptions) -> Result<Page, CollectionError> {
        let snapshot: Vec<(String, Record)> = {
            let guard = self.records.pin();
            guard
                .iter()
                .map(|(id, record)| (id.clone(), record.clone()))
                .collect()
        };
        trace!(collection = %self.name, candidates = snapshot.len(), "Listing records");
        query::execute(snapshot, options)
    }

    async fn create(&self, id: Option<&str>, data: Record) -> Result<String, CollectionError> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let record = self.with_id(&id, data);

        let guard = self.records.pin();
        if guard.try_insert(id.clone(), record).is_err() {
            return Err(CollectionError::already_exists(&self.name, id));
        }
        trace!(collection = %self.name, id = %id, "Record created");
        Ok(id)
    }

    async fn update(&self, id: &str, data: Record) -> Result<bool, CollectionError> {
        let guard = self.records.pin();
        let updated = guard
            .update(id.to_string(), |existing| self.merged(id, existing, &data))
            .is_some();
        trace!(collection = %self.name, id = %id, updated, "Record update");
        Ok(updated)
    }

    async fn upsert(&self, id: &str, data: Record) -> Result<bool, CollectionError> {
        let guard = self.records.pin();
        guard.update_or_insert_with(
            id.to_string(),
            |existing| self.merged(id, existing, &data),
            || self.with_id(id, data.clone()),
        );
        trace!(collection = %self.name, id = %id, "Record upserted");
        Ok(true)
    }

    async fn delete(&self, id: &str) -> Result<bool, CollectionError> {
        let removed = self.records.pin().remove(id).is_some();
        trace!(collection = %self.name, id = %id, removed, "Record delete");
        Ok(removed)
    }
}
