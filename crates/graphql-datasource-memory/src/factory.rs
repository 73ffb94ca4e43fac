//! Collection factory handing out one in-memory collection per root type.

use std::sync::Arc;

use async_trait::async_trait;
use graphql_datasource_storage::{
    CollectionError, CollectionFactory, CollectionRequest, DynCollection,
};
use papaya::HashMap as PapayaHashMap;
use tracing::debug;

use crate::collection::InMemoryCollection;

/// Factory that keeps one [`InMemoryCollection`] per type name.
///
/// Repeated requests for the same type name return the same collection, so
/// request-scoped acquisition still sees one shared data set.
#[derive(Debug, Default)]
pub struct InMemoryCollectionFactory {
    collections: PapayaHashMap<String, Arc<InMemoryCollection>>,
}

impl InMemoryCollectionFactory {
    /// Creates a factory with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the collection for `name`, creating it with `id_field` if needed.
    pub fn get_or_create(&self, name: &str, id_field: &str) -> Arc<InMemoryCollection> {
        let guard = self.collections.pin();
        guard
            .get_or_insert_with(name.to_string(), || {
                debug!(collection = %name, id_field = %id_field, "Creating in-memory collection");
                Arc::new(InMemoryCollection::new(name, id_field))
            })
            .clone()
    }

    /// Returns the collection for `name` if it has been created.
    pub fn collection_named(&self, name: &str) -> Option<Arc<InMemoryCollection>> {
        self.collections.pin().get(name).cloned()
    }

    /// Returns the names of all created collections, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.collections.pin().keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl CollectionFactory for InMemoryCollectionFactory {
    async fn collection(
        &self,
        request: CollectionRequest<'_>,
    ) -> Result<DynCollection, CollectionError> {
        let collection: DynCollection = self.get_or_create(request.name, request.id);
        Ok(collection)
    }
}
