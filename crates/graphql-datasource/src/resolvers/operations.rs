//! CRUD semantics applied on top of a collection.
//!
//! The GraphQL resolvers only decode arguments and encode results; every
//! rule about existence checks, clamping and timestamps lives here.

use std::sync::Arc;

use graphql_datasource_storage::{Collection, CollectionError, Page, Record};
use serde_json::Value;
use tracing::{debug, warn};

use super::pagination::ListArguments;
use super::timestamps::{Clock, timestamp_millis};
use crate::error::ResolverError;

const CREATED: &str = "created";
const MODIFIED: &str = "modified";

/// Operation rules for one root type.
#[derive(Clone)]
pub struct CollectionOperations {
    collection_name: String,
    timestamps: bool,
    max_page_size: u32,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for CollectionOperations {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionOperations")
            .field("collection_name", &self.collection_name)
            .field("timestamps", &self.timestamps)
            .field("max_page_size", &self.max_page_size)
            .finish()
    }
}

fn collection_failure(
    collection: &str,
    operation: &'static str,
    err: CollectionError,
) -> ResolverError {
    warn!(
        collection = %collection,
        operation,
        category = %err.category(),
        error = %err,
        "Collection operation failed"
    );
    ResolverError::Collection(err)
}

impl CollectionOperations {
    /// Creates the rules for `collection_name`.
    pub fn new(
        collection_name: impl Into<String>,
        timestamps: bool,
        max_page_size: u32,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            collection_name: collection_name.into(),
            timestamps,
            max_page_size,
            clock,
        }
    }

    /// The collection (root type) name.
    pub fn collection_name(&self) -> &str {
        &self.collection_name
    }

    fn fail<'a>(
        &'a self,
        operation: &'static str,
    ) -> impl FnOnce(CollectionError) -> ResolverError + 'a {
        move |err| collection_failure(&self.collection_name, operation, err)
    }

    /// Finds a record; absence is not an error.
    pub async fn find(
        &self,
        collection: &dyn Collection,
        id: &str,
    ) -> Result<Option<Record>, ResolverError> {
        collection.find(id).await.map_err(self.fail("find"))
    }

    /// Lists records with clamped page sizes.
    pub async fn list(
        &self,
        collection: &dyn Collection,
        arguments: ListArguments,
    ) -> Result<Page, ResolverError> {
        let options = arguments.into_options(self.max_page_size);
        debug!(
            collection = %self.collection_name,
            first = ?options.first,
            last = ?options.last,
            "Listing records"
        );
        collection.list(&options).await.map_err(self.fail("list"))
    }

    /// Creates a record, stamping `created` and `modified` with one instant.
    pub async fn create(
        &self,
        collection: &dyn Collection,
        id: Option<&str>,
        mut data: Record,
    ) -> Result<String, ResolverError> {
        if self.timestamps {
            let now = Value::from(timestamp_millis(self.clock.as_ref()));
            data.insert(CREATED.to_string(), now.clone());
            data.insert(MODIFIED.to_string(), now);
        }
        let id = collection
            .create(id, data)
            .await
            .map_err(self.fail("create"))?;
        debug!(collection = %self.collection_name, id = %id, "Record created");
        Ok(id)
    }

    /// Updates an existing record. A missing record fails with
    /// `RecordNotFound` and the collection's `update` is not called.
    pub async fn update(
        &self,
        collection: &dyn Collection,
        id: &str,
        mut data: Record,
    ) -> Result<bool, ResolverError> {
        if self.find(collection, id).await?.is_none() {
            debug!(collection = %self.collection_name, id = %id, "Update target missing");
            return Err(ResolverError::record_not_found(&self.collection_name, id));
        }
        if self.timestamps {
            data.insert(
                MODIFIED.to_string(),
                Value::from(timestamp_millis(self.clock.as_ref())),
            );
        }
        collection
            .update(id, data)
            .await
            .map_err(self.fail("update"))
    }

    /// Creates or replaces a record. With timestamps enabled, `created` is
    /// stamped only when the record does not exist yet.
    pub async fn upsert(
        &self,
        collection: &dyn Collection,
        id: &str,
        mut data: Record,
    ) -> Result<bool, ResolverError> {
        if self.timestamps {
            let now = Value::from(timestamp_millis(self.clock.as_ref()));
            if self.find(collection, id).await?.is_none() {
                data.insert(CREATED.to_string(), now.clone());
            }
            data.insert(MODIFIED.to_string(), now);
        }
        collection
            .upsert(id, data)
            .await
            .map_err(self.fail("upsert"))
    }

    /// Deletes a record without an existence check.
    pub async fn delete(
        &self,
        collection: &dyn Collection,
        id: &str,
    ) -> Result<bool, ResolverError> {
        collection.delete(id).await.map_err(self.fail("delete"))
    }
}
