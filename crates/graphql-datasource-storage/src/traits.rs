//! Collection traits.
//!
//! This module defines the contract every collection backend implements and
//! the factory through which the schema binder acquires collections.

use std::sync::Arc;

use async_graphql_parser::types::{ServiceDocument, TypeDefinition};
use async_trait::async_trait;

use crate::context::RequestContext;
use crate::error::CollectionError;
use crate::types::{ListOptions, Page, Record};

/// The data-access contract for a single root type.
///
/// Implementations must be thread-safe (`Send + Sync`). The binder performs
/// no retries and no transaction wrapping; resilience belongs here.
///
/// # Example
///
/// ```ignore
/// use graphql_datasource_storage::{Collection, CollectionError, Record};
///
/// async fn rename(collection: &dyn Collection, id: &str) -> Result<bool, CollectionError> {
///     let mut data = Record::new();
///     data.insert("name".into(), "renamed".into());
///     collection.update(id, data).await
/// }
/// ```
#[async_trait]
pub trait Collection: Send + Sync {
    /// Finds a record by identifier.
    ///
    /// Returns `None` if the record does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only for backend failures, not for missing records.
    async fn find(&self, id: &str) -> Result<Option<Record>, CollectionError>;

    /// Lists records as a page of edges.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::InvalidRecord` for unusable cursors or filters.
    async fn list(&self, options: &ListOptions) -> Result<Page, CollectionError>;

    /// Creates a record, generating an identifier when `id` is `None`.
    ///
    /// Returns the identifier of the new record.
    ///
    /// # Errors
    ///
    /// Returns `CollectionError::AlreadyExists` if `id` is taken.
    async fn create(&self, id: Option<&str>, data: Record) -> Result<String, CollectionError>;

    /// Applies `data` to an existing record.
    ///
    /// Returns `false` if nothing was updated.
    async fn update(&self, id: &str, data: Record) -> Result<bool, CollectionError>;

    /// Creates or replaces the record stored under `id`.
    async fn upsert(&self, id: &str, data: Record) -> Result<bool, CollectionError>;

    /// Deletes a record. Returns `false` if no record was removed.
    async fn delete(&self, id: &str) -> Result<bool, CollectionError>;
}

/// Shareable collection handle.
pub type DynCollection = Arc<dyn Collection>;

/// Everything a factory knows about the collection being requested.
#[derive(Clone, Copy)]
pub struct CollectionRequest<'a> {
    /// Name of the identifier field.
    pub id: &'a str,
    /// Name of the root type.
    pub name: &'a str,
    /// The root type's definition in the final document.
    pub type_definition: &'a TypeDefinition,
    /// The complete final document.
    pub document: &'a ServiceDocument,
    /// Request-scoped context, present only for request-scoped acquisition.
    pub context: Option<&'a RequestContext>,
}

impl std::fmt::Debug for CollectionRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CollectionRequest")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

/// Produces collection handles for root types.
///
/// Called once per root type at bind time, or once per root type per request
/// when collections are request-scoped.
#[async_trait]
pub trait CollectionFactory: Send + Sync {
    /// Returns the collection backing `request.name`.
    ///
    /// # Errors
    ///
    /// Any error aborts schema binding (schema scope) or fails the operation
    /// that triggered acquisition (request scope).
    async fn collection(
        &self,
        request: CollectionRequest<'_>,
    ) -> Result<DynCollection, CollectionError>;
}

/// Shareable factory handle.
pub type DynCollectionFactory = Arc<dyn CollectionFactory>;
