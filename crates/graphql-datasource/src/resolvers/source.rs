//! Collection acquisition for bound resolvers.

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::ResolverContext;
use async_graphql_parser::types::ServiceDocument;
use graphql_datasource_storage::{
    CollectionError, CollectionRequest, DynCollection, DynCollectionFactory, RequestContext,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::operations::CollectionOperations;
use crate::document::ast::find_type;
use crate::error::ResolverError;
use crate::schema::RootType;

/// Per-request collection cache, inserted into the request data by
/// [`DataSourceSchema::execute_with_context`](crate::DataSourceSchema::execute_with_context).
pub struct RequestCollections {
    context: RequestContext,
    collections: Mutex<HashMap<String, DynCollection>>,
}

impl RequestCollections {
    /// Creates an empty cache for a request carrying `context`.
    pub fn new(context: RequestContext) -> Self {
        Self {
            context,
            collections: Mutex::new(HashMap::new()),
        }
    }

    /// The request's context.
    pub fn context(&self) -> &RequestContext {
        &self.context
    }
}

impl std::fmt::Debug for RequestCollections {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestCollections")
            .field("context", &self.context)
            .finish()
    }
}

/// Where a root type's resolvers get their collection from.
#[derive(Clone)]
pub enum CollectionSource {
    /// Acquired once while binding the schema.
    Bound(DynCollection),
    /// Acquired on first use in each request.
    PerRequest(DynCollectionFactory),
}

/// Everything the resolvers of one root type share.
pub struct RootBinding {
    /// The root type.
    pub root: RootType,
    /// Operation rules.
    pub operations: CollectionOperations,
    source: CollectionSource,
    document: Arc<ServiceDocument>,
}

impl RootBinding {
    /// Creates the binding of `root`.
    pub fn new(
        root: RootType,
        operations: CollectionOperations,
        source: CollectionSource,
        document: Arc<ServiceDocument>,
    ) -> Self {
        Self {
            root,
            operations,
            source,
            document,
        }
    }

    /// The root type name.
    pub fn type_name(&self) -> &str {
        self.root.type_name()
    }

    /// The identifier field name.
    pub fn id_field(&self) -> &str {
        self.root.id_field()
    }

    /// Returns the collection for the current request.
    ///
    /// # Errors
    ///
    /// Returns `ResolverError::Collection` if request-scoped acquisition fails.
    pub async fn collection(&self, ctx: &ResolverContext<'_>) -> Result<DynCollection, ResolverError> {
        let factory = match &self.source {
            CollectionSource::Bound(collection) => return Ok(collection.clone()),
            CollectionSource::PerRequest(factory) => factory,
        };

        let Some(requests) = ctx.data_opt::<RequestCollections>() else {
            return self.acquire(factory, None).await;
        };

        let mut cache = requests.collections.lock().await;
        if let Some(collection) = cache.get(self.type_name()) {
            return Ok(collection.clone());
        }
        let collection = self.acquire(factory, Some(&requests.context)).await?;
        cache.insert(self.type_name().to_string(), collection.clone());
        Ok(collection)
    }

    async fn acquire(
        &self,
        factory: &DynCollectionFactory,
        context: Option<&RequestContext>,
    ) -> Result<DynCollection, ResolverError> {
        let type_definition = find_type(&self.document, self.type_name()).ok_or_else(|| {
            CollectionError::internal(format!(
                "type '{}' is missing from the schema document",
                self.type_name()
            ))
        })?;

        debug!(
            type_name = %self.type_name(),
            request_id = ?context.and_then(RequestContext::request_id),
            "Acquiring request-scoped collection"
        );

        factory
            .collection(CollectionRequest {
                id: self.id_field(),
                name: self.type_name(),
                type_definition,
                document: &self.document,
                context,
            })
            .await
            .map_err(|e| {
                warn!(type_name = %self.type_name(), error = %e, "Collection acquisition failed");
                ResolverError::Collection(e)
            })
    }
}
