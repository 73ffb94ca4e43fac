//! Binding an assembled schema to collections.
//!
//! The binder acquires a collection per root type (at bind time or per
//! request, see [`CollectionScope`]), builds the resolver map and converts
//! the final document into an executable [`Schema`].

mod executable;

use std::collections::HashMap;
use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, ResolverContext, Schema};
use async_graphql::{Request, Response};
use async_graphql_parser::types::ServiceDocument;
use futures_util::future::try_join_all;
use graphql_datasource_storage::{CollectionRequest, DynCollectionFactory, RequestContext};
use tracing::{debug, info, warn};

use crate::config::{CollectionScope, DataSourceConfig};
use crate::document::ast::find_type;
use crate::document::print_document;
use crate::error::SchemaError;
use crate::resolvers::{
    Clock, CollectionOperations, CollectionSource, CreateResolver, DeleteResolver,
    EntryPointResolver, FindResolver, ListResolver, RequestCollections, RootBinding,
    UpdateResolver, UpsertResolver,
};
use crate::schema::{AssembledSchema, RootType};

pub use executable::build_executable;

/// A bound field resolver.
pub type FieldResolver =
    Arc<dyn for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync>;

/// Resolvers keyed by type name, then field name.
pub type ResolverMap = HashMap<String, HashMap<String, FieldResolver>>;

fn insert(
    map: &mut ResolverMap,
    type_name: &str,
    field_name: &str,
    resolver: impl for<'a> Fn(ResolverContext<'a>) -> FieldFuture<'a> + Send + Sync + 'static,
) {
    map.entry(type_name.to_string())
        .or_default()
        .insert(field_name.to_string(), Arc::new(resolver));
}

/// Acquires collections and produces the resolver map.
pub struct ResolverBinder {
    config: DataSourceConfig,
    factory: DynCollectionFactory,
    clock: Arc<dyn Clock>,
}

impl ResolverBinder {
    /// Creates a binder.
    pub fn new(config: DataSourceConfig, factory: DynCollectionFactory, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            factory,
            clock,
        }
    }

    /// Binds `assembled` and builds the executable schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::Collection` if a schema-scoped acquisition fails
    /// and `SchemaError::SchemaBuildFailed` if the executable schema cannot be
    /// built. No partial schema is returned.
    pub async fn bind(&self, assembled: AssembledSchema) -> Result<DataSourceSchema, SchemaError> {
        let AssembledSchema { document, roots } = assembled;
        let document = Arc::new(document);

        let sources = match self.config.collection_scope {
            CollectionScope::Schema => {
                try_join_all(roots.iter().map(|root| self.acquire(root, &document))).await?
            }
            CollectionScope::Request => roots
                .iter()
                .map(|_| CollectionSource::PerRequest(self.factory.clone()))
                .collect(),
        };

        let mut resolvers = ResolverMap::new();
        for (root, source) in roots.iter().zip(sources) {
            self.bind_root(&mut resolvers, root, source, &document);
        }

        let schema = build_executable(&document, &resolvers, &self.config)?;
        info!(
            roots = roots.len(),
            scope = ?self.config.collection_scope,
            "Data source schema bound"
        );

        Ok(DataSourceSchema {
            schema,
            document,
            roots: roots.into(),
        })
    }

    async fn acquire(
        &self,
        root: &RootType,
        document: &ServiceDocument,
    ) -> Result<CollectionSource, SchemaError> {
        let type_definition =
            find_type(document, root.type_name()).ok_or_else(|| SchemaError::UnknownRootType {
                type_name: root.type_name().to_string(),
            })?;

        let collection = self
            .factory
            .collection(CollectionRequest {
                id: root.id_field(),
                name: root.type_name(),
                type_definition,
                document,
                context: None,
            })
            .await
            .map_err(|source| {
                warn!(type_name = %root.type_name(), error = %source, "Collection acquisition failed");
                SchemaError::Collection {
                    type_name: root.type_name().to_string(),
                    source,
                }
            })?;

        debug!(type_name = %root.type_name(), "Collection acquired");
        Ok(CollectionSource::Bound(collection))
    }

    fn bind_root(
        &self,
        resolvers: &mut ResolverMap,
        root: &RootType,
        source: CollectionSource,
        document: &Arc<ServiceDocument>,
    ) {
        let operations = CollectionOperations::new(
            root.type_name(),
            root.timestamps,
            self.config.max_page_size,
            self.clock.clone(),
        );
        let binding = Arc::new(RootBinding::new(
            root.clone(),
            operations,
            source,
            document.clone(),
        ));
        let names = &root.names;

        insert(resolvers, "Query", &names.entry_field, EntryPointResolver::resolve());
        insert(resolvers, "Mutation", &names.entry_field, EntryPointResolver::resolve());

        insert(resolvers, &names.query, "find", FindResolver::resolve(binding.clone()));
        insert(resolvers, &names.query, "list", ListResolver::resolve(binding.clone()));

        insert(resolvers, &names.mutation, "create", CreateResolver::resolve(binding.clone()));
        insert(resolvers, &names.mutation, "update", UpdateResolver::resolve(binding.clone()));
        insert(resolvers, &names.mutation, "upsert", UpsertResolver::resolve(binding.clone()));
        insert(resolvers, &names.mutation, "delete", DeleteResolver::resolve(binding));
    }
}

/// An executable schema bound to collections.
#[derive(Clone)]
pub struct DataSourceSchema {
    schema: Schema,
    document: Arc<ServiceDocument>,
    roots: Arc<[RootType]>,
}

impl DataSourceSchema {
    /// The executable schema.
    pub fn executable(&self) -> &Schema {
        &self.schema
    }

    /// The final type-system document.
    pub fn document(&self) -> &ServiceDocument {
        &self.document
    }

    /// The bound root types.
    pub fn roots(&self) -> &[RootType] {
        &self.roots
    }

    /// Renders the final document as SDL.
    pub fn sdl(&self) -> String {
        print_document(&self.document)
    }

    /// Executes a request with an empty request context.
    pub async fn execute(&self, request: impl Into<Request>) -> Response {
        self.execute_with_context(request, RequestContext::empty())
            .await
    }

    /// Executes a request. Request-scoped collections are acquired with
    /// `context` and cached for the duration of the request.
    pub async fn execute_with_context(
        &self,
        request: impl Into<Request>,
        context: RequestContext,
    ) -> Response {
        let request = request.into().data(RequestCollections::new(context));
        self.schema.execute(request).await
    }
}

impl std::fmt::Debug for DataSourceSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceSchema")
            .field("roots", &self.roots.iter().map(RootType::type_name).collect::<Vec<_>>())
            .finish()
    }
}
