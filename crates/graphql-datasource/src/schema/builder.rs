//! Data source schema builder.
//!
//! [`DataSourceSchemaBuilder`] runs the synchronous assembly and then binds
//! the result to collections obtained from a factory.

use std::sync::Arc;

use graphql_datasource_storage::DynCollectionFactory;
use tracing::debug;

use super::assembler::{AssembledSchema, SchemaAssembler};
use super::introspect::IdFieldSelector;
use crate::binding::{DataSourceSchema, ResolverBinder};
use crate::config::DataSourceConfig;
use crate::document::{DocumentSource, MergeStrategy};
use crate::error::SchemaError;
use crate::resolvers::{Clock, SystemClock};

/// Builds an executable [`DataSourceSchema`].
///
/// # Example
///
/// ```ignore
/// let factory = Arc::new(InMemoryCollectionFactory::new());
/// let schema = DataSourceSchemaBuilder::new(DataSourceConfig::default())
///     .fragment("type Widget { id: ID! name: String }")
///     .root_type("Widget")
///     .build(factory)
///     .await?;
///
/// let response = schema.execute("{ widget { list { edges { node { name } } } } }").await;
/// ```
pub struct DataSourceSchemaBuilder {
    config: DataSourceConfig,
    assembler: SchemaAssembler,
    clock: Arc<dyn Clock>,
}

impl DataSourceSchemaBuilder {
    /// Creates a builder.
    #[must_use]
    pub fn new(config: DataSourceConfig) -> Self {
        Self {
            assembler: SchemaAssembler::new(&config),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Adds a fragment.
    #[must_use]
    pub fn fragment(mut self, source: impl Into<DocumentSource>) -> Self {
        self.assembler = self.assembler.fragment(source);
        self
    }

    /// Adds several fragments.
    #[must_use]
    pub fn fragments<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentSource>,
    {
        self.assembler = self.assembler.fragments(sources);
        self
    }

    /// Adds a root type.
    #[must_use]
    pub fn root_type(mut self, type_name: impl Into<String>) -> Self {
        self.assembler = self.assembler.root_type(type_name);
        self
    }

    /// Adds several root types.
    #[must_use]
    pub fn root_types<I, S>(mut self, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.assembler = self.assembler.root_types(type_names);
        self
    }

    /// Replaces the default identifier policy.
    #[must_use]
    pub fn id_field_selector(mut self, selector: IdFieldSelector) -> Self {
        self.assembler = self.assembler.id_field_selector(selector);
        self
    }

    /// Replaces the merge strategy table.
    #[must_use]
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.assembler = self.assembler.merge_strategy(strategy);
        self
    }

    /// Replaces the clock used for timestamps.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs assembly only, without binding.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for invalid configuration and any assembly
    /// error.
    pub fn assemble(self) -> Result<AssembledSchema, SchemaError> {
        self.config.validate().map_err(SchemaError::InvalidConfig)?;
        self.assembler.assemble()
    }

    /// Assembles the schema and binds it to collections from `factory`.
    ///
    /// # Errors
    ///
    /// Any assembly, acquisition or build error aborts the whole build.
    pub async fn build(self, factory: DynCollectionFactory) -> Result<DataSourceSchema, SchemaError> {
        debug!("Starting data source schema build");
        let binder = ResolverBinder::new(self.config.clone(), factory, self.clock.clone());
        let assembled = self.assemble()?;
        binder.bind(assembled).await
    }
}

impl std::fmt::Debug for DataSourceSchemaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataSourceSchemaBuilder")
            .field("config", &self.config)
            .field("assembler", &self.assembler)
            .finish()
    }
}
