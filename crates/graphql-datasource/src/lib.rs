//! # graphql-datasource
//!
//! Derives CRUD GraphQL schemas from type declarations and binds them to
//! collections.
//!
//! Given SDL fragments and a list of root type names, the engine:
//!
//! - merges the fragments into one working document
//! - discovers each root type's identifier and data fields
//! - synthesizes `TInput`, `TUpdateInput`, `TEdge`, `TConnection`, `TQuery`
//!   and `TMutation` plus the `Query.t`/`Mutation.t` entry points
//! - binds `find`, `list`, `create`, `update`, `upsert` and `delete` to a
//!   [`Collection`](graphql_datasource_storage::Collection) per root type
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use graphql_datasource::{DataSourceConfig, DataSourceSchemaBuilder};
//! use graphql_datasource_memory::InMemoryCollectionFactory;
//!
//! let schema = DataSourceSchemaBuilder::new(DataSourceConfig::default().with_timestamps(true))
//!     .fragment("type Widget { id: ID! name: String! }")
//!     .root_type("Widget")
//!     .build(Arc::new(InMemoryCollectionFactory::new()))
//!     .await?;
//!
//! let response = schema
//!     .execute(r#"mutation { widget { create(data: { name: "sprocket" }) } }"#)
//!     .await;
//! ```
//!
//! ## Configuration
//!
//! ```toml
//! namespace = "Inventory"
//! timestamps = true
//! max_page_size = 100
//! collection_scope = "schema"
//! ```
//!
//! ## Modules
//!
//! - [`config`] - Configuration options
//! - [`document`] - Parsing, loading, merging and printing documents
//! - [`schema`] - Introspection, synthesis and assembly
//! - [`resolvers`] - CRUD resolvers bound to collections
//! - [`binding`] - Collection acquisition and the executable schema
//! - [`error`] - Error types

pub mod binding;
pub mod config;
pub mod document;
pub mod error;
pub mod naming;
pub mod resolvers;
pub mod schema;

// Re-export main types
pub use binding::{DataSourceSchema, ResolverBinder};
pub use config::{CollectionScope, DataSourceConfig};
pub use document::{DocumentMerger, DocumentSource, MergePolicy, MergeStrategy, merge_documents};
pub use error::{ResolverError, SchemaError};
pub use resolvers::{Clock, SystemClock};
pub use schema::{AssembledSchema, DataSourceSchemaBuilder, RootType, SchemaAssembler};

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
