//! In-memory collection backend for graphql-datasource.
//!
//! This crate provides an in-memory implementation of the `Collection` trait
//! from `graphql-datasource-storage`, using papaya lock-free HashMap for
//! concurrent access, plus a factory that hands out one collection per root
//! type.
//!
//! # Example
//!
//! ```ignore
//! use graphql_datasource_memory::InMemoryCollectionFactory;
//!
//! let factory = std::sync::Arc::new(InMemoryCollectionFactory::new());
//! let schema = DataSourceSchemaBuilder::new(DataSourceConfig::default())
//!     .fragment(DocumentSource::text("type Widget { id: ID! name: String }"))
//!     .root_type("Widget")
//!     .build(factory.clone())
//!     .await?;
//! ```

pub mod collection;
pub mod factory;
pub mod query;

pub use collection::InMemoryCollection;
pub use factory::InMemoryCollectionFactory;
pub use graphql_datasource_storage::{Collection, CollectionError, Record};
