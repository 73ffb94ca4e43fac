//! # graphql-datasource-storage
//!
//! Collection contract for the graphql-datasource schema engine.
//!
//! This crate defines the traits and types that every collection backend must
//! implement. It does not contain any implementation; see
//! `graphql-datasource-memory` for an in-memory backend.
//!
//! ## Overview
//!
//! - [`Collection`]: `find`/`list`/`create`/`update`/`upsert`/`delete` over one
//!   root type's records
//! - [`CollectionFactory`]: hands out collections for root types
//! - [`ListOptions`], [`Page`]: the list request and response shapes
//! - [`RequestContext`]: opaque request data passed to factories
//!
//! ## Example
//!
//! ```ignore
//! use graphql_datasource_storage::{Collection, ListOptions, OrderClause};
//!
//! async fn newest(collection: &dyn Collection) -> anyhow::Result<()> {
//!     let options = ListOptions::new()
//!         .with_order(OrderClause::desc("created"))
//!         .with_first(10);
//!     let page = collection.list(&options).await?;
//!     println!("{} records", page.len());
//!     Ok(())
//! }
//! ```

mod context;
mod error;
mod traits;
mod types;

pub use context::RequestContext;
pub use error::{CollectionError, ErrorCategory};
pub use traits::{
    Collection, CollectionFactory, CollectionRequest, DynCollection, DynCollectionFactory,
};
pub use types::{
    Edge, FilterClause, FilterOperation, ListOptions, OrderClause, Page, PageInfo, Record,
    record_from_value,
};

/// Type alias for a collection result.
pub type CollectionResult<T> = Result<T, CollectionError>;
