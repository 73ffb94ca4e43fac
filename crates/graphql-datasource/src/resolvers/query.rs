//! `TQuery` resolvers.
//!
//! Implements `find` (single record by identifier) and `list` (a page of
//! edges) on top of a root type's collection.

use std::sync::Arc;

use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use graphql_datasource_storage::CollectionError;
use tracing::debug;

use super::pagination::ListArguments;
use super::source::RootBinding;
use super::{json_to_graphql_value, required_id_argument, respond};

/// Resolver for `TQuery.find`.
pub struct FindResolver;

impl FindResolver {
    /// Creates a resolver reading one record by the identifier argument.
    ///
    /// A missing record resolves to `null`, not an error.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let id = required_id_argument(&ctx, binding.id_field())?;

                debug!(
                    type_name = %binding.type_name(),
                    id = %id,
                    "Resolving find"
                );

                let collection = binding.collection(&ctx).await?;
                let record = binding.operations.find(collection.as_ref(), &id).await?;

                match record {
                    Some(record) => Ok(Some(FieldValue::value(json_to_graphql_value(
                        serde_json::Value::Object(record),
                    )))),
                    None => {
                        debug!(type_name = %binding.type_name(), id = %id, "Record not found");
                        Ok(None)
                    }
                }
            }))
        }
    }
}

/// Resolver for `TQuery.list`.
pub struct ListResolver;

impl ListResolver {
    /// Creates a resolver returning a `TConnection` page.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let arguments = ListArguments::from_context(&ctx)?;

                debug!(
                    type_name = %binding.type_name(),
                    first = ?arguments.first,
                    last = ?arguments.last,
                    "Resolving list"
                );

                let collection = binding.collection(&ctx).await?;
                let page = binding
                    .operations
                    .list(collection.as_ref(), arguments)
                    .await?;

                let value = serde_json::to_value(page)
                    .map_err(|e| CollectionError::internal(format!("Failed to encode page: {e}")))?;
                Ok(Some(FieldValue::value(json_to_graphql_value(value))))
            }))
        }
    }
}
