//! `TMutation` resolvers.

use std::sync::Arc;

use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};
use graphql_datasource_storage::{Record, record_from_value};
use tracing::debug;

use super::source::RootBinding;
use super::{id_argument, id_output, required_id_argument, respond, value_accessor_to_json};
use crate::error::ResolverError;

/// Reads the `data` argument as a record.
fn data_argument(ctx: &ResolverContext<'_>) -> Result<Record, ResolverError> {
    let value = ctx
        .args
        .get("data")
        .ok_or_else(|| ResolverError::MissingArgument("data".to_string()))?;
    record_from_value(value_accessor_to_json(&value))
        .map_err(|e| ResolverError::invalid_argument("data", e.to_string()))
}

/// Resolver for `TMutation.create`.
pub struct CreateResolver;

impl CreateResolver {
    /// Creates a resolver returning the identifier of the new record.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let id = id_argument(&ctx, binding.id_field())?;
                let data = data_argument(&ctx)?;

                debug!(
                    type_name = %binding.type_name(),
                    id = ?id,
                    "Resolving create"
                );

                let collection = binding.collection(&ctx).await?;
                let id = binding
                    .operations
                    .create(collection.as_ref(), id.as_deref(), data)
                    .await?;

                let id_type = &binding.root.descriptor.id_field_type;
                Ok(Some(FieldValue::value(id_output(id, id_type))))
            }))
        }
    }
}

/// Resolver for `TMutation.update`.
pub struct UpdateResolver;

impl UpdateResolver {
    /// Creates a resolver updating an existing record.
    ///
    /// A missing record fails with a `RECORD_NOT_FOUND` error.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let id = required_id_argument(&ctx, binding.id_field())?;
                let data = data_argument(&ctx)?;

                debug!(type_name = %binding.type_name(), id = %id, "Resolving update");

                let collection = binding.collection(&ctx).await?;
                let updated = binding
                    .operations
                    .update(collection.as_ref(), &id, data)
                    .await?;
                Ok(Some(FieldValue::value(Value::Boolean(updated))))
            }))
        }
    }
}

/// Resolver for `TMutation.upsert`.
pub struct UpsertResolver;

impl UpsertResolver {
    /// Creates a resolver creating or replacing a record.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let id = required_id_argument(&ctx, binding.id_field())?;
                let data = data_argument(&ctx)?;

                debug!(type_name = %binding.type_name(), id = %id, "Resolving upsert");

                let collection = binding.collection(&ctx).await?;
                let upserted = binding
                    .operations
                    .upsert(collection.as_ref(), &id, data)
                    .await?;
                Ok(Some(FieldValue::value(Value::Boolean(upserted))))
            }))
        }
    }
}

/// Resolver for `TMutation.delete`.
pub struct DeleteResolver;

impl DeleteResolver {
    /// Creates a resolver deleting a record.
    pub fn resolve(
        binding: Arc<RootBinding>,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let binding = binding.clone();
            FieldFuture::new(respond(async move {
                let id = required_id_argument(&ctx, binding.id_field())?;

                debug!(type_name = %binding.type_name(), id = %id, "Resolving delete");

                let collection = binding.collection(&ctx).await?;
                let deleted = binding
                    .operations
                    .delete(collection.as_ref(), &id)
                    .await?;
                Ok(Some(FieldValue::value(Value::Boolean(deleted))))
            }))
        }
    }
}
