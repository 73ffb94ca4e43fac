use async_graphql::Value;
use async_graphql::dynamic::{FieldFuture, FieldValue, ResolverContext};

use super::output_value;
use crate::schema::FieldType;

/// Resolver for the `Query.t`/`Mutation.t` entry points.
///
/// Returns an empty object so that the `TQuery`/`TMutation` fields below it
/// are resolved.
pub struct EntryPointResolver;

impl EntryPointResolver {
    pub fn resolve() -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        |_ctx| {
            FieldFuture::new(async move {
                Ok(Some(FieldValue::value(Value::Object(Default::default()))))
            })
        }
    }
}

/// Resolver for plain object fields, reading the field from the parent value.
pub struct DataFieldResolver;

impl DataFieldResolver {
    /// Creates a resolver for `field_name` of type `field_type`. A missing
    /// key resolves to `null`.
    pub fn resolve(
        field_name: String,
        field_type: FieldType,
    ) -> impl Fn(ResolverContext<'_>) -> FieldFuture<'_> + Send + Sync + Clone {
        move |ctx| {
            let field_name = field_name.clone();
            let field_type = field_type.clone();
            FieldFuture::new(async move {
                let value = match ctx.parent_value.as_value() {
                    Some(Value::Object(object)) => object.get(field_name.as_str()).cloned(),
                    _ => None,
                };
                Ok(value.map(|value| output_value(value, &field_type)))
            })
        }
    }
}
