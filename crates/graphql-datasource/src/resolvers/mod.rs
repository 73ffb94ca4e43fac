//! Resolvers bound to collections.
//!
//! This module provides the resolver implementations for the generated fields:
//! - `query`: `TQuery.find` and `TQuery.list`
//! - `mutation`: `TMutation.create`, `update`, `upsert` and `delete`
//! - `field`: entry points and data fields read from the parent record

mod field;
mod mutation;
mod operations;
mod pagination;
mod query;
mod source;
mod timestamps;

pub use field::{DataFieldResolver, EntryPointResolver};
pub use mutation::{CreateResolver, DeleteResolver, UpdateResolver, UpsertResolver};
pub use operations::CollectionOperations;
pub use pagination::{ListArguments, clamp_page_size};
pub use query::{FindResolver, ListResolver};
pub use source::{CollectionSource, RequestCollections, RootBinding};
pub use timestamps::{Clock, SystemClock, timestamp_millis};

use std::future::Future;

use async_graphql::dynamic::{FieldValue, ResolverContext, ValueAccessor};
use async_graphql::{ErrorExtensions, Name, Value};

use crate::error::ResolverError;
use crate::schema::FieldType;

/// Awaits a resolver body and attaches the `code` extension to its error.
pub(crate) async fn respond<'a, F>(body: F) -> async_graphql::Result<Option<FieldValue<'a>>>
where
    F: Future<Output = Result<Option<FieldValue<'a>>, ResolverError>>,
{
    body.await.map_err(|e| e.extend())
}

/// Convert a serde_json::Value to async_graphql::Value.
pub(crate) fn json_to_graphql_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Number(i.into())
            } else if let Some(u) = n.as_u64() {
                Value::Number(u.into())
            } else if let Some(f) = n.as_f64() {
                async_graphql::Number::from_f64(f).map_or(Value::Null, Value::Number)
            } else {
                Value::Null
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(arr) => {
            Value::List(arr.into_iter().map(json_to_graphql_value).collect())
        }
        serde_json::Value::Object(obj) => Value::Object(
            obj.into_iter()
                .map(|(k, v)| (Name::new(k), json_to_graphql_value(v)))
                .collect(),
        ),
    }
}

/// Converts an argument value to serde_json::Value. Enum values become strings.
pub(crate) fn value_accessor_to_json(value: &ValueAccessor<'_>) -> serde_json::Value {
    if value.is_null() {
        return serde_json::Value::Null;
    }
    if let Ok(b) = value.boolean() {
        return serde_json::Value::Bool(b);
    }
    if let Ok(i) = value.i64() {
        return serde_json::Value::Number(i.into());
    }
    if let Ok(f) = value.f64() {
        return serde_json::json!(f);
    }
    if let Ok(s) = value.string() {
        return serde_json::Value::String(s.to_string());
    }
    if let Ok(e) = value.enum_name() {
        return serde_json::Value::String(e.to_string());
    }
    if let Ok(list) = value.list() {
        return serde_json::Value::Array(list.iter().map(|v| value_accessor_to_json(&v)).collect());
    }
    if let Ok(obj) = value.object() {
        let map = obj
            .iter()
            .map(|(k, v)| (k.to_string(), value_accessor_to_json(&v)))
            .collect();
        return serde_json::Value::Object(map);
    }
    serde_json::Value::Null
}

/// Reads an identifier argument, accepting string and integer ids.
pub(crate) fn id_argument(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<String>, ResolverError> {
    let Some(value) = ctx.args.get(name) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    if let Ok(s) = value.string() {
        return Ok(Some(s.to_string()));
    }
    if let Ok(i) = value.i64() {
        return Ok(Some(i.to_string()));
    }
    Err(ResolverError::invalid_argument(
        name,
        "expected a string or integer identifier",
    ))
}

/// Reads a required identifier argument.
pub(crate) fn required_id_argument(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<String, ResolverError> {
    id_argument(ctx, name)?.ok_or_else(|| ResolverError::MissingArgument(name.to_string()))
}

/// Converts a stored identifier to the output value of the identifier type.
pub(crate) fn id_output(id: String, id_type: &FieldType) -> Value {
    if id_type.base_name() == "Int"
        && let Ok(number) = id.parse::<i64>()
    {
        return Value::Number(number.into());
    }
    Value::String(id)
}

/// Shapes a stored value for a field of type `field_type`: enum strings
/// become enum values, numeric strings in `Int` fields become numbers and
/// interface/union values are tagged with their `__typename`.
pub(crate) fn output_value(value: Value, field_type: &FieldType) -> FieldValue<'static> {
    match (field_type, value) {
        (_, Value::Null) => FieldValue::NULL,
        (FieldType::NonNull(inner), value) => output_value(value, inner),
        (FieldType::List(inner), Value::List(items)) => {
            FieldValue::list(items.into_iter().map(|item| output_value(item, inner)))
        }
        (FieldType::Enum(_), Value::String(s)) => FieldValue::value(Value::Enum(Name::new(s))),
        (FieldType::Scalar(name), Value::String(s)) if name == "Int" => {
            FieldValue::value(id_output(s, field_type))
        }
        (FieldType::Abstract(_), Value::Object(object)) => {
            let type_name = match object.get("__typename") {
                Some(Value::String(s)) => Some(s.clone()),
                _ => None,
            };
            let value = FieldValue::value(Value::Object(object));
            match type_name {
                Some(type_name) => value.with_type(type_name),
                None => value,
            }
        }
        (_, value) => FieldValue::value(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_graphql_value_primitives() {
        assert!(matches!(json_to_graphql_value(json!(null)), Value::Null));
        assert!(matches!(json_to_graphql_value(json!(true)), Value::Boolean(true)));
        assert!(matches!(json_to_graphql_value(json!(42)), Value::Number(_)));
        assert!(matches!(json_to_graphql_value(json!(1.5)), Value::Number(_)));
        assert!(matches!(json_to_graphql_value(json!("hello")), Value::String(s) if s == "hello"));
    }

    #[test]
    fn test_json_to_graphql_value_complex() {
        let arr = json_to_graphql_value(json!([1, 2, 3]));
        assert!(matches!(arr, Value::List(items) if items.len() == 3));

        let obj = json_to_graphql_value(json!({"name": "sprocket"}));
        let Value::Object(map) = obj else {
            panic!("expected object");
        };
        assert_eq!(map.get("name"), Some(&Value::from("sprocket")));
    }

    #[test]
    fn test_id_output() {
        let int_id = FieldType::Scalar("Int".into()).non_null();
        assert_eq!(id_output("7".into(), &int_id), Value::Number(7.into()));
        assert_eq!(id_output("x".into(), &int_id), Value::from("x"));

        let id = FieldType::Scalar("ID".into()).non_null();
        assert_eq!(id_output("7".into(), &id), Value::from("7"));
    }

    #[test]
    fn test_output_value_enum() {
        let ty = FieldType::Enum("Size".into());
        let value = output_value(Value::from("LARGE"), &ty);
        assert_eq!(value.as_value(), Some(&Value::Enum(Name::new("LARGE"))));
        assert!(output_value(Value::Null, &ty).as_value().is_none_or(|v| *v == Value::Null));
    }

    #[test]
    fn test_output_value_int_identifier() {
        let ty = FieldType::Scalar("Int".into()).non_null();
        let value = output_value(Value::from("12"), &ty);
        assert_eq!(value.as_value(), Some(&Value::Number(12.into())));
    }
}
