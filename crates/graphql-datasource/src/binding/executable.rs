//! Conversion of the final document into an executable dynamic schema.

use async_graphql::dynamic::{
    Enum, EnumItem, Field, InputObject, InputValue, Interface, InterfaceField, Object, Scalar,
    Schema, SchemaBuilder, TypeRef, Union,
};
use async_graphql_parser::types::{
    BaseType, FieldDefinition, InputValueDefinition, ServiceDocument, Type, TypeDefinition,
    TypeKind, TypeSystemDefinition,
};
use tracing::{debug, trace};

use super::ResolverMap;
use crate::config::DataSourceConfig;
use crate::document::ast::find_type;
use crate::error::SchemaError;
use crate::resolvers::DataFieldResolver;
use crate::schema::{BUILTIN_SCALARS, TypeIndex, resolve_field_type};

const QUERY: &str = "Query";
const MUTATION: &str = "Mutation";
const SUBSCRIPTION: &str = "Subscription";

/// Builds the executable schema for `document`.
///
/// Fields with an entry in `resolvers` use it; every other object field
/// reads its value from the parent record. Subscription types and directive
/// definitions are not registered.
///
/// # Errors
///
/// Returns `SchemaError::SchemaBuildFailed` if the document is not a valid
/// executable schema, e.g. when it has no `Query` type.
pub fn build_executable(
    document: &ServiceDocument,
    resolvers: &ResolverMap,
    config: &DataSourceConfig,
) -> Result<Schema, SchemaError> {
    let index = TypeIndex::new(document);
    let mutation = find_type(document, MUTATION).map(|_| MUTATION);
    let mut builder = Schema::build(QUERY, mutation, None);

    for definition in &document.definitions {
        match definition {
            TypeSystemDefinition::Type(ty) => {
                if ty.node.name.node.as_str() == SUBSCRIPTION {
                    debug!("Skipping Subscription type");
                    continue;
                }
                builder = register(builder, &ty.node, resolvers, &index)?;
            }
            TypeSystemDefinition::Directive(directive) => {
                trace!(directive = %directive.node.name.node, "Skipping directive definition");
            }
            TypeSystemDefinition::Schema(_) => {}
        }
    }

    builder = builder
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity);
    if !config.introspection {
        builder = builder.disable_introspection();
    }

    builder
        .finish()
        .map_err(|e| SchemaError::SchemaBuildFailed(e.to_string()))
}

fn register(
    builder: SchemaBuilder,
    definition: &TypeDefinition,
    resolvers: &ResolverMap,
    index: &TypeIndex,
) -> Result<SchemaBuilder, SchemaError> {
    let name = definition.name.node.as_str();
    let description = definition.description.as_ref().map(|d| d.node.clone());

    let builder = match &definition.kind {
        TypeKind::Scalar => {
            if BUILTIN_SCALARS.contains(&name) {
                return Ok(builder);
            }
            let mut scalar = Scalar::new(name);
            if let Some(description) = description {
                scalar = scalar.description(description);
            }
            builder.register(scalar)
        }
        TypeKind::Enum(enum_type) => {
            let mut ty = Enum::new(name);
            for value in &enum_type.values {
                let mut item = EnumItem::new(value.node.value.node.as_str());
                if let Some(d) = &value.node.description {
                    item = item.description(d.node.clone());
                }
                ty = ty.item(item);
            }
            if let Some(description) = description {
                ty = ty.description(description);
            }
            builder.register(ty)
        }
        TypeKind::InputObject(input) => {
            let mut ty = InputObject::new(name);
            for value in &input.fields {
                ty = ty.field(input_value(&value.node));
            }
            if let Some(description) = description {
                ty = ty.description(description);
            }
            builder.register(ty)
        }
        TypeKind::Interface(interface) => {
            let mut ty = Interface::new(name);
            for field in &interface.fields {
                ty = ty.field(interface_field(&field.node));
            }
            for implemented in &interface.implements {
                ty = ty.implement(implemented.node.as_str());
            }
            if let Some(description) = description {
                ty = ty.description(description);
            }
            builder.register(ty)
        }
        TypeKind::Union(union) => {
            let mut ty = Union::new(name);
            for member in &union.members {
                ty = ty.possible_type(member.node.as_str());
            }
            if let Some(description) = description {
                ty = ty.description(description);
            }
            builder.register(ty)
        }
        TypeKind::Object(object) => {
            let mut ty = Object::new(name);
            for field in &object.fields {
                ty = ty.field(object_field(name, &field.node, resolvers, index)?);
            }
            for implemented in &object.implements {
                ty = ty.implement(implemented.node.as_str());
            }
            if let Some(description) = description {
                ty = ty.description(description);
            }
            builder.register(ty)
        }
    };

    trace!(type_name = %name, "Registered type");
    Ok(builder)
}

fn object_field(
    type_name: &str,
    definition: &FieldDefinition,
    resolvers: &ResolverMap,
    index: &TypeIndex,
) -> Result<Field, SchemaError> {
    let field_name = definition.name.node.as_str();
    let ty = type_ref(&definition.ty.node);

    let resolver = resolvers
        .get(type_name)
        .and_then(|fields| fields.get(field_name))
        .cloned();
    let mut field = match resolver {
        Some(resolver) => Field::new(field_name, ty, move |ctx| resolver(ctx)),
        None => {
            let field_type = resolve_field_type(type_name, definition, index)?;
            Field::new(
                field_name,
                ty,
                DataFieldResolver::resolve(field_name.to_string(), field_type),
            )
        }
    };

    for argument in &definition.arguments {
        field = field.argument(input_value(&argument.node));
    }
    if let Some(description) = &definition.description {
        field = field.description(description.node.clone());
    }
    Ok(field)
}

fn interface_field(definition: &FieldDefinition) -> InterfaceField {
    let mut field = InterfaceField::new(
        definition.name.node.as_str(),
        type_ref(&definition.ty.node),
    );
    for argument in &definition.arguments {
        field = field.argument(input_value(&argument.node));
    }
    if let Some(description) = &definition.description {
        field = field.description(description.node.clone());
    }
    field
}

fn input_value(definition: &InputValueDefinition) -> InputValue {
    let mut value = InputValue::new(definition.name.node.as_str(), type_ref(&definition.ty.node));
    if let Some(default) = &definition.default_value {
        value = value.default_value(default.node.clone());
    }
    if let Some(description) = &definition.description {
        value = value.description(description.node.clone());
    }
    value
}

/// Converts a parsed type to a dynamic type reference.
pub(crate) fn type_ref(ty: &Type) -> TypeRef {
    let base = match &ty.base {
        BaseType::Named(name) => TypeRef::named(name.to_string()),
        BaseType::List(inner) => TypeRef::List(Box::new(type_ref(inner))),
    };
    if ty.nullable {
        base
    } else {
        TypeRef::NonNull(Box::new(base))
    }
}
