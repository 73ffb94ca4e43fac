//! Root type introspection: identifier selection and field extraction.

use std::sync::Arc;

use async_graphql_parser::types::{BaseType, FieldDefinition, TypeDefinition, TypeKind};
use tracing::trace;

use super::field_type::{FieldType, TypeIndex};
use crate::error::SchemaError;

/// Picks the identifier field of a root type, replacing the default policy.
///
/// The returned name is trusted without type validation.
pub type IdFieldSelector = Arc<dyn Fn(&TypeDefinition) -> Option<String> + Send + Sync>;

/// One non-identifier field of a root type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name.
    pub name: String,
    /// Resolved field type.
    pub field_type: FieldType,
    /// Field description.
    pub description: Option<String>,
}

/// A root type, split into identifier and data fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// Root type name.
    pub type_name: String,
    /// Identifier field name.
    pub id_field_name: String,
    /// Identifier field type as declared.
    pub id_field_type: FieldType,
    /// Every other field, in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Returns the data field named `name`.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Returns the object fields of a definition, or `None` for other kinds.
pub fn object_fields(
    definition: &TypeDefinition,
) -> Option<&[async_graphql_parser::Positioned<FieldDefinition>]> {
    match &definition.kind {
        TypeKind::Object(object) => Some(&object.fields),
        _ => None,
    }
}

fn is_non_null_id(field: &FieldDefinition) -> bool {
    let ty = &field.ty.node;
    !ty.nullable && matches!(&ty.base, BaseType::Named(name) if name.as_str() == "ID")
}

/// The default identifier policy: the first field typed exactly `ID!`.
pub fn first_non_null_id_field(definition: &TypeDefinition) -> Option<String> {
    object_fields(definition)?
        .iter()
        .find(|field| is_non_null_id(&field.node))
        .map(|field| field.node.name.node.to_string())
}

/// Resolves a field's type, naming the field in the error.
pub(crate) fn resolve_field_type(
    type_name: &str,
    field: &FieldDefinition,
    index: &TypeIndex,
) -> Result<FieldType, SchemaError> {
    FieldType::resolve(&field.ty.node, index).map_err(|missing| SchemaError::UnknownType {
        type_name: missing,
        referenced_by: format!("{}.{}", type_name, field.name.node),
    })
}

/// Derives the descriptor of a root type.
///
/// # Errors
///
/// - `UnknownRootType` if `definition` is not an object type
/// - `NoIdentifierField` if no identifier is selected
/// - `UnknownIdentifierField` if the selected identifier is not declared
/// - `UnknownType` if a field references an undeclared type
pub fn introspect(
    definition: &TypeDefinition,
    index: &TypeIndex,
    selector: Option<&IdFieldSelector>,
) -> Result<TypeDescriptor, SchemaError> {
    let type_name = definition.name.node.to_string();
    let Some(fields) = object_fields(definition) else {
        return Err(SchemaError::UnknownRootType { type_name });
    };

    let id_field_name = match selector {
        Some(selector) => selector(definition),
        None => first_non_null_id_field(definition),
    }
    .ok_or_else(|| SchemaError::NoIdentifierField {
        type_name: type_name.clone(),
    })?;

    let id_field = fields
        .iter()
        .find(|field| field.node.name.node.as_str() == id_field_name)
        .ok_or_else(|| SchemaError::UnknownIdentifierField {
            type_name: type_name.clone(),
            field: id_field_name.clone(),
        })?;
    let id_field_type = resolve_field_type(&type_name, &id_field.node, index)?;

    let fields = fields
        .iter()
        .filter(|field| field.node.name.node.as_str() != id_field_name)
        .map(|field| {
            Ok(FieldDescriptor {
                name: field.node.name.node.to_string(),
                field_type: resolve_field_type(&type_name, &field.node, index)?,
                description: field.node.description.as_ref().map(|d| d.node.clone()),
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    trace!(
        type_name = %type_name,
        id_field = %id_field_name,
        fields = fields.len(),
        "Introspected root type"
    );

    Ok(TypeDescriptor {
        type_name,
        id_field_name,
        id_field_type,
        fields,
    })
}
