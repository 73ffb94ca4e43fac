//! Constructors for type-system AST nodes.
//!
//! Synthesized definitions carry no source position; every node is wrapped
//! with `Pos::default()`.

use async_graphql_parser::types::{
    BaseType, EnumType, EnumValueDefinition, FieldDefinition, InputObjectType,
    InputValueDefinition, ObjectType, ServiceDocument, Type, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};
use async_graphql_parser::{Pos, Positioned};
use async_graphql_value::Name;

/// Wraps a node without source position.
pub fn positioned<T>(node: T) -> Positioned<T> {
    Positioned::new(node, Pos::default())
}

/// Creates a positioned name.
pub fn name(value: &str) -> Positioned<Name> {
    positioned(Name::new(value))
}

/// Parses a type reference such as `[WidgetEdge!]!`.
///
/// Only used with literals built by this crate; malformed input yields a
/// nullable named type of the raw text.
pub fn type_ref(value: &str) -> Type {
    Type::new(value).unwrap_or_else(|| named_type(value, true))
}

/// A named type reference.
pub fn named_type(type_name: &str, nullable: bool) -> Type {
    Type {
        base: BaseType::Named(Name::new(type_name)),
        nullable,
    }
}

/// A field definition.
pub fn field(field_name: &str, ty: Type) -> Positioned<FieldDefinition> {
    positioned(FieldDefinition {
        description: None,
        name: name(field_name),
        arguments: Vec::new(),
        ty: positioned(ty),
        directives: Vec::new(),
    })
}

/// A field definition with arguments.
pub fn field_with_args(
    field_name: &str,
    ty: Type,
    arguments: Vec<Positioned<InputValueDefinition>>,
) -> Positioned<FieldDefinition> {
    let mut definition = field(field_name, ty);
    definition.node.arguments = arguments;
    definition
}

/// An argument or input field definition.
pub fn input_value(value_name: &str, ty: Type) -> Positioned<InputValueDefinition> {
    positioned(InputValueDefinition {
        description: None,
        name: name(value_name),
        ty: positioned(ty),
        default_value: None,
        directives: Vec::new(),
    })
}

fn type_definition(type_name: &str, kind: TypeKind) -> TypeSystemDefinition {
    TypeSystemDefinition::Type(positioned(TypeDefinition {
        extend: false,
        description: None,
        name: name(type_name),
        directives: Vec::new(),
        kind,
    }))
}

/// An object type definition.
pub fn object_type(
    type_name: &str,
    fields: Vec<Positioned<FieldDefinition>>,
) -> TypeSystemDefinition {
    type_definition(
        type_name,
        TypeKind::Object(ObjectType {
            implements: Vec::new(),
            fields,
        }),
    )
}

/// An input object type definition.
pub fn input_object_type(
    type_name: &str,
    fields: Vec<Positioned<InputValueDefinition>>,
) -> TypeSystemDefinition {
    type_definition(type_name, TypeKind::InputObject(InputObjectType { fields }))
}

/// An enum type definition.
pub fn enum_type(type_name: &str, values: &[&str]) -> TypeSystemDefinition {
    let values = values
        .iter()
        .map(|value| {
            positioned(EnumValueDefinition {
                description: None,
                value: name(value),
                directives: Vec::new(),
            })
        })
        .collect();
    type_definition(type_name, TypeKind::Enum(EnumType { values }))
}

/// Returns the merge key of a definition: the type name, `@name` for
/// directives, `None` for `schema { ... }` blocks.
pub fn definition_name(definition: &TypeSystemDefinition) -> Option<String> {
    match definition {
        TypeSystemDefinition::Type(ty) => Some(ty.node.name.node.to_string()),
        TypeSystemDefinition::Directive(directive) => {
            Some(format!("@{}", directive.node.name.node))
        }
        TypeSystemDefinition::Schema(_) => None,
    }
}

/// Finds the type definition named `type_name`.
pub fn find_type<'a>(
    document: &'a ServiceDocument,
    type_name: &str,
) -> Option<&'a TypeDefinition> {
    document
        .definitions
        .iter()
        .find_map(|definition| match definition {
            TypeSystemDefinition::Type(ty) if ty.node.name.node.as_str() == type_name => {
                Some(&ty.node)
            }
            _ => None,
        })
}

/// Returns a short label for a definition's kind.
pub fn definition_kind(definition: &TypeSystemDefinition) -> &'static str {
    match definition {
        TypeSystemDefinition::Schema(_) => "schema",
        TypeSystemDefinition::Directive(_) => "directive",
        TypeSystemDefinition::Type(ty) => match ty.node.kind {
            TypeKind::Scalar => "scalar",
            TypeKind::Object(_) => "object",
            TypeKind::Interface(_) => "interface",
            TypeKind::Union(_) => "union",
            TypeKind::Enum(_) => "enum",
            TypeKind::InputObject(_) => "input object",
        },
    }
}
