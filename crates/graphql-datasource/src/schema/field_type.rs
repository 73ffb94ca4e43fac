//! Resolved field types.
//!
//! The parser's [`Type`] only carries names. [`FieldType`] records what kind
//! of definition each name refers to, so synthesis can match exhaustively.

use std::collections::HashMap;

use async_graphql_parser::types::{BaseType, ServiceDocument, Type, TypeKind, TypeSystemDefinition};

use crate::document::ast::named_type;

/// Built-in scalars that need no declaration.
pub const BUILTIN_SCALARS: [&str; 5] = ["Int", "Float", "String", "Boolean", "ID"];

/// The kind of a named type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedKind {
    /// Built-in or custom scalar.
    Scalar,
    /// Enum type.
    Enum,
    /// Object type.
    Object,
    /// Input object type.
    Input,
    /// Interface or union.
    Abstract,
}

/// Name-to-kind index of a document.
#[derive(Debug, Clone)]
pub struct TypeIndex {
    kinds: HashMap<String, NamedKind>,
}

impl TypeIndex {
    /// Indexes every type definition of `document` plus the built-in scalars.
    pub fn new(document: &ServiceDocument) -> Self {
        let kinds = BUILTIN_SCALARS
            .iter()
            .map(|name| (name.to_string(), NamedKind::Scalar))
            .collect();
        let mut index = Self { kinds };
        index.include(document);
        index
    }

    /// Adds the type definitions of `document`, replacing same-named entries.
    pub fn include(&mut self, document: &ServiceDocument) {
        for definition in &document.definitions {
            let TypeSystemDefinition::Type(ty) = definition else {
                continue;
            };
            let kind = match ty.node.kind {
                TypeKind::Scalar => NamedKind::Scalar,
                TypeKind::Object(_) => NamedKind::Object,
                TypeKind::Interface(_) | TypeKind::Union(_) => NamedKind::Abstract,
                TypeKind::Enum(_) => NamedKind::Enum,
                TypeKind::InputObject(_) => NamedKind::Input,
            };
            self.kinds.insert(ty.node.name.node.to_string(), kind);
        }
    }

    /// Returns the kind of `name`, if declared.
    pub fn kind(&self, name: &str) -> Option<NamedKind> {
        self.kinds.get(name).copied()
    }

    /// Returns `true` if `name` is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }
}

/// A field type with every named reference resolved to its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// Scalar type.
    Scalar(String),
    /// Enum type.
    Enum(String),
    /// Object type.
    Object(String),
    /// Input object type.
    Input(String),
    /// Interface or union type.
    Abstract(String),
    /// List of the inner type.
    List(Box<FieldType>),
    /// Non-null wrapper.
    NonNull(Box<FieldType>),
}

impl FieldType {
    /// Resolves a parser type against `index`.
    ///
    /// # Errors
    ///
    /// Returns the first undeclared type name.
    pub fn resolve(ty: &Type, index: &TypeIndex) -> Result<Self, String> {
        let inner = match &ty.base {
            BaseType::Named(name) => {
                let name = name.to_string();
                match index.kind(&name) {
                    Some(NamedKind::Scalar) => Self::Scalar(name),
                    Some(NamedKind::Enum) => Self::Enum(name),
                    Some(NamedKind::Object) => Self::Object(name),
                    Some(NamedKind::Input) => Self::Input(name),
                    Some(NamedKind::Abstract) => Self::Abstract(name),
                    None => return Err(name),
                }
            }
            BaseType::List(element) => Self::List(Box::new(Self::resolve(element, index)?)),
        };

        Ok(if ty.nullable {
            inner
        } else {
            Self::NonNull(Box::new(inner))
        })
    }

    /// Converts back to a parser type.
    pub fn to_type(&self) -> Type {
        match self {
            Self::NonNull(inner) => Type {
                nullable: false,
                ..inner.to_type()
            },
            Self::List(inner) => Type {
                base: BaseType::List(Box::new(inner.to_type())),
                nullable: true,
            },
            Self::Scalar(name)
            | Self::Enum(name)
            | Self::Object(name)
            | Self::Input(name)
            | Self::Abstract(name) => named_type(name, true),
        }
    }

    /// Wraps in non-null unless already non-null.
    #[must_use]
    pub fn non_null(self) -> Self {
        match self {
            Self::NonNull(_) => self,
            other => Self::NonNull(Box::new(other)),
        }
    }

    /// Strips one outer non-null wrapper.
    #[must_use]
    pub fn nullable(self) -> Self {
        match self {
            Self::NonNull(inner) => *inner,
            other => other,
        }
    }

    /// Returns `true` for an outer non-null wrapper.
    pub fn is_non_null(&self) -> bool {
        matches!(self, Self::NonNull(_))
    }

    /// Returns the innermost named type.
    pub fn base_name(&self) -> &str {
        match self {
            Self::List(inner) | Self::NonNull(inner) => inner.base_name(),
            Self::Scalar(name)
            | Self::Enum(name)
            | Self::Object(name)
            | Self::Input(name)
            | Self::Abstract(name) => name,
        }
    }

    /// Returns the kind of the innermost named type.
    pub fn base_kind(&self) -> NamedKind {
        match self {
            Self::List(inner) | Self::NonNull(inner) => inner.base_kind(),
            Self::Scalar(_) => NamedKind::Scalar,
            Self::Enum(_) => NamedKind::Enum,
            Self::Object(_) => NamedKind::Object,
            Self::Input(_) => NamedKind::Input,
            Self::Abstract(_) => NamedKind::Abstract,
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql_parser::parse_schema;

    fn index() -> TypeIndex {
        TypeIndex::new(
            &parse_schema(
                "type Widget { id: ID! }\n\
                 enum Size { S }\n\
                 input Filter { x: Int }\n\
                 interface Node { id: ID! }\n\
                 union Thing = Widget\n\
                 scalar Url",
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_resolve_kinds() {
        let index = index();
        let resolve = |s: &str| FieldType::resolve(&Type::new(s).unwrap(), &index);

        assert_eq!(resolve("Url").unwrap(), FieldType::Scalar("Url".into()));
        assert_eq!(resolve("Size").unwrap(), FieldType::Enum("Size".into()));
        assert_eq!(resolve("Filter").unwrap(), FieldType::Input("Filter".into()));
        assert_eq!(resolve("Thing").unwrap(), FieldType::Abstract("Thing".into()));
        assert_eq!(resolve("Node").unwrap().base_kind(), NamedKind::Abstract);
        assert_eq!(
            resolve("[Widget!]!").unwrap(),
            FieldType::NonNull(Box::new(FieldType::List(Box::new(FieldType::NonNull(
                Box::new(FieldType::Object("Widget".into()))
            )))))
        );
        assert_eq!(resolve("Gadget").unwrap_err(), "Gadget");
    }

    #[test]
    fn test_type_conversion() {
        let index = index();
        for text in ["ID!", "[Widget!]!", "[[Int]!]", "Size"] {
            let field_type = FieldType::resolve(&Type::new(text).unwrap(), &index).unwrap();
            assert_eq!(field_type.to_string(), text);
        }
    }

    #[test]
    fn test_nullability_helpers() {
        let ty = FieldType::Scalar("Int".into());
        assert!(ty.clone().non_null().is_non_null());
        assert_eq!(ty.clone().non_null().non_null().nullable(), ty);
        assert_eq!(ty.clone().nullable(), ty);
        assert_eq!(FieldType::List(Box::new(ty.non_null())).base_name(), "Int");
    }
}
