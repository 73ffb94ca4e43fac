//! Derived type synthesis.
//!
//! For every root type `T` the synthesizer emits `TInput`, `TUpdateInput`,
//! `TEdge`, `TConnection`, `TQuery`, `TMutation` and one entry-point field on
//! each of `Query` and `Mutation`. Object-typed fields are derived recursively
//! into `XInput`/`XUpdateInput`.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    BaseType, FieldDefinition, InputValueDefinition, ServiceDocument, TypeDefinition, TypeKind,
    TypeSystemDefinition,
};
use tracing::{trace, warn};

use super::common::Namespace;
use super::field_type::{FieldType, TypeIndex};
use super::introspect::{FieldDescriptor, TypeDescriptor, object_fields, resolve_field_type};
use crate::document::ast::{
    field, field_with_args, find_type, input_object_type, input_value, named_type, object_type,
    positioned, type_ref,
};
use crate::error::SchemaError;
use crate::naming::lower_camel;

/// Server-managed timestamp fields.
pub const TIMESTAMP_FIELDS: [&str; 2] = ["created", "modified"];

/// Names of everything derived from one root type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedNames {
    /// `TInput`
    pub input: String,
    /// `TUpdateInput`
    pub update_input: String,
    /// `TEdge`
    pub edge: String,
    /// `TConnection`
    pub connection: String,
    /// `TQuery`
    pub query: String,
    /// `TMutation`
    pub mutation: String,
    /// Entry-point field name on `Query` and `Mutation`.
    pub entry_field: String,
}

impl DerivedNames {
    /// Derives the names for `type_name`.
    pub fn new(type_name: &str) -> Self {
        Self {
            input: InputShape::Create.input_name(type_name),
            update_input: InputShape::Update.input_name(type_name),
            edge: format!("{type_name}Edge"),
            connection: format!("{type_name}Connection"),
            query: format!("{type_name}Query"),
            mutation: format!("{type_name}Mutation"),
            entry_field: lower_camel(type_name),
        }
    }
}

/// Which input variant is being derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputShape {
    /// Fields keep their declared nullability.
    Create,
    /// Every field is nullable.
    Update,
}

impl InputShape {
    /// `XInput` or `XUpdateInput`.
    pub fn input_name(self, object_name: &str) -> String {
        match self {
            Self::Create => format!("{object_name}Input"),
            Self::Update => format!("{object_name}UpdateInput"),
        }
    }

    fn shape_field(self, field_type: FieldType) -> FieldType {
        match self {
            Self::Create => field_type,
            Self::Update => field_type.nullable(),
        }
    }
}

/// Read-only inputs shared by all root types of one assembly.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisContext<'a> {
    /// The merged working document.
    pub document: &'a ServiceDocument,
    /// Kind index of `document`.
    pub index: &'a TypeIndex,
    /// Names the consumer declared before synthesis.
    pub declared: &'a HashSet<String>,
    /// Descriptors of every root type, by name.
    pub roots: &'a HashMap<String, TypeDescriptor>,
    /// Shared primitive naming.
    pub namespace: &'a Namespace,
    /// Whether timestamp fields are added and excluded from inputs.
    pub timestamps: bool,
}

/// Accumulates synthesized definitions for a set of root types.
pub struct Synthesizer<'a> {
    context: SynthesisContext<'a>,
    emitted: HashSet<String>,
    in_progress: HashSet<String>,
    output: Vec<TypeSystemDefinition>,
    query_entries: Vec<Positioned<FieldDefinition>>,
    mutation_entries: Vec<Positioned<FieldDefinition>>,
}

impl<'a> Synthesizer<'a> {
    /// Creates a synthesizer over `context`.
    pub fn new(context: SynthesisContext<'a>) -> Self {
        Self {
            context,
            emitted: HashSet::new(),
            in_progress: HashSet::new(),
            output: Vec::new(),
            query_entries: Vec::new(),
            mutation_entries: Vec::new(),
        }
    }

    /// Emits every derived definition of one root type.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnknownType` if a nested object field references
    /// an undeclared type.
    pub fn root_type(
        &mut self,
        descriptor: &TypeDescriptor,
        definition: &TypeDefinition,
    ) -> Result<(), SchemaError> {
        let type_name = descriptor.type_name.as_str();
        let names = DerivedNames::new(type_name);

        if self.context.timestamps {
            self.augment_timestamps(definition)?;
        }

        self.derive_input(type_name, InputShape::Create)?;
        self.derive_input(type_name, InputShape::Update)?;
        self.list_types(type_name, &names);
        self.query_type(descriptor, &names);
        self.mutation_type(descriptor, &names);

        trace!(type_name = %type_name, entry = %names.entry_field, "Synthesized root type");
        Ok(())
    }

    /// Returns the synthesized fragment, entry points last.
    pub fn finish(mut self) -> ServiceDocument {
        if !self.query_entries.is_empty() {
            self.output.push(object_type("Query", self.query_entries));
        }
        if !self.mutation_entries.is_empty() {
            self.output.push(object_type("Mutation", self.mutation_entries));
        }
        ServiceDocument {
            definitions: self.output,
        }
    }

    /// Adds `created: Float!`/`modified: Float!` where absent. A declared
    /// timestamp field must be `Float` (either nullability).
    fn augment_timestamps(&mut self, definition: &TypeDefinition) -> Result<(), SchemaError> {
        let mut augmented = definition.clone();
        let TypeKind::Object(object) = &mut augmented.kind else {
            return Ok(());
        };

        let mut added = false;
        for name in TIMESTAMP_FIELDS {
            let declared = object
                .fields
                .iter()
                .find(|f| f.node.name.node.as_str() == name);
            match declared {
                Some(declared) => {
                    let ty = &declared.node.ty.node;
                    let is_float =
                        matches!(&ty.base, BaseType::Named(base) if base.as_str() == "Float");
                    if !is_float {
                        return Err(SchemaError::TimestampFieldConflict {
                            type_name: definition.name.node.to_string(),
                            field: name.to_string(),
                            declared: ty.to_string(),
                        });
                    }
                }
                None => {
                    object.fields.push(field(name, named_type("Float", false)));
                    added = true;
                }
            }
        }

        if added {
            trace!(type_name = %definition.name.node, "Added timestamp fields");
            self.output.push(TypeSystemDefinition::Type(positioned(augmented)));
        }
        Ok(())
    }

    fn is_timestamp(&self, field_name: &str) -> bool {
        self.context.timestamps && TIMESTAMP_FIELDS.contains(&field_name)
    }

    /// Fields an input derived from `object_name` starts from. Root types
    /// contribute their data fields minus timestamps; other objects all of
    /// their declared fields.
    fn source_fields(&self, object_name: &str) -> Result<Vec<FieldDescriptor>, SchemaError> {
        if let Some(root) = self.context.roots.get(object_name) {
            return Ok(root
                .fields
                .iter()
                .filter(|f| !self.is_timestamp(&f.name))
                .cloned()
                .collect());
        }

        let definition = find_type(self.context.document, object_name);
        let Some(fields) = definition.and_then(object_fields) else {
            return Ok(Vec::new());
        };

        fields
            .iter()
            .map(|f| {
                Ok(FieldDescriptor {
                    name: f.node.name.node.to_string(),
                    field_type: resolve_field_type(object_name, &f.node, self.context.index)?,
                    description: f.node.description.as_ref().map(|d| d.node.clone()),
                })
            })
            .collect()
    }

    /// Emits `XInput`/`XUpdateInput` unless it is declared, already emitted or
    /// currently being derived. Returns the input name either way.
    fn derive_input(&mut self, object_name: &str, shape: InputShape) -> Result<String, SchemaError> {
        let input_name = shape.input_name(object_name);
        if self.context.declared.contains(&input_name)
            || self.emitted.contains(&input_name)
            || self.in_progress.contains(&input_name)
        {
            return Ok(input_name);
        }

        self.in_progress.insert(input_name.clone());
        let mut values: Vec<Positioned<InputValueDefinition>> = Vec::new();
        for source in self.source_fields(object_name)? {
            let referenced_by = format!("{object_name}.{}", source.name);
            let Some(input_type) = self.input_type(&source.field_type, shape, &referenced_by)? else {
                continue;
            };
            let mut value = input_value(&source.name, shape.shape_field(input_type).to_type());
            value.node.description = source.description.map(positioned);
            values.push(value);
        }
        self.in_progress.remove(&input_name);

        trace!(input = %input_name, fields = values.len(), "Synthesized input type");
        self.emitted.insert(input_name.clone());
        self.output.push(input_object_type(&input_name, values));
        Ok(input_name)
    }

    /// Maps an output field type to its input counterpart. `None` means the
    /// field cannot be expressed as input.
    fn input_type(
        &mut self,
        field_type: &FieldType,
        shape: InputShape,
        referenced_by: &str,
    ) -> Result<Option<FieldType>, SchemaError> {
        match field_type {
            FieldType::NonNull(inner) => {
                if let FieldType::Object(name) = inner.as_ref()
                    && self.in_progress.contains(&shape.input_name(name))
                {
                    trace!(field = %referenced_by, "Relaxed non-null back-reference");
                    return Ok(Some(FieldType::Input(shape.input_name(name))));
                }
                Ok(self
                    .input_type(inner, shape, referenced_by)?
                    .map(FieldType::non_null))
            }
            FieldType::List(inner) => Ok(self
                .input_type(inner, shape, referenced_by)?
                .map(|element| FieldType::List(Box::new(element)))),
            FieldType::Object(name) => Ok(Some(FieldType::Input(self.derive_input(name, shape)?))),
            FieldType::Abstract(name) => {
                warn!(
                    field = %referenced_by,
                    type_name = %name,
                    "Omitting interface or union field from derived input"
                );
                Ok(None)
            }
            FieldType::Scalar(_) | FieldType::Enum(_) | FieldType::Input(_) => {
                Ok(Some(field_type.clone()))
            }
        }
    }

    fn list_types(&mut self, type_name: &str, names: &DerivedNames) {
        self.output.push(object_type(
            &names.edge,
            vec![
                field("node", named_type(type_name, false)),
                field("cursor", named_type("ID", false)),
            ],
        ));
        self.output.push(object_type(
            &names.connection,
            vec![
                field("edges", type_ref(&format!("[{}!]!", names.edge))),
                field(
                    "pageInfo",
                    named_type(&self.context.namespace.page_info(), false),
                ),
            ],
        ));
    }

    fn query_type(&mut self, descriptor: &TypeDescriptor, names: &DerivedNames) {
        let namespace = self.context.namespace;
        let id_type = descriptor.id_field_type.to_type();

        let find = field_with_args(
            "find",
            named_type(&descriptor.type_name, true),
            vec![input_value(&descriptor.id_field_name, id_type)],
        );
        let list = field_with_args(
            "list",
            named_type(&names.connection, true),
            vec![
                input_value("before", named_type("ID", true)),
                input_value("after", named_type("ID", true)),
                input_value("first", named_type("Int", true)),
                input_value("last", named_type("Int", true)),
                input_value("order", type_ref(&format!("[{}!]", namespace.order_input()))),
                input_value(
                    "filter",
                    type_ref(&format!("[{}!]", namespace.filter_input())),
                ),
            ],
        );

        self.output.push(object_type(&names.query, vec![find, list]));
        self.query_entries.push(field(
            &names.entry_field,
            named_type(&names.query, true),
        ));
    }

    fn mutation_type(&mut self, descriptor: &TypeDescriptor, names: &DerivedNames) {
        let id_name = descriptor.id_field_name.as_str();
        let id_type = descriptor.id_field_type.clone();
        let boolean = || named_type("Boolean", true);

        let create = field_with_args(
            "create",
            id_type.clone().non_null().to_type(),
            vec![
                input_value(id_name, id_type.clone().nullable().to_type()),
                input_value("data", named_type(&names.input, false)),
            ],
        );
        let update = field_with_args(
            "update",
            boolean(),
            vec![
                input_value(id_name, id_type.to_type()),
                input_value("data", named_type(&names.update_input, false)),
            ],
        );
        let upsert = field_with_args(
            "upsert",
            boolean(),
            vec![
                input_value(id_name, id_type.to_type()),
                input_value("data", named_type(&names.input, false)),
            ],
        );
        let delete = field_with_args(
            "delete",
            boolean(),
            vec![input_value(id_name, id_type.to_type())],
        );

        self.output.push(object_type(
            &names.mutation,
            vec![create, update, upsert, delete],
        ));
        self.mutation_entries.push(field(
            &names.entry_field,
            named_type(&names.mutation, true),
        ));
    }
}
