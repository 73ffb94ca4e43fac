//! Integration tests for schema derivation.
//!
//! These tests run the full assembly pipeline over SDL fragments and inspect
//! the derived definitions in the final document.

use std::collections::HashSet;
use std::sync::Arc;

use async_graphql_parser::types::{TypeDefinition, TypeKind};
use graphql_datasource::document::ast::definition_name;
use graphql_datasource::document::{load_schema_dir, print_document};
use graphql_datasource::schema::IdFieldSelector;
use graphql_datasource::{AssembledSchema, DataSourceConfig, SchemaAssembler, SchemaError};

// =============================================================================
// Helpers
// =============================================================================

const WIDGET: &str = r#"
    enum Size { SMALL LARGE }

    type Widget {
        id: ID!
        name: String!
        weight: Int
        size: Size
        tags: [String!]
    }
"#;

fn assemble(config: &DataSourceConfig, sdl: &str, roots: &[&str]) -> AssembledSchema {
    SchemaAssembler::new(config)
        .fragment(sdl)
        .root_types(roots.iter().copied())
        .assemble()
        .expect("assembly should succeed")
}

/// `(field, type)` pairs of an object or input object, in declaration order.
fn fields(schema: &AssembledSchema, type_name: &str) -> Vec<(String, String)> {
    let definition = schema
        .type_definition(type_name)
        .unwrap_or_else(|| panic!("type {type_name} should exist"));
    match &definition.kind {
        TypeKind::Object(object) => object
            .fields
            .iter()
            .map(|f| (f.node.name.node.to_string(), f.node.ty.node.to_string()))
            .collect(),
        TypeKind::InputObject(input) => input
            .fields
            .iter()
            .map(|f| (f.node.name.node.to_string(), f.node.ty.node.to_string()))
            .collect(),
        _ => panic!("{type_name} is not an object or input type"),
    }
}

fn field_type(schema: &AssembledSchema, type_name: &str, field_name: &str) -> Option<String> {
    fields(schema, type_name)
        .into_iter()
        .find(|(name, _)| name == field_name)
        .map(|(_, ty)| ty)
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.to_string()))
        .collect()
}

// =============================================================================
// Derived types
// =============================================================================

#[test]
fn test_derives_crud_types() {
    let schema = assemble(&DataSourceConfig::default(), WIDGET, &["Widget"]);

    assert_eq!(
        fields(&schema, "WidgetInput"),
        pairs(&[
            ("name", "String!"),
            ("weight", "Int"),
            ("size", "Size"),
            ("tags", "[String!]"),
        ])
    );
    assert_eq!(
        fields(&schema, "WidgetEdge"),
        pairs(&[("node", "Widget!"), ("cursor", "ID!")])
    );
    assert_eq!(
        fields(&schema, "WidgetConnection"),
        pairs(&[("edges", "[WidgetEdge!]!"), ("pageInfo", "DataSourcePageInfo!")])
    );
    assert_eq!(
        fields(&schema, "WidgetQuery"),
        pairs(&[("find", "Widget"), ("list", "WidgetConnection")])
    );
    assert_eq!(
        fields(&schema, "WidgetMutation"),
        pairs(&[
            ("create", "ID!"),
            ("update", "Boolean"),
            ("upsert", "Boolean"),
            ("delete", "Boolean"),
        ])
    );
    assert_eq!(field_type(&schema, "Query", "widget").as_deref(), Some("WidgetQuery"));
    assert_eq!(
        field_type(&schema, "Mutation", "widget").as_deref(),
        Some("WidgetMutation")
    );

    for shared in [
        "DataSourceFilterOperation",
        "DataSourceOrderInput",
        "DataSourceFilterInput",
        "DataSourcePageInfo",
    ] {
        assert!(schema.type_definition(shared).is_some(), "{shared} missing");
    }

    let root = schema.root("Widget").expect("Widget is a root type");
    assert_eq!(root.id_field(), "id");
    assert_eq!(root.names.entry_field, "widget");
}

#[test]
fn test_find_and_create_arguments_follow_identifier_type() {
    let schema = assemble(&DataSourceConfig::default(), WIDGET, &["Widget"]);
    let query = schema.type_definition("WidgetQuery").unwrap();
    let TypeKind::Object(query) = &query.kind else {
        panic!("WidgetQuery should be an object");
    };
    let find = &query.fields[0].node;
    assert_eq!(find.arguments.len(), 1);
    assert_eq!(find.arguments[0].node.name.node.as_str(), "id");
    assert_eq!(find.arguments[0].node.ty.node.to_string(), "ID!");

    let list = &query.fields[1].node;
    let list_args: Vec<String> = list
        .arguments
        .iter()
        .map(|a| format!("{}: {}", a.node.name.node, a.node.ty.node))
        .collect();
    assert_eq!(
        list_args,
        vec![
            "before: ID",
            "after: ID",
            "first: Int",
            "last: Int",
            "order: [DataSourceOrderInput!]",
            "filter: [DataSourceFilterInput!]",
        ]
    );

    let mutation = schema.type_definition("WidgetMutation").unwrap();
    let TypeKind::Object(mutation) = &mutation.kind else {
        panic!("WidgetMutation should be an object");
    };
    let create_args: Vec<String> = mutation.fields[0]
        .node
        .arguments
        .iter()
        .map(|a| format!("{}: {}", a.node.name.node, a.node.ty.node))
        .collect();
    assert_eq!(create_args, vec!["id: ID", "data: WidgetInput!"]);
}

#[test]
fn test_identifier_never_in_inputs() {
    let schema = assemble(&DataSourceConfig::default(), WIDGET, &["Widget"]);
    for input in ["WidgetInput", "WidgetUpdateInput"] {
        assert!(
            field_type(&schema, input, "id").is_none(),
            "{input} must not declare the identifier"
        );
    }
    let root = schema.root("Widget").unwrap();
    assert!(root.descriptor.field("id").is_none());
}

#[test]
fn test_update_input_is_nullable() {
    let schema = assemble(&DataSourceConfig::default(), WIDGET, &["Widget"]);
    assert_eq!(
        fields(&schema, "WidgetUpdateInput"),
        pairs(&[
            ("name", "String"),
            ("weight", "Int"),
            ("size", "Size"),
            ("tags", "[String!]"),
        ])
    );
}

#[test]
fn test_declared_input_is_kept() {
    let sdl = format!("{WIDGET}\ninput WidgetInput {{ name: String }}");
    let schema = assemble(&DataSourceConfig::default(), &sdl, &["Widget"]);

    assert_eq!(fields(&schema, "WidgetInput"), pairs(&[("name", "String")]));
    // The update input is still derived.
    assert_eq!(
        field_type(&schema, "WidgetUpdateInput", "weight").as_deref(),
        Some("Int")
    );
}

#[test]
fn test_duplicate_root_types_are_processed_once() {
    let schema = assemble(&DataSourceConfig::default(), WIDGET, &["Widget", "Widget"]);
    assert_eq!(schema.roots.len(), 1);
    assert_eq!(fields(&schema, "Query").len(), 1);
}

// =============================================================================
// Nested and cyclic objects
// =============================================================================

#[test]
fn test_nested_object_inputs() {
    let sdl = r#"
        type Dimensions { width: Int! height: Int! }
        type Crate {
            id: ID!
            label: String
            size: Dimensions!
            history: [Dimensions!]
        }
    "#;
    let schema = assemble(&DataSourceConfig::default(), sdl, &["Crate"]);

    assert_eq!(
        fields(&schema, "CrateInput"),
        pairs(&[
            ("label", "String"),
            ("size", "DimensionsInput!"),
            ("history", "[DimensionsInput!]"),
        ])
    );
    assert_eq!(
        fields(&schema, "DimensionsInput"),
        pairs(&[("width", "Int!"), ("height", "Int!")])
    );
    assert_eq!(
        fields(&schema, "DimensionsUpdateInput"),
        pairs(&[("width", "Int"), ("height", "Int")])
    );
    assert_eq!(
        field_type(&schema, "CrateUpdateInput", "size").as_deref(),
        Some("DimensionsUpdateInput")
    );
}

#[test]
fn test_cyclic_objects_terminate() {
    let sdl = r#"
        type Author { id: ID! name: String! latest: Book! }
        type Book { title: String! author: Author! }
    "#;
    let schema = assemble(&DataSourceConfig::default(), sdl, &["Author"]);

    assert_eq!(
        field_type(&schema, "AuthorInput", "latest").as_deref(),
        Some("BookInput!")
    );
    // The back-reference is relaxed to nullable.
    assert_eq!(
        field_type(&schema, "BookInput", "author").as_deref(),
        Some("AuthorInput")
    );

    let names: Vec<String> = schema
        .document
        .definitions
        .iter()
        .filter_map(definition_name)
        .collect();
    let unique: HashSet<&String> = names.iter().collect();
    assert_eq!(names.len(), unique.len(), "duplicate definitions: {names:?}");
}

#[test]
fn test_abstract_fields_omitted_from_inputs() {
    let sdl = r#"
        interface Named { name: String! }
        type Gear implements Named { name: String! teeth: Int }
        union Part = Gear
        type Machine { id: ID! label: String owner: Named part: Part }
    "#;
    let schema = assemble(&DataSourceConfig::default(), sdl, &["Machine"]);

    assert_eq!(fields(&schema, "MachineInput"), pairs(&[("label", "String")]));
    // The output type is unchanged.
    assert_eq!(field_type(&schema, "Machine", "owner").as_deref(), Some("Named"));
}

// =============================================================================
// Identifier selection
// =============================================================================

#[test]
fn test_no_identifier_field() {
    let err = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment("type Widget { id: ID name: String }")
        .root_type("Widget")
        .assemble()
        .unwrap_err();
    assert!(matches!(err, SchemaError::NoIdentifierField { type_name } if type_name == "Widget"));
}

#[test]
fn test_custom_identifier_selector() {
    let selector: IdFieldSelector = Arc::new(|_: &TypeDefinition| Some("sku".to_string()));
    let schema = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment("type Product { sku: Int! title: String! }")
        .root_type("Product")
        .id_field_selector(selector)
        .assemble()
        .unwrap();

    let root = schema.root("Product").unwrap();
    assert_eq!(root.id_field(), "sku");
    assert_eq!(fields(&schema, "ProductInput"), pairs(&[("title", "String!")]));
    assert_eq!(
        field_type(&schema, "ProductMutation", "create").as_deref(),
        Some("Int!")
    );
}

#[test]
fn test_selector_naming_missing_field() {
    let selector: IdFieldSelector = Arc::new(|_: &TypeDefinition| Some("code".to_string()));
    let err = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment("type Product { sku: Int! }")
        .root_type("Product")
        .id_field_selector(selector)
        .assemble()
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownIdentifierField { field, .. } if field == "code"));
}

// =============================================================================
// Timestamps and namespaces
// =============================================================================

#[test]
fn test_timestamps_added_and_excluded_from_inputs() {
    let config = DataSourceConfig::default().with_timestamps(true);
    let schema = assemble(&config, WIDGET, &["Widget"]);

    assert_eq!(field_type(&schema, "Widget", "created").as_deref(), Some("Float!"));
    assert_eq!(field_type(&schema, "Widget", "modified").as_deref(), Some("Float!"));
    for input in ["WidgetInput", "WidgetUpdateInput"] {
        assert!(field_type(&schema, input, "created").is_none());
        assert!(field_type(&schema, input, "modified").is_none());
    }
}

#[test]
fn test_declared_float_timestamp_is_kept() {
    let config = DataSourceConfig::default().with_timestamps(true);
    let schema = assemble(
        &config,
        "type Widget { id: ID! name: String created: Float }",
        &["Widget"],
    );

    assert_eq!(field_type(&schema, "Widget", "created").as_deref(), Some("Float"));
    assert_eq!(field_type(&schema, "Widget", "modified").as_deref(), Some("Float!"));
    assert!(field_type(&schema, "WidgetInput", "created").is_none());
}

#[test]
fn test_conflicting_timestamp_declaration_rejected() {
    let err = SchemaAssembler::new(&DataSourceConfig::default().with_timestamps(true))
        .fragment("type Widget { id: ID! created: String }")
        .root_type("Widget")
        .assemble()
        .unwrap_err();

    assert_eq!(err.error_code(), "TIMESTAMP_FIELD_CONFLICT");
    assert!(matches!(
        &err,
        SchemaError::TimestampFieldConflict { field, declared, .. }
            if field == "created" && declared == "String"
    ));
}

#[test]
fn test_conflicting_timestamp_ignored_without_timestamps() {
    let schema = assemble(
        &DataSourceConfig::default(),
        "type Widget { id: ID! created: String }",
        &["Widget"],
    );
    assert_eq!(field_type(&schema, "WidgetInput", "created").as_deref(), Some("String"));
}

#[test]
fn test_namespaced_schemas_merge_without_collisions() {
    let a = assemble(
        &DataSourceConfig::default().with_namespace("A"),
        WIDGET,
        &["Widget"],
    );
    let b = assemble(
        &DataSourceConfig::default().with_namespace("B"),
        "type Gadget { id: ID! label: String }",
        &["Gadget"],
    );
    let merged = a.merge(b).unwrap();

    for name in [
        "DataSourceFilterOperationA",
        "DataSourceFilterOperationB",
        "DataSourcePageInfoA",
        "DataSourcePageInfoB",
    ] {
        assert!(merged.type_definition(name).is_some(), "{name} missing");
    }
    assert_eq!(
        field_type(&merged, "WidgetConnection", "pageInfo").as_deref(),
        Some("DataSourcePageInfoA!")
    );
    assert_eq!(
        fields(&merged, "Query"),
        pairs(&[("widget", "WidgetQuery"), ("gadget", "GadgetQuery")])
    );
    assert_eq!(
        fields(&merged, "Mutation"),
        pairs(&[("widget", "WidgetMutation"), ("gadget", "GadgetMutation")])
    );
    assert_eq!(merged.roots.len(), 2);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_unknown_root_type() {
    let err = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment(WIDGET)
        .root_type("Gizmo")
        .assemble()
        .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownRootType { type_name } if type_name == "Gizmo"));
}

#[test]
fn test_unknown_field_type() {
    let err = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment("type Widget { id: ID! part: Part }")
        .root_type("Widget")
        .assemble()
        .unwrap_err();
    assert!(matches!(
        err,
        SchemaError::UnknownType { type_name, referenced_by }
            if type_name == "Part" && referenced_by == "Widget.part"
    ));
}

#[test]
fn test_invalid_fragment_aborts_assembly() {
    let err = SchemaAssembler::new(&DataSourceConfig::default())
        .fragment(WIDGET)
        .fragment(graphql_datasource::DocumentSource::labeled("broken.graphql", "type {"))
        .root_type("Widget")
        .assemble()
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDocument { origin, .. } if origin == "broken.graphql"));
}

// =============================================================================
// Loading from disk
// =============================================================================

#[tokio::test]
async fn test_assemble_from_schema_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("widget.graphql"), WIDGET).unwrap();
    std::fs::write(
        dir.path().join("queries.graphql"),
        "type Query { version: String }",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a schema").unwrap();

    let sources = load_schema_dir(dir.path()).await.unwrap();
    assert_eq!(sources.len(), 2);

    let schema = SchemaAssembler::new(&DataSourceConfig::default())
        .fragments(sources)
        .root_type("Widget")
        .assemble()
        .unwrap();

    // The declared Query field survives next to the entry point.
    assert_eq!(
        fields(&schema, "Query"),
        pairs(&[("version", "String"), ("widget", "WidgetQuery")])
    );

    let sdl = print_document(&schema.document);
    assert!(sdl.contains("input WidgetInput"));
    assert!(async_graphql_parser::parse_schema(&sdl).is_ok());
}
