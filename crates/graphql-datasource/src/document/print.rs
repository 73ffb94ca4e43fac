//! SDL printer for assembled documents.
//!
//! Unlike the executable schema's SDL, the printed document contains only
//! what the fragments and the synthesizer declared, in merge order.

use std::fmt::Write;

use async_graphql_parser::Positioned;
use async_graphql_parser::types::{
    ConstDirective, DirectiveDefinition, FieldDefinition, InputValueDefinition, SchemaDefinition,
    ServiceDocument, TypeDefinition, TypeKind, TypeSystemDefinition,
};

/// Renders a document as SDL, definitions separated by blank lines.
pub fn print_document(document: &ServiceDocument) -> String {
    let mut out = String::new();
    for (index, definition) in document.definitions.iter().enumerate() {
        if index > 0 {
            out.push('\n');
        }
        match definition {
            TypeSystemDefinition::Type(ty) => print_type(&mut out, &ty.node),
            TypeSystemDefinition::Directive(directive) => print_directive(&mut out, &directive.node),
            TypeSystemDefinition::Schema(schema) => print_schema(&mut out, &schema.node),
        }
    }
    out
}

fn print_description(out: &mut String, description: Option<&Positioned<String>>, indent: &str) {
    if let Some(description) = description {
        let _ = writeln!(out, "{indent}\"\"\"{}\"\"\"", description.node.replace("\"\"\"", "\\\"\"\""));
    }
}

fn print_directives(out: &mut String, directives: &[Positioned<ConstDirective>]) {
    for directive in directives {
        let _ = write!(out, " @{}", directive.node.name.node);
        if !directive.node.arguments.is_empty() {
            let args: Vec<String> = directive
                .node
                .arguments
                .iter()
                .map(|(name, value)| format!("{}: {}", name.node, value.node))
                .collect();
            let _ = write!(out, "({})", args.join(", "));
        }
    }
}

fn input_value(value: &InputValueDefinition) -> String {
    let mut out = format!("{}: {}", value.name.node, value.ty.node);
    if let Some(default) = &value.default_value {
        let _ = write!(out, " = {}", default.node);
    }
    print_directives(&mut out, &value.directives);
    out
}

fn print_arguments(out: &mut String, arguments: &[Positioned<InputValueDefinition>]) {
    if arguments.is_empty() {
        return;
    }
    let args: Vec<String> = arguments.iter().map(|a| input_value(&a.node)).collect();
    let _ = write!(out, "({})", args.join(", "));
}

fn print_fields(out: &mut String, fields: &[Positioned<FieldDefinition>]) {
    out.push_str(" {\n");
    for field in fields {
        print_description(out, field.node.description.as_ref(), "  ");
        let _ = write!(out, "  {}", field.node.name.node);
        print_arguments(out, &field.node.arguments);
        let _ = write!(out, ": {}", field.node.ty.node);
        print_directives(out, &field.node.directives);
        out.push('\n');
    }
    out.push_str("}\n");
}

fn print_implements(out: &mut String, implements: &[Positioned<async_graphql_value::Name>]) {
    if implements.is_empty() {
        return;
    }
    let names: Vec<&str> = implements.iter().map(|n| n.node.as_str()).collect();
    let _ = write!(out, " implements {}", names.join(" & "));
}

fn print_type(out: &mut String, ty: &TypeDefinition) {
    print_description(out, ty.description.as_ref(), "");
    if ty.extend {
        out.push_str("extend ");
    }
    let keyword = match &ty.kind {
        TypeKind::Scalar => "scalar",
        TypeKind::Object(_) => "type",
        TypeKind::Interface(_) => "interface",
        TypeKind::Union(_) => "union",
        TypeKind::Enum(_) => "enum",
        TypeKind::InputObject(_) => "input",
    };
    let _ = write!(out, "{keyword} {}", ty.name.node);

    match &ty.kind {
        TypeKind::Scalar => {
            print_directives(out, &ty.directives);
            out.push('\n');
        }
        TypeKind::Object(object) => {
            print_implements(out, &object.implements);
            print_directives(out, &ty.directives);
            print_fields(out, &object.fields);
        }
        TypeKind::Interface(interface) => {
            print_implements(out, &interface.implements);
            print_directives(out, &ty.directives);
            print_fields(out, &interface.fields);
        }
        TypeKind::Union(union) => {
            print_directives(out, &ty.directives);
            let members: Vec<&str> = union.members.iter().map(|m| m.node.as_str()).collect();
            let _ = writeln!(out, " = {}", members.join(" | "));
        }
        TypeKind::Enum(enum_type) => {
            print_directives(out, &ty.directives);
            out.push_str(" {\n");
            for value in &enum_type.values {
                print_description(out, value.node.description.as_ref(), "  ");
                let _ = write!(out, "  {}", value.node.value.node);
                print_directives(out, &value.node.directives);
                out.push('\n');
            }
            out.push_str("}\n");
        }
        TypeKind::InputObject(input) => {
            print_directives(out, &ty.directives);
            out.push_str(" {\n");
            for field in &input.fields {
                print_description(out, field.node.description.as_ref(), "  ");
                let _ = writeln!(out, "  {}", input_value(&field.node));
            }
            out.push_str("}\n");
        }
    }
}

/// `FieldDefinition` → `FIELD_DEFINITION`.
fn screaming_snake(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for (index, c) in value.chars().enumerate() {
        if c.is_uppercase() && index > 0 {
            out.push('_');
        }
        out.push(c.to_ascii_uppercase());
    }
    out
}

fn print_directive(out: &mut String, directive: &DirectiveDefinition) {
    print_description(out, directive.description.as_ref(), "");
    let _ = write!(out, "directive @{}", directive.name.node);
    print_arguments(out, &directive.arguments);
    if directive.is_repeatable {
        out.push_str(" repeatable");
    }
    let locations: Vec<String> = directive
        .locations
        .iter()
        .map(|l| screaming_snake(&format!("{:?}", l.node)))
        .collect();
    let _ = writeln!(out, " on {}", locations.join(" | "));
}

fn print_schema(out: &mut String, schema: &SchemaDefinition) {
    out.push_str(if schema.extend { "extend schema" } else { "schema" });
    print_directives(out, &schema.directives);
    out.push_str(" {\n");
    for (operation, name) in [
        ("query", &schema.query),
        ("mutation", &schema.mutation),
        ("subscription", &schema.subscription),
    ] {
        if let Some(name) = name {
            let _ = writeln!(out, "  {operation}: {}", name.node);
        }
    }
    out.push_str("}\n");
}
