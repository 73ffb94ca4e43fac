use colored::Colorize;
use graphql_datasource::RootType;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(_) => println!("{value}"),
    }
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn roots_table(roots: &[RootType]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Type", "Identifier", "Entry field", "Fields"]);
    for root in roots {
        let identifier = format!("{}: {}", root.id_field(), root.descriptor.id_field_type);
        builder.push_record([
            root.type_name().to_string(),
            identifier,
            root.names.entry_field.clone(),
            root.descriptor.fields.len().to_string(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn print_roots(roots: &[RootType]) {
    if roots.is_empty() {
        println!("No root types.");
        return;
    }
    println!("{}", roots_table(roots));
}
