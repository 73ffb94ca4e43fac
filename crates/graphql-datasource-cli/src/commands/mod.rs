pub mod query;
pub mod roots;
pub mod sdl;

use std::sync::Arc;

use anyhow::{Context, Result};
use graphql_datasource::document::{load_schema_dir, load_schema_file};
use graphql_datasource::{DataSourceConfig, DataSourceSchema, DataSourceSchemaBuilder, DocumentSource};
use graphql_datasource_memory::InMemoryCollectionFactory;

use crate::cli::SchemaArgs;

/// Reads every schema path; directories contribute their `*.graphql` files.
pub async fn load_sources(args: &SchemaArgs) -> Result<Vec<DocumentSource>> {
    let mut sources = Vec::new();
    for path in &args.schemas {
        if path.is_dir() {
            let loaded = load_schema_dir(path)
                .await
                .with_context(|| format!("Failed to load schema directory: {}", path.display()))?;
            sources.extend(loaded);
        } else {
            sources.push(load_schema_file(path).await?);
        }
    }
    Ok(sources)
}

/// Builds a schema bound to in-memory collections.
pub async fn build_schema(
    config: DataSourceConfig,
    args: &SchemaArgs,
    factory: Arc<InMemoryCollectionFactory>,
) -> Result<DataSourceSchema> {
    let sources = load_sources(args).await?;
    let schema = DataSourceSchemaBuilder::new(config)
        .fragments(sources)
        .root_types(args.roots.iter().cloned())
        .build(factory)
        .await?;
    Ok(schema)
}
