use std::sync::Arc;

use anyhow::Result;
use graphql_datasource::DataSourceConfig;
use graphql_datasource_memory::InMemoryCollectionFactory;

use super::build_schema;
use crate::cli::SchemaArgs;

pub async fn run(config: DataSourceConfig, args: SchemaArgs) -> Result<()> {
    let schema = build_schema(config, &args, Arc::new(InMemoryCollectionFactory::new())).await?;
    println!("{}", schema.sdl());
    Ok(())
}
