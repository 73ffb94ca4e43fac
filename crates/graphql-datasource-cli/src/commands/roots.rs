use anyhow::Result;
use graphql_datasource::{DataSourceConfig, SchemaAssembler};

use super::load_sources;
use crate::cli::SchemaArgs;
use crate::output::print_roots;

pub async fn run(config: DataSourceConfig, args: SchemaArgs) -> Result<()> {
    let sources = load_sources(&args).await?;
    let assembled = SchemaAssembler::new(&config)
        .fragments(sources)
        .root_types(args.roots.iter().cloned())
        .assemble()?;
    print_roots(&assembled.roots);
    Ok(())
}
