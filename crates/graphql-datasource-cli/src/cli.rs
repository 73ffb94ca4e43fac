use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "gqlds")]
#[command(about = "Derive CRUD GraphQL schemas from SDL fragments and try them out")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true, env = "GQLDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Namespace suffix for the shared DataSource* types (overrides config)
    #[arg(short, long, global = true)]
    pub namespace: Option<String>,

    /// Add created/modified timestamps to root types (overrides config)
    #[arg(long, global = true)]
    pub timestamps: bool,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the SDL of the derived schema
    Sdl(SchemaArgs),
    /// List root types with their identifier and entry field
    Roots(SchemaArgs),
    /// Execute an operation against in-memory collections
    Query(QueryArgs),
}

#[derive(clap::Args)]
pub struct SchemaArgs {
    /// Schema file or directory of *.graphql files (repeatable)
    #[arg(short, long = "schema", required = true)]
    pub schemas: Vec<PathBuf>,

    /// Root type to derive CRUD types for (repeatable)
    #[arg(short, long = "root")]
    pub roots: Vec<String>,
}

#[derive(clap::Args)]
pub struct QueryArgs {
    #[command(flatten)]
    pub schema: SchemaArgs,

    /// Operation text
    #[arg(short, long, conflicts_with = "query_file")]
    pub query: Option<String>,

    /// Path to a file holding the operation
    #[arg(long)]
    pub query_file: Option<PathBuf>,

    /// JSON file with records to load first, e.g. {"Widget": [{"id": "w1"}]}
    #[arg(long)]
    pub seed: Option<PathBuf>,

    /// Operation variables as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
}
