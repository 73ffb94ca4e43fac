use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use graphql_datasource::DataSourceConfig;

use crate::cli::Cli;

pub fn load_config(path: Option<&Path>) -> Result<DataSourceConfig> {
    let Some(path) = path else {
        return Ok(DataSourceConfig::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let cfg: DataSourceConfig = toml::from_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;
    Ok(cfg)
}

/// Loads the config file and applies command-line overrides.
pub fn resolve_config(cli: &Cli) -> Result<DataSourceConfig> {
    let mut cfg = load_config(cli.config.as_deref())?;
    if let Some(namespace) = &cli.namespace {
        cfg.namespace = Some(namespace.clone());
    }
    if cli.timestamps {
        cfg.timestamps = true;
    }
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use graphql_datasource::CollectionScope;

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlds.toml");
        fs::write(
            &path,
            "namespace = \"Shop\"\nmax_page_size = 25\ncollection_scope = \"request\"\n",
        )
        .unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.namespace.as_deref(), Some("Shop"));
        assert_eq!(cfg.max_page_size, 25);
        assert_eq!(cfg.collection_scope, CollectionScope::Request);
        assert!(!cfg.timestamps);
    }

    #[test]
    fn test_missing_config_file() {
        let err = load_config(Some(Path::new("/nonexistent/gqlds.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gqlds.toml");
        fs::write(&path, "namespace = \"Shop\"\n").unwrap();
        let config_arg = path.to_string_lossy().to_string();

        let cli = Cli::parse_from([
            "gqlds",
            "--config",
            &config_arg,
            "--namespace",
            "Warehouse",
            "--timestamps",
            "sdl",
            "--schema",
            "schema.graphql",
        ]);
        let cfg = resolve_config(&cli).unwrap();
        assert_eq!(cfg.namespace.as_deref(), Some("Warehouse"));
        assert!(cfg.timestamps);
    }

    #[test]
    fn test_invalid_namespace_rejected() {
        let cli = Cli::parse_from(["gqlds", "--namespace", "not valid", "sdl", "-s", "x.graphql"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(err.to_string().starts_with("Invalid configuration"));
    }
}
