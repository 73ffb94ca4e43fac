use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use async_graphql::{Request, Variables};
use graphql_datasource::resolvers::CollectionOperations;
use graphql_datasource::{DataSourceConfig, DataSourceSchema, SystemClock};
use graphql_datasource_memory::InMemoryCollectionFactory;
use graphql_datasource_storage::record_from_value;
use serde_json::Value;
use tracing::info;

use super::build_schema;
use crate::cli::QueryArgs;
use crate::output::{print_json, print_warning};

pub async fn run(config: DataSourceConfig, args: QueryArgs) -> Result<()> {
    let operation = operation_text(&args).await?;
    let variables = match &args.variables {
        Some(text) => {
            let value: Value =
                serde_json::from_str(text).context("--variables must be a JSON object")?;
            if !value.is_object() {
                bail!("--variables must be a JSON object");
            }
            Some(Variables::from_json(value))
        }
        None => None,
    };

    let max_page_size = config.max_page_size;
    let factory = Arc::new(InMemoryCollectionFactory::new());
    let schema = build_schema(config, &args.schema, factory.clone()).await?;
    if let Some(seed) = &args.seed {
        let count = seed_collections(&schema, &factory, seed, max_page_size).await?;
        info!(records = count, path = %seed.display(), "Seeded collections");
    }

    let mut request = Request::new(operation);
    if let Some(variables) = variables {
        request = request.variables(variables);
    }
    let response = schema.execute(request).await;
    if response.is_err() {
        print_warning("operation finished with errors");
    }
    print_json(&serde_json::to_value(&response)?);
    Ok(())
}

async fn operation_text(args: &QueryArgs) -> Result<String> {
    match (&args.query, &args.query_file) {
        (Some(query), _) => Ok(query.clone()),
        (None, Some(path)) => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read operation file: {}", path.display())),
        (None, None) => bail!("either --query or --query-file is required"),
    }
}

/// Loads `{"Type": [records...]}` into the collections of the bound root types.
/// Records go through the same create rules as the `create` mutation, so
/// timestamped root types get `created`/`modified`.
///
/// Returns the number of records written.
pub async fn seed_collections(
    schema: &DataSourceSchema,
    factory: &InMemoryCollectionFactory,
    path: &Path,
    max_page_size: u32,
) -> Result<usize> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let seed: serde_json::Map<String, Value> = serde_json::from_str(&content)
        .with_context(|| format!("Invalid seed file: {}", path.display()))?;

    let mut count = 0;
    for (type_name, records) in seed {
        let root = schema
            .roots()
            .iter()
            .find(|root| root.type_name() == type_name)
            .ok_or_else(|| anyhow!("seed type '{type_name}' is not a root type"))?;
        let Value::Array(records) = records else {
            bail!("seed entry '{type_name}' must be an array of records");
        };

        let collection = factory.get_or_create(root.type_name(), root.id_field());
        let operations = CollectionOperations::new(
            root.type_name(),
            root.timestamps,
            max_page_size,
            Arc::new(SystemClock),
        );
        for value in records {
            let mut record = record_from_value(value)
                .map_err(|e| anyhow!("invalid seed record for '{type_name}': {e}"))?;
            let id = match record.remove(root.id_field()) {
                Some(Value::String(id)) => Some(id),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            };
            operations
                .create(collection.as_ref(), id.as_deref(), record)
                .await?;
            count += 1;
        }
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SchemaArgs;
    use serde_json::json;

    const SCHEMA: &str = "type Widget { id: ID! name: String! }";

    async fn widget_schema(
        dir: &Path,
        config: DataSourceConfig,
        factory: Arc<InMemoryCollectionFactory>,
    ) -> DataSourceSchema {
        let schema_path = dir.join("widget.graphql");
        std::fs::write(&schema_path, SCHEMA).unwrap();
        let args = SchemaArgs {
            schemas: vec![schema_path],
            roots: vec!["Widget".to_string()],
        };
        build_schema(config, &args, factory).await.unwrap()
    }

    #[tokio::test]
    async fn test_seed_and_query() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(InMemoryCollectionFactory::new());
        let schema = widget_schema(dir.path(), DataSourceConfig::default(), factory.clone()).await;

        let seed_path = dir.path().join("seed.json");
        let seed = json!({ "Widget": [{ "id": "w1", "name": "sprocket" }, { "name": "cog" }] });
        std::fs::write(&seed_path, seed.to_string()).unwrap();

        let count = seed_collections(&schema, &factory, &seed_path, 100).await.unwrap();
        assert_eq!(count, 2);

        let response = schema
            .execute(r#"{ widget { find(id: "w1") { id name } } }"#)
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        assert_eq!(data, json!({ "widget": { "find": { "id": "w1", "name": "sprocket" } } }));
    }

    #[tokio::test]
    async fn test_seeded_records_are_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(InMemoryCollectionFactory::new());
        let config = DataSourceConfig::default().with_timestamps(true);
        let schema = widget_schema(dir.path(), config, factory.clone()).await;

        let seed_path = dir.path().join("seed.json");
        let seed = json!({ "Widget": [{ "id": "w1", "name": "sprocket" }] });
        std::fs::write(&seed_path, seed.to_string()).unwrap();
        seed_collections(&schema, &factory, &seed_path, 100).await.unwrap();

        let response = schema
            .execute(r#"{ widget { find(id: "w1") { name created modified } } }"#)
            .await;
        assert!(response.errors.is_empty(), "{:?}", response.errors);
        let data = response.data.into_json().unwrap();
        let found = &data["widget"]["find"];
        assert_eq!(found["name"], json!("sprocket"));
        assert!(found["created"].is_number());
        assert_eq!(found["created"], found["modified"]);
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_type() {
        let dir = tempfile::tempdir().unwrap();
        let factory = Arc::new(InMemoryCollectionFactory::new());
        let schema = widget_schema(dir.path(), DataSourceConfig::default(), factory.clone()).await;

        let seed_path = dir.path().join("seed.json");
        std::fs::write(&seed_path, json!({ "Gadget": [] }).to_string()).unwrap();

        let err = seed_collections(&schema, &factory, &seed_path, 100)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("'Gadget' is not a root type"));
    }

    #[tokio::test]
    async fn test_operation_text_requires_source() {
        let args = QueryArgs {
            schema: SchemaArgs {
                schemas: vec![],
                roots: vec![],
            },
            query: None,
            query_file: None,
            seed: None,
            variables: None,
        };
        assert!(operation_text(&args).await.is_err());
    }
}
