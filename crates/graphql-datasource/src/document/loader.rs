//! Loading schema fragments from disk.

use std::path::Path;

use tracing::debug;

use super::source::DocumentSource;
use crate::error::SchemaError;

const SCHEMA_EXTENSIONS: [&str; 2] = ["graphql", "gql"];

fn io_error(path: &Path, source: std::io::Error) -> SchemaError {
    SchemaError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Reads one SDL file, labelled with its path.
///
/// # Errors
///
/// Returns `SchemaError::Io` if the file cannot be read.
pub async fn load_schema_file(path: impl AsRef<Path>) -> Result<DocumentSource, SchemaError> {
    let path = path.as_ref();
    let sdl = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| io_error(path, e))?;
    debug!(path = %path.display(), bytes = sdl.len(), "Loaded schema file");
    Ok(DocumentSource::labeled(path.display().to_string(), sdl))
}

/// Reads every `*.graphql`/`*.gql` file of a directory, in file-name order.
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns `SchemaError::Io` if the directory or any schema file cannot be read.
pub async fn load_schema_dir(dir: impl AsRef<Path>) -> Result<Vec<DocumentSource>, SchemaError> {
    let dir = dir.as_ref();
    let mut entries = tokio::fs::read_dir(dir)
        .await
        .map_err(|e| io_error(dir, e))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(dir, e))? {
        let path = entry.path();
        let is_schema = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SCHEMA_EXTENSIONS.contains(&ext));
        if is_schema && path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut sources = Vec::with_capacity(paths.len());
    for path in paths {
        sources.push(load_schema_file(&path).await?);
    }
    debug!(dir = %dir.display(), files = sources.len(), "Loaded schema directory");
    Ok(sources)
}
