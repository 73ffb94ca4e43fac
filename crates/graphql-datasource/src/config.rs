//! Data source configuration.
//!
//! Configuration can be loaded from a TOML file (the CLI's `--config`) or
//! built in code.
//!
//! # Example Configuration
//!
//! ```toml
//! namespace = "Inventory"
//! timestamps = true
//! max_page_size = 50
//! collection_scope = "request"
//! ```

use serde::{Deserialize, Serialize};

/// When collection handles are acquired from the factory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionScope {
    /// Once per root type while the schema is bound.
    #[default]
    Schema,
    /// Once per root type per request, on first use.
    Request,
}

/// Schema derivation and execution options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceConfig {
    /// Suffix appended to the shared `DataSource*` primitive type names.
    /// Default: none
    #[serde(default)]
    pub namespace: Option<String>,

    /// Add `created`/`modified` fields to root types and stamp them on writes.
    /// Default: false
    #[serde(default)]
    pub timestamps: bool,

    /// Upper bound applied to positive `first`/`last` list arguments.
    /// Default: 100
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Collection acquisition scope.
    /// Default: schema
    #[serde(default)]
    pub collection_scope: CollectionScope,

    /// Maximum query depth allowed.
    /// Default: 15
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Maximum query complexity allowed.
    /// Default: 500
    #[serde(default = "default_max_complexity")]
    pub max_complexity: usize,

    /// Enable GraphQL introspection queries.
    /// Default: true
    #[serde(default = "default_introspection")]
    pub introspection: bool,
}

fn default_max_page_size() -> u32 {
    100
}

fn default_max_depth() -> usize {
    15
}

fn default_max_complexity() -> usize {
    500
}

fn default_introspection() -> bool {
    true
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            timestamps: false,
            max_page_size: default_max_page_size(),
            collection_scope: CollectionScope::default(),
            max_depth: default_max_depth(),
            max_complexity: default_max_complexity(),
            introspection: default_introspection(),
        }
    }
}

impl DataSourceConfig {
    /// Sets the namespace suffix.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Enables or disables timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    /// Sets the collection acquisition scope.
    #[must_use]
    pub fn with_collection_scope(mut self, scope: CollectionScope) -> Self {
        self.collection_scope = scope;
        self
    }

    /// Returns the namespace suffix, empty when unset.
    #[must_use]
    pub fn namespace_suffix(&self) -> &str {
        self.namespace.as_deref().unwrap_or_default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration values are invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_page_size == 0 {
            return Err("max_page_size must be > 0".into());
        }
        if self.max_depth == 0 {
            return Err("max_depth must be > 0".into());
        }
        if self.max_complexity == 0 {
            return Err("max_complexity must be > 0".into());
        }
        if let Some(namespace) = &self.namespace
            && !namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(format!(
                "namespace '{namespace}' may only contain letters, digits and '_'"
            ));
        }
        Ok(())
    }
}
