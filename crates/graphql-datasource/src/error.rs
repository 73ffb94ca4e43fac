//! Error types for schema assembly and resolver execution.
//!
//! Assembly errors ([`SchemaError`]) abort the whole build; no partial schema
//! is returned. Resolver errors ([`ResolverError`]) fail a single operation and
//! are surfaced as GraphQL errors carrying an `extensions.code`.

use std::path::PathBuf;

use async_graphql::ErrorExtensions;
use graphql_datasource_storage::CollectionError;

/// Errors raised while assembling or binding a schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// A fragment does not parse to a well-formed type-system document.
    #[error("Invalid document '{origin}': {message}")]
    InvalidDocument {
        /// Label of the offending fragment (file path or `fragment #n`).
        origin: String,
        /// Parser message.
        message: String,
    },

    /// A root type has no eligible identifier field.
    #[error("Type '{type_name}' has no non-null ID field to use as identifier")]
    NoIdentifierField {
        /// The root type.
        type_name: String,
    },

    /// The identifier selector named a field the type does not declare.
    #[error("Identifier field '{field}' is not declared on type '{type_name}'")]
    UnknownIdentifierField {
        /// The root type.
        type_name: String,
        /// The selected field.
        field: String,
    },

    /// A root type name does not name an object type.
    #[error("Root type '{type_name}' is not declared as an object type")]
    UnknownRootType {
        /// The requested root type.
        type_name: String,
    },

    /// A field references a type no fragment declares.
    #[error("Unknown type '{type_name}' referenced by '{referenced_by}'")]
    UnknownType {
        /// The missing type.
        type_name: String,
        /// `Type.field` that references it.
        referenced_by: String,
    },

    /// A definition without a name reached the merge engine.
    #[error("Unable to determine the name of a {kind} definition")]
    UnnamedDefinition {
        /// Kind of the nameless definition.
        kind: &'static str,
    },

    /// A schema file could not be read.
    #[error("Failed to read schema file '{}': {source}", path.display())]
    Io {
        /// The file or directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The collection factory failed while binding.
    #[error("Collection acquisition failed for '{type_name}': {source}")]
    Collection {
        /// The root type whose collection was requested.
        type_name: String,
        /// Underlying collection error.
        #[source]
        source: CollectionError,
    },

    /// A root type declares a timestamp field with a non-`Float` type.
    #[error("Timestamp field '{type_name}.{field}' must be Float, found {declared}")]
    TimestampFieldConflict {
        /// The root type.
        type_name: String,
        /// `created` or `modified`.
        field: String,
        /// The declared type.
        declared: String,
    },

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The executable-schema builder rejected the final document.
    #[error("Failed to build executable schema: {0}")]
    SchemaBuildFailed(String),
}

impl SchemaError {
    /// Creates an `InvalidDocument` error.
    #[must_use]
    pub fn invalid_document(origin: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDocument {
            origin: origin.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for logs and diagnostics.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidDocument { .. } => "INVALID_DOCUMENT",
            Self::NoIdentifierField { .. } => "NO_IDENTIFIER_FIELD",
            Self::UnknownIdentifierField { .. } => "UNKNOWN_IDENTIFIER_FIELD",
            Self::UnknownRootType { .. } => "UNKNOWN_ROOT_TYPE",
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::UnnamedDefinition { .. } => "UNNAMED_DEFINITION",
            Self::Io { .. } => "IO_ERROR",
            Self::Collection { .. } => "COLLECTION_ERROR",
            Self::TimestampFieldConflict { .. } => "TIMESTAMP_FIELD_CONFLICT",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::SchemaBuildFailed(_) => "SCHEMA_BUILD_FAILED",
        }
    }
}

/// Errors raised by a single bound resolver.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// `update` targeted a record that does not exist.
    #[error("Record with id \"{id}\" in collection \"{collection}\" does not exist for update")]
    RecordNotFound {
        /// Collection (root type) name.
        collection: String,
        /// Requested identifier.
        id: String,
    },

    /// A required argument is absent or null.
    #[error("Missing required argument '{0}'")]
    MissingArgument(String),

    /// An argument has an unusable shape.
    #[error("Invalid argument '{name}': {message}")]
    InvalidArgument {
        /// Argument name.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// The collection reported a failure.
    #[error(transparent)]
    Collection(#[from] CollectionError),
}

impl ResolverError {
    /// Creates a `RecordNotFound` error.
    #[must_use]
    pub fn record_not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::RecordNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates an `InvalidArgument` error.
    #[must_use]
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Returns the error code for GraphQL error extensions.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::RecordNotFound { .. } => "RECORD_NOT_FOUND",
            Self::MissingArgument(_) | Self::InvalidArgument { .. } => "BAD_USER_INPUT",
            Self::Collection(_) => "COLLECTION_ERROR",
        }
    }
}

impl ErrorExtensions for ResolverError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_, ext| {
            ext.set("code", self.error_code());
            if let Self::RecordNotFound { collection, id } = self {
                ext.set("collection", collection.as_str());
                ext.set("id", id.as_str());
            }
        })
    }
}
