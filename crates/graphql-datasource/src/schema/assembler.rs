//! Synchronous schema assembly: parse, merge, introspect, synthesize.

use std::collections::{HashMap, HashSet};

use async_graphql_parser::types::{ServiceDocument, TypeDefinition};
use tracing::debug;

use super::common::{Namespace, common_fragment};
use super::field_type::TypeIndex;
use super::introspect::{IdFieldSelector, TypeDescriptor, introspect};
use super::synthesize::{DerivedNames, SynthesisContext, Synthesizer};
use crate::config::DataSourceConfig;
use crate::document::ast::{definition_name, find_type};
use crate::document::{DocumentMerger, DocumentSource, MergeStrategy, print_document};
use crate::error::SchemaError;

/// One processed root type of an assembled schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootType {
    /// Identifier and data fields.
    pub descriptor: TypeDescriptor,
    /// Names of the derived types and entry field.
    pub names: DerivedNames,
    /// Whether writes stamp `created`/`modified`.
    pub timestamps: bool,
}

impl RootType {
    /// The root type name.
    pub fn type_name(&self) -> &str {
        &self.descriptor.type_name
    }

    /// The identifier field name.
    pub fn id_field(&self) -> &str {
        &self.descriptor.id_field_name
    }
}

/// The final document plus the root types derived into it.
#[derive(Debug, Clone)]
pub struct AssembledSchema {
    /// The final merged document.
    pub document: ServiceDocument,
    /// Root types in request order.
    pub roots: Vec<RootType>,
}

impl AssembledSchema {
    /// Returns the root type named `type_name`.
    pub fn root(&self, type_name: &str) -> Option<&RootType> {
        self.roots.iter().find(|root| root.type_name() == type_name)
    }

    /// Returns the type definition named `type_name`.
    pub fn type_definition(&self, type_name: &str) -> Option<&TypeDefinition> {
        find_type(&self.document, type_name)
    }

    /// Renders the final document as SDL.
    pub fn to_sdl(&self) -> String {
        print_document(&self.document)
    }

    /// Combines two assembled schemas: documents merge with the default
    /// strategy and root types are unioned, later entries winning.
    ///
    /// # Errors
    ///
    /// Propagates merge errors.
    pub fn merge(self, other: AssembledSchema) -> Result<Self, SchemaError> {
        let document = DocumentMerger::default().merge([self.document, other.document])?;

        let mut roots = self.roots;
        for root in other.roots {
            match roots.iter().position(|r| r.type_name() == root.type_name()) {
                Some(index) => roots[index] = root,
                None => roots.push(root),
            }
        }

        Ok(Self { document, roots })
    }
}

/// Builds an [`AssembledSchema`] from fragments and root type names.
#[derive(Clone)]
pub struct SchemaAssembler {
    fragments: Vec<DocumentSource>,
    root_types: Vec<String>,
    id_field_selector: Option<IdFieldSelector>,
    namespace: Namespace,
    timestamps: bool,
    strategy: MergeStrategy,
}

impl std::fmt::Debug for SchemaAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaAssembler")
            .field("fragments", &self.fragments.len())
            .field("root_types", &self.root_types)
            .field("namespace", &self.namespace)
            .field("timestamps", &self.timestamps)
            .finish()
    }
}

impl SchemaAssembler {
    /// Creates an assembler using the namespace and timestamp options of
    /// `config`.
    pub fn new(config: &DataSourceConfig) -> Self {
        Self {
            fragments: Vec::new(),
            root_types: Vec::new(),
            id_field_selector: None,
            namespace: Namespace::new(config.namespace.as_deref()),
            timestamps: config.timestamps,
            strategy: MergeStrategy::default(),
        }
    }

    /// Adds a fragment.
    #[must_use]
    pub fn fragment(mut self, source: impl Into<DocumentSource>) -> Self {
        self.fragments.push(source.into());
        self
    }

    /// Adds several fragments.
    #[must_use]
    pub fn fragments<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<DocumentSource>,
    {
        self.fragments.extend(sources.into_iter().map(Into::into));
        self
    }

    /// Adds a root type.
    #[must_use]
    pub fn root_type(mut self, type_name: impl Into<String>) -> Self {
        self.root_types.push(type_name.into());
        self
    }

    /// Adds several root types.
    #[must_use]
    pub fn root_types<I, S>(mut self, type_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.root_types.extend(type_names.into_iter().map(Into::into));
        self
    }

    /// Replaces the default identifier policy.
    #[must_use]
    pub fn id_field_selector(mut self, selector: IdFieldSelector) -> Self {
        self.id_field_selector = Some(selector);
        self
    }

    /// Replaces the merge strategy table.
    #[must_use]
    pub fn merge_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Runs the assembly.
    ///
    /// # Errors
    ///
    /// Any fragment, introspection or merge error aborts the whole assembly.
    pub fn assemble(self) -> Result<AssembledSchema, SchemaError> {
        let merger = DocumentMerger::new(self.strategy);

        let parsed = self
            .fragments
            .into_iter()
            .enumerate()
            .map(|(index, source)| source.parse(index))
            .collect::<Result<Vec<_>, _>>()?;
        let working = merger.merge(parsed)?;
        debug!(definitions = working.definitions.len(), "Merged schema fragments");

        let declared: HashSet<String> = working
            .definitions
            .iter()
            .filter_map(definition_name)
            .collect();

        let common = common_fragment(&self.namespace);
        let mut index = TypeIndex::new(&common);
        index.include(&working);

        let mut root_names: Vec<&str> = Vec::with_capacity(self.root_types.len());
        for name in &self.root_types {
            if !root_names.contains(&name.as_str()) {
                root_names.push(name);
            }
        }

        let mut descriptors: HashMap<String, TypeDescriptor> = HashMap::new();
        let mut definitions: Vec<&TypeDefinition> = Vec::with_capacity(root_names.len());
        for name in &root_names {
            let definition =
                find_type(&working, name).ok_or_else(|| SchemaError::UnknownRootType {
                    type_name: name.to_string(),
                })?;
            let descriptor = introspect(definition, &index, self.id_field_selector.as_ref())?;
            descriptors.insert(name.to_string(), descriptor);
            definitions.push(definition);
        }
        debug!(roots = root_names.len(), "Introspected root types");

        let mut synthesizer = Synthesizer::new(SynthesisContext {
            document: &working,
            index: &index,
            declared: &declared,
            roots: &descriptors,
            namespace: &self.namespace,
            timestamps: self.timestamps,
        });
        for (name, definition) in root_names.iter().zip(&definitions) {
            if let Some(descriptor) = descriptors.get(*name) {
                synthesizer.root_type(descriptor, definition)?;
            }
        }
        let synthesized = synthesizer.finish();
        debug!(
            definitions = synthesized.definitions.len(),
            "Synthesized derived types"
        );

        let roots = root_names
            .iter()
            .filter_map(|name| descriptors.remove(*name))
            .map(|descriptor| RootType {
                names: DerivedNames::new(&descriptor.type_name),
                descriptor,
                timestamps: self.timestamps,
            })
            .collect();

        let document = merger.merge([common, working, synthesized])?;
        Ok(AssembledSchema { document, roots })
    }
}
