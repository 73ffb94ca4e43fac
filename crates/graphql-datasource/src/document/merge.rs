//! Document merge engine.
//!
//! Merging is a left-to-right fold: definitions of a later document either
//! append to, replace, or (for the operation root types) union with the
//! same-named definition accumulated so far.

use std::collections::HashMap;

use async_graphql_parser::types::{
    ObjectType, ServiceDocument, TypeDefinition, TypeKind, TypeSystemDefinition,
};
use tracing::trace;

use super::ast::{definition_kind, definition_name};
use crate::error::SchemaError;

/// How a name collision between two definitions is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// The later definition replaces the earlier one in place.
    Override,
    /// Directives, interfaces and fields are unioned by name; later entries win.
    FieldUnion,
}

/// Per-name merge policy table.
#[derive(Debug, Clone)]
pub struct MergeStrategy {
    policies: HashMap<String, MergePolicy>,
    fallback: MergePolicy,
}

impl Default for MergeStrategy {
    fn default() -> Self {
        let policies = ["Query", "Mutation", "Subscription"]
            .into_iter()
            .map(|name| (name.to_string(), MergePolicy::FieldUnion))
            .collect();
        Self {
            policies,
            fallback: MergePolicy::Override,
        }
    }
}

impl MergeStrategy {
    /// Sets the policy for one definition name.
    #[must_use]
    pub fn with_policy(mut self, name: impl Into<String>, policy: MergePolicy) -> Self {
        self.policies.insert(name.into(), policy);
        self
    }

    /// Returns the policy for `name`.
    pub fn policy_for(&self, name: &str) -> MergePolicy {
        self.policies.get(name).copied().unwrap_or(self.fallback)
    }
}

/// Merges documents according to a [`MergeStrategy`].
#[derive(Debug, Clone, Default)]
pub struct DocumentMerger {
    strategy: MergeStrategy,
}

impl DocumentMerger {
    /// Creates a merger with a custom strategy table.
    pub fn new(strategy: MergeStrategy) -> Self {
        Self { strategy }
    }

    /// Folds `documents` into one, later documents winning.
    ///
    /// Empty documents before the first non-empty one are skipped; merging no
    /// documents yields an empty document.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::UnnamedDefinition` if any document contains a
    /// `schema { ... }` block.
    pub fn merge<I>(&self, documents: I) -> Result<ServiceDocument, SchemaError>
    where
        I: IntoIterator<Item = ServiceDocument>,
    {
        let mut documents = documents
            .into_iter()
            .skip_while(|document| document.definitions.is_empty());

        let Some(first) = documents.next() else {
            return Ok(ServiceDocument {
                definitions: Vec::new(),
            });
        };

        let mut merged = Vec::with_capacity(first.definitions.len());
        let mut positions: HashMap<String, usize> = HashMap::new();
        self.merge_into(&mut merged, &mut positions, first)?;
        for document in documents {
            self.merge_into(&mut merged, &mut positions, document)?;
        }

        Ok(ServiceDocument {
            definitions: merged,
        })
    }

    fn merge_into(
        &self,
        merged: &mut Vec<TypeSystemDefinition>,
        positions: &mut HashMap<String, usize>,
        document: ServiceDocument,
    ) -> Result<(), SchemaError> {
        for definition in document.definitions {
            let Some(name) = definition_name(&definition) else {
                return Err(SchemaError::UnnamedDefinition {
                    kind: definition_kind(&definition),
                });
            };

            let Some(&index) = positions.get(&name) else {
                positions.insert(name, merged.len());
                merged.push(definition);
                continue;
            };

            match self.strategy.policy_for(&name) {
                MergePolicy::FieldUnion => {
                    trace!(name = %name, "Unioning definition fields");
                    union_into(&mut merged[index], definition);
                }
                MergePolicy::Override => {
                    trace!(name = %name, "Overriding definition");
                    merged[index] = definition;
                }
            }
        }
        Ok(())
    }
}

fn is_object(definition: &TypeDefinition) -> bool {
    matches!(definition.kind, TypeKind::Object(_))
}

/// Unions two object definitions. Any other pair falls back to override.
fn union_into(existing: &mut TypeSystemDefinition, incoming: TypeSystemDefinition) {
    match (existing, incoming) {
        (TypeSystemDefinition::Type(existing), TypeSystemDefinition::Type(incoming))
            if is_object(&existing.node) && is_object(&incoming.node) =>
        {
            union_objects(&mut existing.node, incoming.node);
        }
        (existing, incoming) => *existing = incoming,
    }
}

fn union_objects(existing: &mut TypeDefinition, incoming: TypeDefinition) {
    let TypeDefinition {
        description,
        directives,
        kind,
        ..
    } = incoming;

    if let (TypeKind::Object(target), TypeKind::Object(ObjectType { implements, fields })) =
        (&mut existing.kind, kind)
    {
        union_by_name(&mut target.implements, implements, |n| n.node.to_string());
        union_by_name(&mut target.fields, fields, |f| f.node.name.node.to_string());
    }
    union_by_name(&mut existing.directives, directives, |d| {
        d.node.name.node.to_string()
    });
    if description.is_some() {
        existing.description = description;
    }
}

/// Replaces same-named entries of `target` in place and appends new ones.
fn union_by_name<T>(target: &mut Vec<T>, incoming: Vec<T>, key: impl Fn(&T) -> String) {
    for item in incoming {
        let item_key = key(&item);
        match target.iter().position(|existing| key(existing) == item_key) {
            Some(index) => target[index] = item,
            None => target.push(item),
        }
    }
}

/// Merges documents with the default strategy.
///
/// # Errors
///
/// See [`DocumentMerger::merge`].
pub fn merge_documents<I>(documents: I) -> Result<ServiceDocument, SchemaError>
where
    I: IntoIterator<Item = ServiceDocument>,
{
    DocumentMerger::default().merge(documents)
}
