//! Schema derivation.
//!
//! - `field_type`: kind-resolved field types
//! - `introspect`: identifier and data field discovery
//! - `common`: the shared `DataSource*` primitives
//! - `synthesize`: derived inputs, connections, query and mutation types
//! - `assembler`: the synchronous parse/merge/derive pipeline
//! - `builder`: assembly plus collection binding

mod assembler;
mod builder;
mod common;
mod field_type;
mod introspect;
mod synthesize;

pub use assembler::{AssembledSchema, RootType, SchemaAssembler};
pub use builder::DataSourceSchemaBuilder;
pub use common::{Namespace, common_fragment};
pub use field_type::{BUILTIN_SCALARS, FieldType, NamedKind, TypeIndex};
pub use introspect::{
    FieldDescriptor, IdFieldSelector, TypeDescriptor, first_non_null_id_field, introspect,
    object_fields,
};
pub(crate) use introspect::resolve_field_type;
pub use synthesize::{DerivedNames, InputShape, SynthesisContext, Synthesizer, TIMESTAMP_FIELDS};
