//! Type-system documents: parsing, loading, merging and printing.

pub mod ast;
mod loader;
mod merge;
mod print;
mod source;

pub use loader::{load_schema_dir, load_schema_file};
pub use merge::{DocumentMerger, MergePolicy, MergeStrategy, merge_documents};
pub use print::print_document;
pub use source::DocumentSource;
