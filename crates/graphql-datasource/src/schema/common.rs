//! Shared primitives injected into every assembled document.

use async_graphql_parser::types::ServiceDocument;
use graphql_datasource_storage::FilterOperation;

use crate::document::ast::{
    enum_type, field, input_object_type, input_value, named_type, object_type,
};

/// Naming of the shared `DataSource*` primitives, suffixed by a namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespace {
    suffix: String,
}

impl Namespace {
    /// A namespace with the given suffix; `None` means no suffix.
    pub fn new(suffix: Option<&str>) -> Self {
        Self {
            suffix: suffix.unwrap_or_default().to_string(),
        }
    }

    /// The suffix, possibly empty.
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    fn qualify(&self, base: &str) -> String {
        format!("{base}{}", self.suffix)
    }

    /// `DataSourceFilterOperation{ns}`
    pub fn filter_operation(&self) -> String {
        self.qualify("DataSourceFilterOperation")
    }

    /// `DataSourceOrderInput{ns}`
    pub fn order_input(&self) -> String {
        self.qualify("DataSourceOrderInput")
    }

    /// `DataSourceFilterInput{ns}`
    pub fn filter_input(&self) -> String {
        self.qualify("DataSourceFilterInput")
    }

    /// `DataSourcePageInfo{ns}`
    pub fn page_info(&self) -> String {
        self.qualify("DataSourcePageInfo")
    }
}

/// Builds the shared fragment: the filter operation enum, order and filter
/// inputs and the page-info object.
pub fn common_fragment(namespace: &Namespace) -> ServiceDocument {
    let operations: Vec<&str> = FilterOperation::ALL.iter().map(|op| op.as_str()).collect();
    let filter_operation = namespace.filter_operation();

    ServiceDocument {
        definitions: vec![
            enum_type(&filter_operation, &operations),
            input_object_type(
                &namespace.order_input(),
                vec![
                    input_value("field", named_type("String", false)),
                    input_value("desc", named_type("Boolean", true)),
                ],
            ),
            input_object_type(
                &namespace.filter_input(),
                vec![
                    input_value("field", named_type("String", false)),
                    input_value("op", named_type(&filter_operation, false)),
                    input_value("value", named_type("String", false)),
                ],
            ),
            object_type(
                &namespace.page_info(),
                vec![
                    field("hasNextPage", named_type("Boolean", true)),
                    field("hasPreviousPage", named_type("Boolean", true)),
                ],
            ),
        ],
    }
}
