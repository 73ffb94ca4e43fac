//! Data types exchanged with collection backends.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A stored record: a JSON object keyed by field name.
pub type Record = Map<String, Value>;

/// Comparison operators accepted in list filters.
///
/// Serialized with the same names as the `DataSourceFilterOperation` enum
/// values (`LT`, `LTE`, `EQ`, `GTE`, `GT`, `CONTAINS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FilterOperation {
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Equal.
    Eq,
    /// Greater than or equal.
    Gte,
    /// Strictly greater than.
    Gt,
    /// Substring or element containment.
    Contains,
}

impl FilterOperation {
    /// All operations, in the order they are declared in the schema enum.
    pub const ALL: [FilterOperation; 6] = [
        Self::Lt,
        Self::Lte,
        Self::Eq,
        Self::Gte,
        Self::Gt,
        Self::Contains,
    ];

    /// Returns the schema enum value name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lt => "LT",
            Self::Lte => "LTE",
            Self::Eq => "EQ",
            Self::Gte => "GTE",
            Self::Gt => "GT",
            Self::Contains => "CONTAINS",
        }
    }
}

/// A single `{field, op, value}` filter clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    /// Field the clause applies to.
    pub field: String,
    /// Comparison operator.
    pub op: FilterOperation,
    /// Comparison operand, always transported as a string.
    pub value: String,
}

impl FilterClause {
    /// Creates a new filter clause.
    pub fn new(field: impl Into<String>, op: FilterOperation, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }
}

/// A single `{field, desc}` ordering clause.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderClause {
    /// Field to order by.
    pub field: String,
    /// Descending when `Some(true)`; absent or `false` means ascending.
    #[serde(default)]
    pub desc: Option<bool>,
}

impl OrderClause {
    /// Ascending order on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            desc: Some(false),
        }
    }

    /// Descending order on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            desc: Some(true),
        }
    }

    /// Returns `true` when the clause sorts descending.
    #[must_use]
    pub fn is_descending(&self) -> bool {
        self.desc.unwrap_or(false)
    }
}

/// Options passed to [`Collection::list`](crate::Collection::list).
///
/// The collection is the sole authority on cursor semantics and on how
/// filters and ordering are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    /// Filter clauses, combined with logical AND.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Vec<FilterClause>>,

    /// Ordering clauses, most significant first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Vec<OrderClause>>,

    /// Return only edges before this cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,

    /// Return only edges after this cursor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,

    /// Return at most this many edges from the start of the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,

    /// Return at most this many edges from the end of the window.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
}

impl ListOptions {
    /// Creates empty list options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter clause.
    pub fn with_filter(mut self, clause: FilterClause) -> Self {
        self.filter.get_or_insert_with(Vec::new).push(clause);
        self
    }

    /// Appends an order clause.
    pub fn with_order(mut self, clause: OrderClause) -> Self {
        self.order.get_or_insert_with(Vec::new).push(clause);
        self
    }

    /// Sets the `first` page size.
    pub fn with_first(mut self, first: u32) -> Self {
        self.first = Some(first);
        self
    }

    /// Sets the `last` page size.
    pub fn with_last(mut self, last: u32) -> Self {
        self.last = Some(last);
        self
    }

    /// Sets the `after` cursor.
    pub fn with_after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }

    /// Sets the `before` cursor.
    pub fn with_before(mut self, cursor: impl Into<String>) -> Self {
        self.before = Some(cursor.into());
        self
    }
}

/// One edge of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// The record.
    pub node: Record,
    /// Opaque cursor addressing this edge.
    pub cursor: String,
}

/// Pagination flags of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// More edges exist after the last edge of this page.
    pub has_next_page: bool,
    /// More edges exist before the first edge of this page.
    pub has_previous_page: bool,
}

/// Result of a list operation.
///
/// Serializes to the `{ edges, pageInfo }` shape of the generated connection
/// types.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Edges in this page.
    pub edges: Vec<Edge>,
    /// Pagination flags.
    pub page_info: PageInfo,
}

impl Page {
    /// Creates an empty page.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the number of edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the page has no edges.
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Extracts a record from a JSON value, rejecting anything but objects.
pub fn record_from_value(value: Value) -> Result<Record, crate::CollectionError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Record::new()),
        other => Err(crate::CollectionError::invalid_record(format!(
            "expected an object, got {other}"
        ))),
    }
}
