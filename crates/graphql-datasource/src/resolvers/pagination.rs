//! List arguments and page-size clamping.

use async_graphql::dynamic::ResolverContext;
use graphql_datasource_storage::{FilterClause, ListOptions, OrderClause};
use serde::de::DeserializeOwned;

use super::{id_argument, value_accessor_to_json};
use crate::error::ResolverError;

/// Clamps a requested page size: positive values are capped at `max`,
/// anything else means "unspecified".
pub fn clamp_page_size(requested: Option<i64>, max: u32) -> Option<u32> {
    match requested {
        Some(n) if n > 0 => Some(u32::try_from(n).map_or(max, |n| n.min(max))),
        _ => None,
    }
}

/// Raw `TQuery.list` arguments before clamping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArguments {
    /// `before` cursor.
    pub before: Option<String>,
    /// `after` cursor.
    pub after: Option<String>,
    /// Requested `first`.
    pub first: Option<i64>,
    /// Requested `last`.
    pub last: Option<i64>,
    /// Order clauses.
    pub order: Option<Vec<OrderClause>>,
    /// Filter clauses.
    pub filter: Option<Vec<FilterClause>>,
}

impl ListArguments {
    /// Reads the list arguments of a resolver call.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for arguments of the wrong shape.
    pub fn from_context(ctx: &ResolverContext<'_>) -> Result<Self, ResolverError> {
        Ok(Self {
            before: id_argument(ctx, "before")?,
            after: id_argument(ctx, "after")?,
            first: int_argument(ctx, "first")?,
            last: int_argument(ctx, "last")?,
            order: clauses_argument(ctx, "order")?,
            filter: clauses_argument(ctx, "filter")?,
        })
    }

    /// Converts to collection options, clamping `first`/`last` to `max_page_size`.
    /// Cursors, order and filter pass through unchanged.
    pub fn into_options(self, max_page_size: u32) -> ListOptions {
        ListOptions {
            filter: self.filter,
            order: self.order,
            before: self.before,
            after: self.after,
            first: clamp_page_size(self.first, max_page_size),
            last: clamp_page_size(self.last, max_page_size),
        }
    }
}

fn int_argument(ctx: &ResolverContext<'_>, name: &str) -> Result<Option<i64>, ResolverError> {
    match ctx.args.get(name) {
        None => Ok(None),
        Some(value) if value.is_null() => Ok(None),
        Some(value) => value
            .i64()
            .map(Some)
            .map_err(|_| ResolverError::invalid_argument(name, "expected an integer")),
    }
}

fn clauses_argument<T: DeserializeOwned>(
    ctx: &ResolverContext<'_>,
    name: &str,
) -> Result<Option<Vec<T>>, ResolverError> {
    let Some(value) = ctx.args.get(name) else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value_accessor_to_json(&value))
        .map(Some)
        .map_err(|e| ResolverError::invalid_argument(name, e.to_string()))
}
