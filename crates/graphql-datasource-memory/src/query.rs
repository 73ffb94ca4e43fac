//! Filter evaluation, ordering and cursor pagination over in-memory records.

use std::cmp::Ordering;

use base64::Engine;
use graphql_datasource_storage::{
    CollectionError, Edge, FilterClause, FilterOperation, ListOptions, OrderClause, Page,
    PageInfo, Record,
};
use serde_json::Value;

/// Encodes a record identifier as an opaque cursor.
pub fn encode_cursor(id: &str) -> String {
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(id)
}

/// Decodes a cursor back into a record identifier.
pub fn decode_cursor(cursor: &str) -> Option<String> {
    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(cursor)
        .ok()?;
    String::from_utf8(bytes).ok()
}

/// Reads a possibly dotted field path (`owner.name`) from a record.
pub fn get_field<'a>(record: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = record.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Check if a record matches a filter clause.
pub fn matches(record: &Record, clause: &FilterClause) -> bool {
    let Some(field_value) = get_field(record, &clause.field) else {
        return false;
    };
    let operand = clause.value.as_str();

    let ordering = || compare_to_operand(field_value, operand);
    match clause.op {
        FilterOperation::Contains => contains(field_value, operand),
        FilterOperation::Lt => ordering() == Some(Ordering::Less),
        FilterOperation::Lte => matches!(ordering(), Some(Ordering::Less | Ordering::Equal)),
        FilterOperation::Eq => ordering() == Some(Ordering::Equal),
        FilterOperation::Gte => matches!(ordering(), Some(Ordering::Greater | Ordering::Equal)),
        FilterOperation::Gt => ordering() == Some(Ordering::Greater),
    }
}

fn contains(field_value: &Value, operand: &str) -> bool {
    match field_value {
        Value::String(s) => s.to_lowercase().contains(&operand.to_lowercase()),
        Value::Array(items) => items.iter().any(|item| match item {
            Value::String(s) => s == operand,
            Value::Number(n) => n.to_string() == operand,
            Value::Bool(b) => b.to_string() == operand,
            _ => false,
        }),
        _ => false,
    }
}

/// Compares a stored value against a string operand.
///
/// Numbers compare numerically, strings lexicographically, booleans only for
/// equality. Anything else is incomparable.
fn compare_to_operand(field_value: &Value, operand: &str) -> Option<Ordering> {
    match field_value {
        Value::Number(n) => {
            let lhs = n.as_f64()?;
            let rhs = operand.parse::<f64>().ok()?;
            lhs.partial_cmp(&rhs)
        }
        Value::String(s) => Some(s.as_str().cmp(operand)),
        Value::Bool(b) => {
            let rhs = operand.parse::<bool>().ok()?;
            (*b == rhs).then_some(Ordering::Equal)
        }
        _ => None,
    }
}

/// Total order over JSON values used for sorting. Missing and null sort first.
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

fn sort_records(records: &mut [(String, Record)], order: &[OrderClause]) {
    records.sort_by(|(a_id, a), (b_id, b)| {
        for clause in order {
            let ordering = compare_values(get_field(a, &clause.field), get_field(b, &clause.field));
            let ordering = if clause.is_descending() {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        a_id.cmp(b_id)
    });
}

fn cursor_position(records: &[(String, Record)], cursor: &str) -> Result<usize, CollectionError> {
    let id = decode_cursor(cursor)
        .ok_or_else(|| CollectionError::invalid_record(format!("invalid cursor '{cursor}'")))?;
    records
        .iter()
        .position(|(record_id, _)| *record_id == id)
        .ok_or_else(|| CollectionError::invalid_record(format!("unknown cursor '{cursor}'")))
}

/// Applies filters, ordering and the cursor window to `records`.
pub fn execute(
    mut records: Vec<(String, Record)>,
    options: &ListOptions,
) -> Result<Page, CollectionError> {
    if let Some(filter) = &options.filter {
        records.retain(|(_, record)| filter.iter().all(|clause| matches(record, clause)));
    }

    sort_records(&mut records, options.order.as_deref().unwrap_or_default());

    let mut start = 0;
    let mut end = records.len();
    let mut page_info = PageInfo::default();

    if let Some(after) = &options.after {
        start = cursor_position(&records, after)? + 1;
        page_info.has_previous_page = true;
    }

    if let Some(before) = &options.before {
        let position = cursor_position(&records, before)?;
        if position < end {
            end = position;
            page_info.has_next_page = true;
        }
    }

    let start = start.min(end);

    if let Some(first) = options.first {
        let first = first as usize;
        if end - start > first {
            end = start + first;
            page_info.has_next_page = true;
        }
    }

    let mut start = start;
    if let Some(last) = options.last {
        let last = last as usize;
        if end - start > last {
            start = end - last;
            page_info.has_previous_page = true;
        }
    }

    let edges = records
        .drain(start..end)
        .map(|(id, node)| Edge {
            cursor: encode_cursor(&id),
            node,
        })
        .collect();

    Ok(Page { edges, page_info })
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_datasource_storage::OrderClause;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn fixture() -> Vec<(String, Record)> {
        vec![
            ("a".into(), record(json!({"id": "a", "name": "Anvil", "weight": 30}))),
            ("b".into(), record(json!({"id": "b", "name": "bolt", "weight": 1}))),
            ("c".into(), record(json!({"id": "c", "name": "Crate", "weight": 12}))),
            ("d".into(), record(json!({"id": "d", "name": "drill", "weight": 4, "tags": ["power"]}))),
        ]
    }

    fn ids(page: &Page) -> Vec<String> {
        page.edges
            .iter()
            .map(|edge| edge.node["id"].as_str().unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_cursor_encode_decode() {
        let cursor = encode_cursor("widget-1");
        assert_eq!(decode_cursor(&cursor).as_deref(), Some("widget-1"));
        assert!(decode_cursor("not-valid-base64!!!").is_none());
    }

    #[test]
    fn test_numeric_filters() {
        let r = record(json!({"weight": 12}));
        assert!(matches(&r, &FilterClause::new("weight", FilterOperation::Gt, "4")));
        assert!(matches(&r, &FilterClause::new("weight", FilterOperation::Lte, "12")));
        assert!(!matches(&r, &FilterClause::new("weight", FilterOperation::Lt, "12")));
        assert!(!matches(&r, &FilterClause::new("weight", FilterOperation::Eq, "heavy")));
    }

    #[test]
    fn test_string_and_array_contains() {
        let r = record(json!({"name": "Power Drill", "tags": ["power", "tool"]}));
        assert!(matches(&r, &FilterClause::new("name", FilterOperation::Contains, "drill")));
        assert!(matches(&r, &FilterClause::new("tags", FilterOperation::Contains, "tool")));
        assert!(!matches(&r, &FilterClause::new("missing", FilterOperation::Eq, "x")));
    }

    #[test]
    fn test_dotted_field_path() {
        let r = record(json!({"owner": {"name": "ada"}}));
        assert!(matches(&r, &FilterClause::new("owner.name", FilterOperation::Eq, "ada")));
    }

    #[test]
    fn test_order_descending_with_id_tiebreak() {
        let options = ListOptions::new().with_order(OrderClause::desc("weight"));
        let page = execute(fixture(), &options).unwrap();
        assert_eq!(ids(&page), vec!["a", "c", "d", "b"]);
    }

    #[test]
    fn test_forward_pagination() {
        let options = ListOptions::new().with_first(2);
        let page = execute(fixture(), &options).unwrap();
        assert_eq!(ids(&page), vec!["a", "b"]);
        assert!(page.page_info.has_next_page);
        assert!(!page.page_info.has_previous_page);

        let after = page.edges[1].cursor.clone();
        let options = ListOptions::new().with_first(2).with_after(after);
        let page = execute(fixture(), &options).unwrap();
        assert_eq!(ids(&page), vec!["c", "d"]);
        assert!(!page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_backward_pagination() {
        let options = ListOptions::new()
            .with_last(2)
            .with_before(encode_cursor("d"));
        let page = execute(fixture(), &options).unwrap();
        assert_eq!(ids(&page), vec!["b", "c"]);
        assert!(page.page_info.has_next_page);
        assert!(page.page_info.has_previous_page);
    }

    #[test]
    fn test_unknown_cursor_is_rejected() {
        let options = ListOptions::new().with_after(encode_cursor("zzz"));
        let err = execute(fixture(), &options).unwrap_err();
        assert!(err.to_string().contains("unknown cursor"));
    }
}
