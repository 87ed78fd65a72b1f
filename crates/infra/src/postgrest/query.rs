//! PostgREST query-string encoding
//!
//! Filters travel as `column=op.value` pairs. Values are rendered without
//! JSON quoting; `reqwest` takes care of percent-encoding.

use linkbio_core::profile::{Filter, Order, SelectQuery};
use serde_json::Value;

/// Query parameter list as passed to `RequestBuilder::query`.
pub type Params = Vec<(String, String)>;

/// Render a scalar for use after `eq.`.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// `column=eq.value`, or `column=is.null` for a null value.
pub fn filter_param(filter: &Filter) -> (String, String) {
    let condition = match &filter.value {
        Value::Null => "is.null".to_string(),
        value => format!("eq.{}", render_value(value)),
    };
    (filter.column.clone(), condition)
}

/// `column=in.("a","b")`. Every item is double-quoted so reserved
/// characters inside values cannot break the list.
pub fn in_param(column: &str, values: &[Value]) -> (String, String) {
    let items: Vec<String> = values
        .iter()
        .map(|value| {
            let text = render_value(value).replace('\\', "\\\\").replace('"', "\\\"");
            format!("\"{text}\"")
        })
        .collect();
    (column.to_string(), format!("in.({})", items.join(",")))
}

pub fn order_param(order: &Order) -> (String, String) {
    let direction = if order.ascending { "asc" } else { "desc" };
    ("order".to_string(), format!("{}.{direction}", order.column))
}

/// Parameters for a select: projection, filters and ordering.
pub fn select_params(query: &SelectQuery) -> Params {
    let columns: String = query
        .columns
        .as_deref()
        .map(|columns| columns.split(',').map(str::trim).collect::<Vec<_>>().join(","))
        .unwrap_or_else(|| "*".to_string());

    let mut params = vec![("select".to_string(), columns)];
    params.extend(query.filters.iter().map(filter_param));
    if let Some(order) = &query.order {
        params.push(order_param(order));
    }
    params
}
