//! Splitting caller arguments into path, query and ignored parameters.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::registry::EndpointDescriptor;

/// Caller arguments sorted by where they end up in the request.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Classified<'a> {
    /// Raw values keyed by path parameter name; encoding happens in
    /// [`crate::resolve`].
    pub path: BTreeMap<&'a str, &'a Value>,
    /// Coerced query pairs in the descriptor's declaration order.
    pub query: Vec<(String, String)>,
    /// Keys the endpoint does not know about, in argument order.
    pub ignored: Vec<String>,
}

/// Classify `args` against `descriptor`.
///
/// Path parameters take precedence over query parameters of the same name.
/// Unknown keys are logged and dropped, never rejected. Null values count
/// as not supplied.
pub fn classify<'a>(descriptor: &EndpointDescriptor, args: &'a Map<String, Value>) -> Classified<'a> {
    let mut classified = Classified::default();

    for (key, value) in args {
        if value.is_null() {
            continue;
        }
        if descriptor.path_param(key).is_some() {
            classified.path.insert(key.as_str(), value);
        } else if !descriptor.accepts_query(key) {
            debug!(endpoint = descriptor.name(), parameter = %key, "ignoring parameter not defined by endpoint");
            classified.ignored.push(key.clone());
        }
    }

    for name in descriptor.query_params() {
        if descriptor.path_param(name).is_some() {
            continue;
        }
        match args.get(name) {
            Some(value) if !value.is_null() => {
                classified.query.push((name.clone(), value_text(value)));
            }
            _ => {}
        }
    }

    classified
}

/// True when `key` is present in `args` with a non-null value.
pub fn is_supplied(args: &Map<String, Value>, key: &str) -> bool {
    args.get(key).is_some_and(|v| !v.is_null())
}

/// Canonical text for an argument value. Arrays become comma-separated
/// lists, which is how the upstream API takes multi-valued parameters.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}
