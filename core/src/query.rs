//! Query string construction.

use crate::encode::query_component;

/// Join `pairs` into `k=v&k=v`, percent-encoding keys and values. Returns an
/// empty string for no pairs.
pub fn build(pairs: &[(String, String)]) -> String {
    let mut query = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            query.push('&');
        }
        query.push_str(&query_component(key));
        query.push('=');
        query.push_str(&query_component(value));
    }
    query
}

/// Append the query for `pairs` to `url`. No `?` is added when there are no
/// pairs.
pub fn append(url: &mut String, pairs: &[(String, String)]) {
    if pairs.is_empty() {
        return;
    }
    url.push('?');
    url.push_str(&build(pairs));
}
