//! `[name]` placeholder templating for page pathnames.

use crate::route::Query;

/// Find all placeholder names within a pathname, in order.
///
/// A placeholder is `[` followed by one or more ASCII letters or digits and a
/// closing `]`. Duplicates are kept.
pub fn find_parameters(pathname: &str) -> Vec<String> {
    let bytes = pathname.as_bytes();
    let mut found = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }

        let start = i + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_alphanumeric() {
            end += 1;
        }

        if end > start && end < bytes.len() && bytes[end] == b']' {
            // ASCII-only span, always a char boundary.
            found.push(pathname[start..end].to_string());
            i = end + 1;
        } else {
            i += 1;
        }
    }

    found
}

/// Replace placeholders with values from the query.
///
/// Only the first occurrence of each `[key]` is replaced. Keys that are not
/// placeholders are ignored, and placeholders without a key stay literal.
pub fn replace_parameters(pathname: &str, query: Option<&Query>) -> String {
    let Some(query) = query else {
        return pathname.to_string();
    };

    query.iter().fold(pathname.to_string(), |path, (key, value)| {
        path.replacen(&format!("[{key}]"), value, 1)
    })
}

/// Return a copy of the query without the entries consumed by placeholders.
pub fn remove_parameters(pathname: &str, query: &Query) -> Query {
    let params = find_parameters(pathname);
    query
        .iter()
        .filter(|(key, _)| !params.contains(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
