//! Route to URL string formatting.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::host::HostRouter;
use crate::params::{remove_parameters, replace_parameters};
use crate::route::{Query, Route};

/// Turn a route into a real path using the router's base path.
///
/// Placeholders are filled from the query and the remaining query entries
/// become the query string.
pub fn route_to_string<R: HostRouter + ?Sized>(router: &R, route: &Route) -> String {
    let base_path = router.base_path().unwrap_or_default();
    format_route(&base_path, route)
}

/// Same as [`route_to_string`] with an explicit base path.
pub fn format_route(base_path: &str, route: &Route) -> String {
    let empty = Query::new();
    let query = route.query.as_ref().unwrap_or(&empty);

    let pathname = format!(
        "{}{}",
        base_path,
        replace_parameters(&route.pathname, Some(query))
    );
    let rest = remove_parameters(&route.pathname, query);

    let mut href = escape_path(&pathname);
    if !rest.is_empty() {
        href.push('?');
        href.push_str(&encode_query(&rest));
    }
    href
}

/// Bytes left as-is in query keys and values. Matches Node's `querystring`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Serialize a query map as `k=v&...`.
///
/// Spaces become `%20`; `! ' ( ) * ~` stay unescaped.
pub fn encode_query(query: &Query) -> String {
    query
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, QUERY_COMPONENT),
                utf8_percent_encode(value, QUERY_COMPONENT)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

// `?` and `#` in the path would otherwise start the query or fragment.
fn escape_path(pathname: &str) -> String {
    pathname.replace('?', "%3F").replace('#', "%23")
}
