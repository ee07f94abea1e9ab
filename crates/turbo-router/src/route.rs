//! Structured route descriptors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Query string parameters, also used as the source of placeholder values.
pub type Query = BTreeMap<String, String>;

/// A route within the application.
///
/// The pathname is the page template and may contain `[name]` placeholders.
/// Their values live in the query alongside any extra parameters:
///
/// ```rust
/// use turbo_router::Route;
///
/// let route = Route::new("/admin/orders/[uuid]")
///     .with_query("uuid", "1")
///     .with_query("tab", "requests");
///
/// assert_eq!(route.params(), vec!["uuid".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Route {
    /// Page template, e.g. `/product/[id]`.
    pub pathname: String,
    /// Placeholder values and extra query parameters.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
}

impl Route {
    /// Create a route without a query.
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            query: None,
        }
    }

    /// Add a single query entry.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query
            .get_or_insert_with(Query::new)
            .insert(key.into(), value.into());
        self
    }

    /// Replace the whole query.
    pub fn with_query_map(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    /// Placeholder names declared by the pathname.
    pub fn params(&self) -> Vec<String> {
        crate::find_parameters(&self.pathname)
    }

    /// Whether the pathname carries a `#` fragment marker.
    pub fn has_fragment(&self) -> bool {
        self.pathname.contains('#')
    }
}

impl From<&str> for Route {
    fn from(pathname: &str) -> Self {
        Self::new(pathname)
    }
}

impl From<String> for Route {
    fn from(pathname: String) -> Self {
        Self::new(pathname)
    }
}

/// Options passed through to the host router untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteOptions {
    /// Update the URL without re-running data loading on the page.
    #[serde(default)]
    pub shallow: bool,
}

impl RouteOptions {
    /// Options for a shallow navigation.
    pub fn shallow() -> Self {
        Self { shallow: true }
    }
}

/// Which host navigation method to call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationKind {
    /// Add a history entry.
    Push,
    /// Replace the current history entry.
    Replace,
}

impl std::fmt::Display for NavigationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Push => write!(f, "push"),
            Self::Replace => write!(f, "replace"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_new_has_no_query() {
        let route = Route::new("/about");

        assert_eq!(route.pathname, "/about");
        assert!(route.query.is_none());
    }

    #[test]
    fn test_route_with_query_builds_map() {
        let route = Route::new("/product/[id]")
            .with_query("id", "42")
            .with_query("color", "red");

        let query = route.query.unwrap();
        assert_eq!(query.get("id").map(String::as_str), Some("42"));
        assert_eq!(query.get("color").map(String::as_str), Some("red"));
    }

    #[test]
    fn test_route_has_fragment() {
        assert!(Route::new("/docs#install").has_fragment());
        assert!(!Route::new("/docs").has_fragment());
    }

    #[test]
    fn test_route_deserialize_without_query() {
        let route: Route = serde_json::from_str(r#"{"pathname":"/cart"}"#).unwrap();

        assert_eq!(route, Route::new("/cart"));
    }

    #[test]
    fn test_route_serialize_skips_missing_query() {
        let json = serde_json::to_string(&Route::new("/cart")).unwrap();

        assert_eq!(json, r#"{"pathname":"/cart"}"#);
    }

    #[test]
    fn test_route_options_default_is_not_shallow() {
        assert!(!RouteOptions::default().shallow);
        assert!(RouteOptions::shallow().shallow);
    }

    #[test]
    fn test_navigation_kind_display() {
        assert_eq!(NavigationKind::Push.to_string(), "push");
        assert_eq!(NavigationKind::Replace.to_string(), "replace");
    }
}
