//! Router helper configuration.

use serde::{Deserialize, Serialize};

/// How [`Router::is_route_active`](crate::Router::is_route_active) compares
/// the current page template against a link's pathname.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActiveMatch {
    /// Plain string prefix. `/a` is active on `/ab` too.
    #[default]
    Prefix,
    /// Prefix ending on a path segment boundary. `/a` is active on `/a` and
    /// `/a/b` but not on `/ab`.
    Segment,
}

impl ActiveMatch {
    /// Whether `current` counts as inside `pathname`.
    pub fn matches(self, current: &str, pathname: &str) -> bool {
        match self {
            Self::Prefix => current.starts_with(pathname),
            Self::Segment => match current.strip_prefix(pathname) {
                None => false,
                Some(rest) => {
                    rest.is_empty()
                        || pathname.ends_with('/')
                        || rest.starts_with('/')
                        || rest.starts_with('?')
                        || rest.starts_with('#')
                }
            },
        }
    }
}

/// Configuration for a [`Router`](crate::Router).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Active-route matching mode.
    pub active_match: ActiveMatch,
    /// Scroll to the top and focus the body after navigating to a pathname
    /// containing `#`.
    pub scroll_on_hash: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            active_match: ActiveMatch::Prefix,
            scroll_on_hash: true,
        }
    }
}

impl RouterConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the active-route matching mode.
    pub fn with_active_match(mut self, mode: ActiveMatch) -> Self {
        self.active_match = mode;
        self
    }

    /// Enable or disable the hash-navigation scroll and focus.
    pub fn with_scroll_on_hash(mut self, enabled: bool) -> Self {
        self.scroll_on_hash = enabled;
        self
    }
}
