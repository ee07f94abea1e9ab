//! Route-object helpers over a host router.

use std::str::FromStr;
use std::sync::Arc;

use crate::click::ClickHandler;
use crate::config::RouterConfig;
use crate::error::RouteError;
use crate::host::{HostRouter, NoopViewport, Viewport};
use crate::href::route_to_string;
use crate::params::{find_parameters, remove_parameters, replace_parameters};
use crate::route::{NavigationKind, Route, RouteOptions};

/// Wraps a host router so callers work with [`Route`] objects instead of
/// strings.
///
/// Cloning is cheap and clones share the same host.
#[derive(Clone)]
pub struct Router {
    host: Arc<dyn HostRouter>,
    viewport: Arc<dyn Viewport>,
    config: RouterConfig,
}

impl Router {
    /// Wrap a host router.
    pub fn new(host: impl HostRouter + 'static) -> Self {
        Self::from_arc(Arc::new(host))
    }

    /// Wrap a shared host router.
    pub fn from_arc(host: Arc<dyn HostRouter>) -> Self {
        Self {
            host,
            viewport: Arc::new(NoopViewport),
            config: RouterConfig::default(),
        }
    }

    /// Set the viewport that receives hash-navigation side effects.
    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Arc::new(viewport);
        self
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// The wrapped host router.
    pub fn host(&self) -> &Arc<dyn HostRouter> {
        &self.host
    }

    /// The configuration.
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Read a value from the current query.
    pub fn query(&self, key: &str) -> Option<String> {
        self.host.query().get(key).cloned()
    }

    /// Read and parse a value from the current query.
    pub fn query_as<T: FromStr>(&self, key: &str) -> Result<Option<T>, RouteError> {
        self.query(key)
            .map(|value| parse_value(key, value))
            .transpose()
    }

    /// Read a route parameter of the current page.
    ///
    /// Fails when the current page template does not declare `[key]`, or
    /// when the query has no non-empty value for it.
    pub fn param(&self, key: &str) -> Result<String, RouteError> {
        let route = self.host.route();
        if !find_parameters(&route).iter().any(|p| p == key) {
            return Err(RouteError::UndeclaredParameter {
                key: key.to_string(),
                route,
            });
        }

        match self.query(key) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(RouteError::MissingParameterValue(key.to_string())),
        }
    }

    /// Read and parse a route parameter of the current page.
    pub fn param_as<T: FromStr>(&self, key: &str) -> Result<T, RouteError> {
        parse_value(key, self.param(key)?)
    }

    /// Prefetch a route. Only the pathname is used.
    pub async fn prefetch(&self, route: &Route) -> Result<(), RouteError> {
        self.host.prefetch(&route.pathname).await
    }

    /// Push a route, generating both the template and the display URL.
    ///
    /// ```rust,ignore
    /// router.push_route(
    ///     &Route::new("/admin/orders/[uuid]")
    ///         .with_query("uuid", "1")
    ///         .with_query("tab", "requests"),
    ///     RouteOptions::default(),
    /// ).await?;
    /// ```
    pub async fn push_route(&self, route: &Route, options: RouteOptions) -> Result<bool, RouteError> {
        self.navigate(route, NavigationKind::Push, options).await
    }

    /// Replace the current history entry with a route.
    pub async fn replace_route(
        &self,
        route: &Route,
        options: RouteOptions,
    ) -> Result<bool, RouteError> {
        self.navigate(route, NavigationKind::Replace, options).await
    }

    /// Call the host's push or replace with the canonical route and its
    /// resolved display form.
    pub async fn navigate(
        &self,
        route: &Route,
        kind: NavigationKind,
        options: RouteOptions,
    ) -> Result<bool, RouteError> {
        let canonical = route.clone();
        let query = route.query.clone().unwrap_or_default();
        let resolved = Route {
            pathname: replace_parameters(&route.pathname, route.query.as_ref()),
            query: Some(remove_parameters(&route.pathname, &query)),
        };

        tracing::debug!(
            %kind,
            pathname = %canonical.pathname,
            resolved = %resolved.pathname,
            shallow = options.shallow,
            "navigating"
        );

        let success = match kind {
            NavigationKind::Push => self.host.push(canonical, resolved, options).await?,
            NavigationKind::Replace => self.host.replace(canonical, resolved, options).await?,
        };

        if success && self.config.scroll_on_hash && route.has_fragment() {
            tracing::trace!(pathname = %route.pathname, "hash navigation, resetting scroll");
            self.viewport.scroll_to(0.0, 0.0);
            self.viewport.focus_body();
        }

        Ok(success)
    }

    /// Build a link object for anchors and buttons.
    ///
    /// `options` apply to clicks as well as to [`Link::push`] and
    /// [`Link::replace`].
    pub fn create_link(&self, route: &Route, options: RouteOptions) -> Link {
        Link {
            is_active: self.is_route_active(route),
            href: self.create_href(route),
            on_click: self.create_click_handler(route, options),
            router: self.clone(),
            route: route.clone(),
            options,
        }
    }

    /// Build an href string for a route.
    pub fn create_href(&self, route: &Route) -> String {
        route_to_string(self.host.as_ref(), route)
    }

    /// Build a click handler that pushes the route.
    pub fn create_click_handler(&self, route: &Route, options: RouteOptions) -> ClickHandler {
        ClickHandler::new(self.clone(), route.clone(), options)
    }

    /// Whether the current page lives under the route's pathname.
    pub fn is_route_active(&self, route: &Route) -> bool {
        self.config
            .active_match
            .matches(&self.host.route(), &route.pathname)
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("route", &self.host.route())
            .field("config", &self.config)
            .finish()
    }
}

fn parse_value<T: FromStr>(key: &str, value: String) -> Result<T, RouteError> {
    value.parse().map_err(|_| RouteError::InvalidParameter {
        key: key.to_string(),
        value,
    })
}

/// Everything an anchor or button needs to link to a route.
#[derive(Debug, Clone)]
pub struct Link {
    /// Whether the current page lives under the route.
    pub is_active: bool,
    /// Formatted URL.
    pub href: String,
    /// Click handler that pushes the route.
    pub on_click: ClickHandler,
    router: Router,
    route: Route,
    options: RouteOptions,
}

impl Link {
    /// Push the linked route.
    pub async fn push(&self) -> Result<bool, RouteError> {
        self.router.push_route(&self.route, self.options).await
    }

    /// Replace the current history entry with the linked route.
    pub async fn replace(&self) -> Result<bool, RouteError> {
        self.router.replace_route(&self.route, self.options).await
    }

    /// The linked route.
    pub fn route(&self) -> &Route {
        &self.route
    }
}
