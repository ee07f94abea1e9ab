//! The host router seam.
//!
//! These helpers never navigate on their own. Everything goes through a
//! [`HostRouter`] supplied by the application (or [`MockHostRouter`] in
//! tests), and DOM side effects go through a [`Viewport`].
//!
//! [`MockHostRouter`]: crate::MockHostRouter

use async_trait::async_trait;

use crate::error::RouteError;
use crate::events::RouterEvents;
use crate::route::{Query, Route, RouteOptions};

/// Callback consulted before the host handles a history pop. Receives the
/// target URL and returns `false` to cancel.
pub type BeforePopState = Box<dyn Fn(&str) -> bool + Send + Sync>;

/// The fields and methods of a host router that the helpers consume.
#[async_trait]
pub trait HostRouter: Send + Sync {
    /// Current path as shown in the address bar, without query.
    fn pathname(&self) -> String;

    /// Current page template, e.g. `/product/[id]`.
    fn route(&self) -> String;

    /// Current path including query, as shown in the address bar.
    fn as_path(&self) -> String;

    /// Current query, including placeholder values.
    fn query(&self) -> Query;

    /// Path prefix the application is mounted under.
    fn base_path(&self) -> Option<String> {
        None
    }

    /// Navigate to `url` (page template form), displaying `as_url`.
    async fn push(
        &self,
        url: Route,
        as_url: Route,
        options: RouteOptions,
    ) -> Result<bool, RouteError>;

    /// Like [`push`](Self::push) but replaces the current history entry.
    async fn replace(
        &self,
        url: Route,
        as_url: Route,
        options: RouteOptions,
    ) -> Result<bool, RouteError>;

    /// Warm up the page at `pathname`.
    async fn prefetch(&self, pathname: &str) -> Result<(), RouteError>;

    /// Go back one history entry.
    fn back(&self);

    /// Reload the current page.
    fn reload(&self);

    /// Register a hook run before history pops.
    fn before_pop_state(&self, callback: BeforePopState);

    /// Navigation event emitter.
    fn events(&self) -> &RouterEvents;
}

/// Sink for the scroll/focus side effects of hash navigation.
pub trait Viewport: Send + Sync {
    /// Scroll the window to the given coordinates.
    fn scroll_to(&self, x: f64, y: f64);

    /// Move keyboard focus to the document body.
    fn focus_body(&self);
}

/// Viewport that ignores all side effects. Used outside a browser.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopViewport;

impl Viewport for NoopViewport {
    fn scroll_to(&self, _x: f64, _y: f64) {}

    fn focus_body(&self) {}
}
