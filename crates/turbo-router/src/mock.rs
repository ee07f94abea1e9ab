//! A stand-in host router for tests and component previews.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RouteError;
use crate::events::RouterEvents;
use crate::host::{BeforePopState, HostRouter};
use crate::href::format_route;
use crate::route::{NavigationKind, Query, Route, RouteOptions};
use crate::router::Router;

/// Options for [`MockHostRouter::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockRouterOptions {
    /// Current page template.
    pub pathname: String,
    /// Current query, including placeholder values.
    pub query: Query,
    /// Base path returned by the router.
    pub base_path: String,
    /// Override the derived `as_path`.
    pub as_path: Option<String>,
}

impl MockRouterOptions {
    /// Options for the given page template.
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Default::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = base_path.into();
        self
    }

    pub fn with_as_path(mut self, as_path: impl Into<String>) -> Self {
        self.as_path = Some(as_path.into());
        self
    }
}

/// A recorded push or replace call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationCall {
    pub kind: NavigationKind,
    /// Page template form.
    pub url: Route,
    /// Display form.
    pub as_url: Route,
    pub options: RouteOptions,
}

#[derive(Debug, Default)]
struct Calls {
    navigations: Vec<NavigationCall>,
    prefetches: Vec<String>,
}

/// Host router that records every call and never navigates.
///
/// `push` and `replace` resolve to `true` unless overridden with
/// [`set_push_result`](Self::set_push_result) or
/// [`set_replace_result`](Self::set_replace_result).
pub struct MockHostRouter {
    pathname: String,
    route: String,
    query: Query,
    base_path: String,
    as_path: String,
    events: RouterEvents,
    calls: Mutex<Calls>,
    push_result: AtomicBool,
    replace_result: AtomicBool,
    backs: AtomicUsize,
    reloads: AtomicUsize,
    pop_state_hooks: AtomicUsize,
}

impl MockHostRouter {
    /// Build a mock router from a page template and query.
    pub fn new(options: MockRouterOptions) -> Self {
        let MockRouterOptions {
            pathname,
            query,
            base_path,
            as_path,
        } = options;

        let as_path = as_path.unwrap_or_else(|| {
            format_route("", &Route::new(pathname.clone()).with_query_map(query.clone()))
        });

        Self {
            route: pathname.clone(),
            pathname,
            query,
            base_path,
            as_path,
            events: RouterEvents::new(),
            calls: Mutex::new(Calls::default()),
            push_result: AtomicBool::new(true),
            replace_result: AtomicBool::new(true),
            backs: AtomicUsize::new(0),
            reloads: AtomicUsize::new(0),
            pop_state_hooks: AtomicUsize::new(0),
        }
    }

    /// Result returned by subsequent `push` calls.
    pub fn set_push_result(&self, success: bool) {
        self.push_result.store(success, Ordering::SeqCst);
    }

    /// Result returned by subsequent `replace` calls.
    pub fn set_replace_result(&self, success: bool) {
        self.replace_result.store(success, Ordering::SeqCst);
    }

    /// All push and replace calls, oldest first.
    pub fn navigations(&self) -> Vec<NavigationCall> {
        self.lock().navigations.clone()
    }

    /// The most recent push or replace call.
    pub fn last_navigation(&self) -> Option<NavigationCall> {
        self.lock().navigations.last().cloned()
    }

    /// Pathnames passed to `prefetch`, oldest first.
    pub fn prefetches(&self) -> Vec<String> {
        self.lock().prefetches.clone()
    }

    pub fn back_count(&self) -> usize {
        self.backs.load(Ordering::SeqCst)
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn before_pop_state_count(&self) -> usize {
        self.pop_state_hooks.load(Ordering::SeqCst)
    }

    fn record(&self, call: NavigationCall) {
        self.lock().navigations.push(call);
    }

    fn lock(&self) -> MutexGuard<'_, Calls> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl std::fmt::Debug for MockHostRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockHostRouter")
            .field("route", &self.route)
            .field("as_path", &self.as_path)
            .field("base_path", &self.base_path)
            .finish()
    }
}

#[async_trait]
impl HostRouter for MockHostRouter {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn route(&self) -> String {
        self.route.clone()
    }

    fn as_path(&self) -> String {
        self.as_path.clone()
    }

    fn query(&self) -> Query {
        self.query.clone()
    }

    fn base_path(&self) -> Option<String> {
        Some(self.base_path.clone())
    }

    async fn push(
        &self,
        url: Route,
        as_url: Route,
        options: RouteOptions,
    ) -> Result<bool, RouteError> {
        self.record(NavigationCall {
            kind: NavigationKind::Push,
            url,
            as_url,
            options,
        });
        Ok(self.push_result.load(Ordering::SeqCst))
    }

    async fn replace(
        &self,
        url: Route,
        as_url: Route,
        options: RouteOptions,
    ) -> Result<bool, RouteError> {
        self.record(NavigationCall {
            kind: NavigationKind::Replace,
            url,
            as_url,
            options,
        });
        Ok(self.replace_result.load(Ordering::SeqCst))
    }

    async fn prefetch(&self, pathname: &str) -> Result<(), RouteError> {
        self.lock().prefetches.push(pathname.to_string());
        Ok(())
    }

    fn back(&self) {
        self.backs.fetch_add(1, Ordering::SeqCst);
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }

    fn before_pop_state(&self, _callback: BeforePopState) {
        self.pop_state_hooks.fetch_add(1, Ordering::SeqCst);
    }

    fn events(&self) -> &RouterEvents {
        &self.events
    }
}

/// Build a mock host router and a [`Router`] over it.
///
/// The returned host handle is shared with the router, so calls made
/// through the router show up in its logs.
pub fn create_mock_router(options: MockRouterOptions) -> (Router, Arc<MockHostRouter>) {
    let host = Arc::new(MockHostRouter::new(options));
    let router = Router::from_arc(host.clone());
    (router, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requests_options() -> MockRouterOptions {
        MockRouterOptions::new("/admin/producer-dashboard/requests/[uuid]")
            .with_query("uuid", "1")
            .with_query("hash", "12345")
    }

    #[test]
    fn test_mock_router_derives_as_path() {
        let router = MockHostRouter::new(requests_options());

        assert_eq!(router.as_path(), "/admin/producer-dashboard/requests/1?hash=12345");
        assert_eq!(router.route(), "/admin/producer-dashboard/requests/[uuid]");
        assert_eq!(router.pathname(), "/admin/producer-dashboard/requests/[uuid]");
        assert_eq!(router.query(), requests_options().query);
    }

    #[test]
    fn test_mock_router_as_path_ignores_base_path() {
        let router = MockHostRouter::new(MockRouterOptions::new("/a/[id]").with_query("id", "1").with_base_path("/shop"));

        assert_eq!(router.as_path(), "/a/1");
        assert_eq!(router.base_path().as_deref(), Some("/shop"));
    }

    #[test]
    fn test_mock_router_as_path_override() {
        let router = MockHostRouter::new(MockRouterOptions::new("/a").with_as_path("/custom"));

        assert_eq!(router.as_path(), "/custom");
    }

    #[tokio::test]
    async fn test_mock_router_records_push() {
        let router = MockHostRouter::new(requests_options());
        let url = Route::new("/users/[id]").with_query("id", "1");
        let as_url = Route::new("/users/1").with_query("id", "1");

        let ok = router
            .push(url.clone(), as_url.clone(), RouteOptions::default())
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(
            router.last_navigation(),
            Some(NavigationCall {
                kind: NavigationKind::Push,
                url,
                as_url,
                options: RouteOptions::default(),
            })
        );
    }

    #[tokio::test]
    async fn test_mock_router_result_override() {
        let router = MockHostRouter::new(requests_options());
        router.set_replace_result(false);

        let ok = router
            .replace(Route::new("/a"), Route::new("/a"), RouteOptions::default())
            .await
            .unwrap();

        assert!(!ok);
        assert_eq!(router.navigations().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_router_stubs() {
        let router = MockHostRouter::new(requests_options());

        router.prefetch("/cart").await.unwrap();
        router.back();
        router.reload();
        router.before_pop_state(Box::new(|_| true));

        assert_eq!(router.prefetches(), vec!["/cart"]);
        assert_eq!(router.back_count(), 1);
        assert_eq!(router.reload_count(), 1);
        assert_eq!(router.before_pop_state_count(), 1);
        assert!(router.navigations().is_empty());
    }

    #[test]
    fn test_mock_router_has_fresh_events() {
        let first = MockHostRouter::new(requests_options());
        let second = MockHostRouter::new(requests_options());
        first
            .events()
            .on(crate::RouterEventKind::RouteChangeStart, |_| {});

        assert_eq!(first.events().listener_count(crate::RouterEventKind::RouteChangeStart), 1);
        assert_eq!(second.events().listener_count(crate::RouterEventKind::RouteChangeStart), 0);
    }
}
