//! Click handling for links and buttons.

use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::{BoxFuture, FutureExt};

use crate::error::RouteError;
use crate::route::{Route, RouteOptions};
use crate::router::Router;

/// Mouse button code for the middle button (`which`).
pub const MIDDLE_BUTTON: u16 = 2;

/// The parts of a DOM click event the handlers look at.
pub trait ClickEvent {
    /// Upper-case tag name of the element the handler is attached to.
    fn node_name(&self) -> String;

    /// The element's `target` attribute.
    fn target(&self) -> Option<String>;

    /// Whether the meta (command) key was held.
    fn meta_key(&self) -> bool;

    /// Whether the control key was held.
    fn ctrl_key(&self) -> bool;

    /// Whether the shift key was held.
    fn shift_key(&self) -> bool;

    /// Legacy button code: 1 left, 2 middle, 3 right.
    fn which(&self) -> u16;

    /// Stop the browser's own navigation.
    fn prevent_default(&self);
}

/// Whether the user is trying to open the link in a new tab or window.
///
/// A `target` other than `_self` always counts. On anchors, a held
/// meta/ctrl/shift key or a middle click counts too.
pub fn wants_new_tab(event: &dyn ClickEvent) -> bool {
    if let Some(target) = event.target() {
        if !target.is_empty() && target != "_self" {
            return true;
        }
    }

    event.node_name().eq_ignore_ascii_case("A")
        && (event.meta_key()
            || event.ctrl_key()
            || event.shift_key()
            || event.which() == MIDDLE_BUTTON)
}

/// Navigates to a route on click unless the user wants a new tab.
#[derive(Clone)]
pub struct ClickHandler {
    router: Router,
    route: Route,
    options: RouteOptions,
}

impl ClickHandler {
    pub(crate) fn new(router: Router, route: Route, options: RouteOptions) -> Self {
        Self {
            router,
            route,
            options,
        }
    }

    /// Handle a click.
    ///
    /// Returns `None` and leaves the event alone when the user wants a new
    /// tab. Otherwise prevents the default action and returns the pending
    /// navigation, which resolves to the host's success flag.
    pub fn handle(
        &self,
        event: &dyn ClickEvent,
    ) -> Option<BoxFuture<'static, Result<bool, RouteError>>> {
        if wants_new_tab(event) {
            tracing::trace!(pathname = %self.route.pathname, "click left to the browser");
            return None;
        }

        event.prevent_default();

        let router = self.router.clone();
        let route = self.route.clone();
        let options = self.options;
        Some(async move { router.push_route(&route, options).await }.boxed())
    }

    /// The route this handler navigates to.
    pub fn route(&self) -> &Route {
        &self.route
    }
}

impl std::fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHandler")
            .field("route", &self.route)
            .field("options", &self.options)
            .finish()
    }
}

/// In-memory click event for tests and non-browser hosts.
#[derive(Debug, Default)]
pub struct SyntheticClick {
    pub node_name: String,
    pub target: Option<String>,
    pub meta_key: bool,
    pub ctrl_key: bool,
    pub shift_key: bool,
    pub which: u16,
    prevented: AtomicBool,
}

impl SyntheticClick {
    /// A plain left click on an anchor.
    pub fn anchor() -> Self {
        Self::on("A")
    }

    /// A plain left click on an element with the given tag name.
    pub fn on(node_name: impl Into<String>) -> Self {
        Self {
            node_name: node_name.into(),
            which: 1,
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta_key = true;
        self
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl_key = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift_key = true;
        self
    }

    pub fn with_middle_button(mut self) -> Self {
        self.which = MIDDLE_BUTTON;
        self
    }

    /// Whether a handler called `prevent_default`.
    pub fn default_prevented(&self) -> bool {
        self.prevented.load(Ordering::SeqCst)
    }
}

impl ClickEvent for SyntheticClick {
    fn node_name(&self) -> String {
        self.node_name.clone()
    }

    fn target(&self) -> Option<String> {
        self.target.clone()
    }

    fn meta_key(&self) -> bool {
        self.meta_key
    }

    fn ctrl_key(&self) -> bool {
        self.ctrl_key
    }

    fn shift_key(&self) -> bool {
        self.shift_key
    }

    fn which(&self) -> u16 {
        self.which
    }

    fn prevent_default(&self) {
        self.prevented.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_left_click_stays_in_app() {
        assert!(!wants_new_tab(&SyntheticClick::anchor()));
        assert!(!wants_new_tab(&SyntheticClick::anchor().with_target("_self")));
    }

    #[test]
    fn test_modifier_keys_on_anchor_open_new_tab() {
        assert!(wants_new_tab(&SyntheticClick::anchor().with_ctrl()));
        assert!(wants_new_tab(&SyntheticClick::anchor().with_meta()));
        assert!(wants_new_tab(&SyntheticClick::anchor().with_shift()));
        assert!(wants_new_tab(&SyntheticClick::anchor().with_middle_button()));
    }

    #[test]
    fn test_modifier_keys_on_button_are_ignored() {
        assert!(!wants_new_tab(&SyntheticClick::on("BUTTON").with_ctrl()));
        assert!(!wants_new_tab(&SyntheticClick::on("BUTTON").with_middle_button()));
    }

    #[test]
    fn test_explicit_target_opens_new_tab_on_any_element() {
        assert!(wants_new_tab(&SyntheticClick::anchor().with_target("_blank")));
        assert!(wants_new_tab(&SyntheticClick::on("BUTTON").with_target("preview")));
    }

    #[test]
    fn test_synthetic_click_records_prevent_default() {
        let event = SyntheticClick::anchor();
        assert!(!event.default_prevented());

        event.prevent_default();
        assert!(event.default_prevented());
    }
}
