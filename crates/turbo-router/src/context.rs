//! Router access through the Leptos owner tree.

use leptos::prelude::{provide_context, use_context};

use crate::error::RouteError;
use crate::router::Router;

/// Make `router` available to the current owner and its descendants.
///
/// ```rust,ignore
/// #[component]
/// fn App() -> impl IntoView {
///     provide_router(Router::new(host));
///     view! { <Shell/> }
/// }
/// ```
pub fn provide_router(router: Router) {
    provide_context(router);
}

/// Read the router installed by [`provide_router`].
pub fn use_router() -> Result<Router, RouteError> {
    use_context::<Router>().ok_or(RouteError::RouterNotProvided)
}
