//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use turbo_router::prelude::*;
//! ```

pub use crate::{
    create_mock_router, provide_router, use_router, ActiveMatch, ClickEvent, ClickHandler,
    HostRouter, Link, MockHostRouter, MockRouterOptions, Query, Route, RouteError, RouteOptions,
    Router, RouterConfig, Viewport,
};
