//! Route helpers for TurboCommerce.
//!
//! Pages are addressed by their template, with placeholder values carried
//! in the query:
//!
//! ```text
//! Route { pathname: "/product/[id]", query: { id: "42", color: "red" } }
//!     -> /product/42?color=red
//! ```
//!
//! The helpers never navigate on their own. They format routes and hand
//! them to a [`HostRouter`], which the application implements over its
//! history integration. [`MockHostRouter`] stands in for it in tests.
//!
//! # Usage
//!
//! ```rust,ignore
//! use turbo_router::prelude::*;
//!
//! let router = use_router()?;
//! let link = router.create_link(
//!     &Route::new("/product/[id]").with_query("id", "42"),
//!     RouteOptions::default(),
//! );
//!
//! view! {
//!     <a href=link.href.clone() class:active=link.is_active>"Product"</a>
//! }
//! ```

pub mod prelude;

mod click;
mod config;
mod context;
mod error;
mod events;
mod host;
mod href;
mod mock;
mod params;
mod route;
mod router;

pub use click::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use events::*;
pub use host::*;
pub use href::*;
pub use mock::*;
pub use params::*;
pub use route::*;
pub use router::*;
