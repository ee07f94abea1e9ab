//! Providers for TurboCommerce applications.
//!
//! - [`Compose`] nests wrapper components around a subtree, first one
//!   outermost.
//! - [`create_provider`] pairs a typed [`Context`] with the value that fills
//!   it. Values may be asynchronous, in which case rendering suspends until
//!   the [`Promise`] settles.
//! - [`use_provider`] reads the nearest value and [`mock_provider`] swaps in a
//!   fixed one for tests.
//!
//! Context propagation itself belongs to the host framework and is reached
//! through [`ContextScope`]; [`LeptosScope`] implements it on the Leptos
//! owner tree.
//!
//! # Example
//!
//! ```rust,ignore
//! use turbo_provision::prelude::*;
//!
//! let cart = create_provider(
//!     ProviderSource::from(Promise::new(load_cart())),
//!     ProviderOptions::new().with_name("CartProvider"),
//! );
//!
//! match cart.render(&LeptosScope, PromiseCache::global(), || view! { <Checkout/> })? {
//!     Rendered::View(view) => view,
//!     Rendered::Suspended(settled) => retry_when(settled),
//! }
//! ```

pub mod prelude;

mod compose;
mod context;
mod error;
mod promise;
mod provider;

pub use compose::*;
pub use context::*;
pub use error::*;
pub use promise::*;
pub use provider::*;
