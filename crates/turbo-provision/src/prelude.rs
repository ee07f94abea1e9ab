//! Prelude for convenient imports.
//!
//! ```rust,ignore
//! use turbo_provision::prelude::*;
//! ```

pub use crate::{
    create_container, create_provider, mock_provider, resolve_promise, use_promise,
    use_promise_fn, use_provider, Compose, Context, ContextProvider, ContextScope, LeptosScope,
    MockProvider, Promise, PromiseCache, PromiseMemo, ProvisionError, Provider, ProviderOptions,
    ProviderSource, Read, Rendered, Resolve, Settled, Wrapper,
};
