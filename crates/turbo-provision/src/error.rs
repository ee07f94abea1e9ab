//! Error types for providers.

use std::sync::Arc;

use thiserror::Error;

/// Errors raised when reading or rendering providers.
#[derive(Error, Debug, Clone)]
pub enum ProvisionError {
    /// The provider carries no context, so it was not built by
    /// [`create_provider`](crate::create_provider).
    #[error("Context value not set on provider: {0}")]
    NotAttached(String),

    /// No ancestor provided a value.
    #[error("Provider {0} not added to the root of the application")]
    NotMounted(String),

    /// The asynchronous value failed.
    #[error("Provider value rejected: {0}")]
    Rejected(Arc<anyhow::Error>),
}
