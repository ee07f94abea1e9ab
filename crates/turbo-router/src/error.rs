//! Error types for the router helpers.

use thiserror::Error;

/// Errors raised by [`Router`](crate::Router) helpers.
///
/// The parameter variants signal programmer errors (reading a parameter the
/// current page does not declare) and are not meant to be recovered from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The current route template has no `[key]` placeholder.
    #[error("The current page route `{route}` does not contain the parameter \"{key}\". Did you misspell it?")]
    UndeclaredParameter { key: String, route: String },

    /// The placeholder is declared but the query carries no value for it.
    #[error("Route parameter \"{0}\" doesn't exist")]
    MissingParameterValue(String),

    /// The value could not be parsed into the requested type.
    #[error("Route parameter \"{key}\" has invalid value \"{value}\"")]
    InvalidParameter { key: String, value: String },

    /// The host router failed to navigate.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// No router was installed in the reactive owner tree.
    #[error("Router not provided. Call `provide_router` at the root of the application.")]
    RouterNotProvided,
}
