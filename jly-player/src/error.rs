//! Error types for the player adapter and the catalog client

use thiserror::Error;

/// Player adapter errors
#[derive(Debug, Error)]
pub enum PlayerError {
    /// The widget has not been constructed yet
    #[error("Player not created yet")]
    NotCreated,

    /// The widget exists but has not reported ready
    #[error("Player not ready")]
    NotReady,

    /// The session was torn down
    #[error("Player session closed")]
    Closed,

    /// The widget rejected a command
    #[error("Widget error: {0}")]
    Widget(String),
}

/// Video catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    /// Credential absent or still a template value
    #[error("Catalog credential not configured")]
    MissingCredential,
}
