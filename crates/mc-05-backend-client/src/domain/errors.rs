//! Backend client errors.

use shared_types::StoreError;
use thiserror::Error;

/// Message used when an error response carries no readable body.
pub const DEFAULT_SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum BackendError {
    /// A protected endpoint was called without a bearer token.
    #[error("Not logged in")]
    Unauthenticated,

    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The server could not be reached.
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Ratings are whole stars from 1 to 5.
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl BackendError {
    /// Whether a new login could fix this error.
    #[must_use]
    pub fn needs_login(&self) -> bool {
        matches!(
            self,
            Self::Unauthenticated | Self::Api { status: 401, .. }
        )
    }
}
