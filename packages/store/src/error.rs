//! Error taxonomy shared by every storage adapter.
//!
//! Adapters attach human-readable messages; view code displays these verbatim
//! and never sees a raw backend error.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("authentication required")]
    AuthenticationRequired,

    #[error("admin access required")]
    AuthorizationDenied,

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage quota exceeded")]
    QuotaExceeded,
}

impl StoreError {
    /// Build an `Unavailable` error from any underlying backend failure.
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}
