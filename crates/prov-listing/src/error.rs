//! Error types for reference-data access.

use thiserror::Error;

/// Errors that can occur while loading or reading listing data.
#[derive(Debug, Error)]
pub enum ListingError {
    /// A backend could not be constructed. The registry recovers from this
    /// for the live backend by falling back to the bundled snapshot.
    #[error("listing backend {backend} unavailable: {reason}")]
    BackendUnavailable { backend: String, reason: String },

    /// Listing data did not parse.
    #[error("malformed listing data in {source_name}: {reason}")]
    Malformed { source_name: String, reason: String },

    /// I/O error reading a mirror directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock was poisoned by a panicking thread.
    #[error("lock poisoned: {0}")]
    LockPoisoned(String),
}

impl ListingError {
    pub(crate) fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for listing operations.
pub type ListingResult<T> = std::result::Result<T, ListingError>;
