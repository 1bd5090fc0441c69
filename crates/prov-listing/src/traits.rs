//! The [`ListingBackend`] and [`BackendProvider`] traits.

use std::sync::Arc;

use crate::error::ListingResult;
use crate::types::{ExceptionRecord, LicenseRecord};

/// A source of listed license and exception records.
///
/// Lookups by id are case-insensitive. Implementations must be thread-safe.
pub trait ListingBackend: Send + Sync {
    /// A short label for diagnostics, e.g. `"bundled"`.
    fn describe(&self) -> &str;

    /// Version of the license list this backend serves.
    fn list_version(&self) -> &str;

    /// All license ids, sorted.
    fn license_ids(&self) -> Vec<String>;

    /// All exception ids, sorted.
    fn exception_ids(&self) -> Vec<String>;

    fn license(&self, id: &str) -> Option<LicenseRecord>;

    fn exception(&self, id: &str) -> Option<ExceptionRecord>;
}

/// Constructs the backends the registry chooses between.
pub trait BackendProvider: Send + Sync {
    /// The preferred, up-to-date backend. Failure here is recovered by
    /// falling back to [`load_bundled`](Self::load_bundled).
    fn connect_live(&self) -> ListingResult<Arc<dyn ListingBackend>>;

    /// The snapshot shipped with the library.
    fn load_bundled(&self) -> ListingResult<Arc<dyn ListingBackend>>;
}
