//! Listed license and exception reference data.
//!
//! # Architecture
//!
//! - A [`ListingBackend`] serves license and exception records. The
//!   [`BundledListing`] snapshot is compiled in; a [`MirrorListing`] reads a
//!   local copy of the published list files.
//! - A [`BackendProvider`] decides which backends exist. The
//!   [`DefaultProvider`] follows [`ListingConfig`].
//! - [`LegacyProjection`] and [`CurrentProjection`] present the same records
//!   with the listed license URIs of each schema generation.
//! - [`ListedLicenses`] ties these together with a lazy, resettable
//!   lifecycle. If the live backend cannot be constructed the bundled
//!   snapshot is used instead; that failure is logged, never returned.
//!
//! # Modules
//!
//! - [`error`]: error types
//! - [`types`]: records as published in `licenses.json` / `exceptions.json`
//! - [`traits`]: the backend and provider traits
//! - [`snapshot`]: bundled and mirror backends
//! - [`projection`]: per-version views
//! - [`registry`]: the [`ListedLicenses`] registry

pub mod config;
pub mod error;
pub mod projection;
pub mod provider;
pub mod registry;
pub mod snapshot;
pub mod traits;
pub mod types;

pub use config::ListingConfig;
pub use error::{ListingError, ListingResult};
pub use projection::{
    CurrentProjection, LegacyProjection, ListedException, ListedLicense, VersionProjection,
};
pub use provider::DefaultProvider;
pub use registry::{ListedLicenses, Listing, ListingState};
pub use snapshot::{BundledListing, MirrorListing};
pub use traits::{BackendProvider, ListingBackend};
pub use types::{ExceptionList, ExceptionRecord, LicenseList, LicenseRecord};
