//! Entry point for applications embedding the provenance object graph.
//!
//! Build a [`ModelContext`] from an [`SdkConfig`] and pass it down. The
//! context owns the default in-memory store, the shared copy manager and
//! the listed license registry; nothing here is a process-wide static.

pub mod config;
pub mod context;
pub mod error;
pub mod logging;

pub use config::SdkConfig;
pub use context::ModelContext;
pub use error::{SdkError, SdkResult};
pub use logging::init_tracing;

// Re-export key types
pub use prov_copy::{CopyManager, Endpoint};
pub use prov_listing::{ListedLicenses, ListingConfig, ListingState};
pub use prov_model::{
    ModelCollection, ModelConfig, ModelEnv, ModelError, ModelObject, ModelValue,
    RelatedElementCollection, Relationship,
};
pub use prov_store::{InMemoryModelStore, ModelStore, StoreId};
pub use prov_types::{
    IdKind, IndividualUriValue, ModelType, Schema, SpecVersion, StaticTypeRegistry, TypedValue,
};
