//! Model store contract for the provenance object graph.
//!
//! A model store holds the property values of every model object, keyed by
//! the coordinate `(namespace, id)`. The store never interprets values
//! beyond the three [`StoredValue`](prov_types::StoredValue) shapes; typed
//! references are followed only by callers.
//!
//! # Backends
//!
//! All backends implement the [`ModelStore`] trait:
//!
//! - [`InMemoryModelStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Each trait method is atomic on its own.
//! 2. Multi-step sequences use [`ModelStore::enter_critical_section`]; the
//!    section is advisory and re-entrant, and there is no rollback.
//! 3. Collection properties are sets; backends preserve insertion order
//!    when they can.
//! 4. An object cannot be deleted while another object references it.
//! 5. Lock poisoning is reported as an error, never silently ignored.

pub mod critical;
pub mod error;
pub mod memory;
pub mod traits;

pub use critical::{CriticalSection, NamespaceLocks};
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryModelStore;
pub use traits::{ModelStore, StoreId};
