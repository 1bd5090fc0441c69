//! Deduplicating deep copy for the provenance object graph.
//!
//! [`CopyManager`] copies an object and everything it reaches through typed
//! references from one `(store, namespace)` to another. Each manager keeps a
//! [`CopyLedger`] of what it has copied, which gives at-most-once copies per
//! source object and makes cyclic graphs terminate.
//!
//! Target ids: anonymous ids are always re-minted, other ids are reused
//! unless they collide in the target, and external document references
//! always receive a fresh `DocumentRef-` id.

pub mod error;
pub mod ledger;
pub mod manager;

pub use error::{CopyError, CopyResult};
pub use ledger::{CopyLedger, IdMap};
pub use manager::{CopyManager, Endpoint};
