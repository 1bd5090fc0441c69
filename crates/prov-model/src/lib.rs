//! Model objects and live collection views over a [`ModelStore`].
//!
//! A [`ModelObject`] is a handle to `(store, namespace, id)` plus the
//! [`ModelEnv`] it was opened under. Property reads and writes go through
//! the storage class converter:
//!
//! - stored URIs are inflated into enum constants, external elements,
//!   literals or reference types, falling back to the bare URI
//! - stored typed references become object handles
//! - objects from another store or namespace are brought across by the
//!   environment's [`CopyManager`](prov_copy::CopyManager), or rejected
//!
//! [`ModelCollection`] and [`RelatedElementCollection`] are views with no
//! cache; each read is a fresh pass over the store.
//!
//! [`ModelStore`]: prov_store::ModelStore

pub mod collection;
pub mod config;
pub mod convert;
pub mod env;
pub mod error;
pub mod external;
pub mod factory;
pub mod inflate;
pub mod object;
pub mod properties;
pub mod related;
pub mod relationship;
pub mod value;

pub use collection::{CollectionIter, ModelCollection};
pub use config::ModelConfig;
pub use convert::{model_to_stored, stored_to_model};
pub use env::ModelEnv;
pub use error::{ModelError, ModelResult};
pub use external::{ExternalElement, ExternalMap, ExternalMapping};
pub use factory::{GenericObjectFactory, ObjectFactory};
pub use inflate::Inflate;
pub use object::ModelObject;
pub use related::RelatedElementCollection;
pub use relationship::Relationship;
pub use value::ModelValue;
