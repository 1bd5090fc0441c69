//! Error types for the copy manager.

use prov_store::StoreError;
use prov_types::{IdKind, ModelType, ValueError};

/// Errors that can occur while copying an object graph.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// A required argument was empty.
    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    /// The object to copy does not exist in the source store.
    #[error("source object not found: {namespace}#{id}")]
    NotFound { namespace: String, id: String },

    /// The source graph changed underneath the copy: an object that was
    /// enumerated or referenced could not be dereferenced.
    #[error("source graph inconsistent at {namespace}#{id}: {reason}")]
    ConsistencyFault {
        namespace: String,
        id: String,
        reason: String,
    },

    /// The source id collides in the target and its kind cannot be re-minted.
    #[error("id {id} ({kind}) already exists in the target and cannot be re-minted")]
    UnmintableCollision { id: String, kind: IdKind },

    /// The target already holds an object of a different type under the
    /// id the copy would use.
    #[error("target {namespace}#{id} is a {found}, expected {expected}")]
    TypeMismatch {
        namespace: String,
        id: String,
        expected: ModelType,
        found: ModelType,
    },

    /// A ledger lock was poisoned by a panicking copier.
    #[error("copy ledger lock poisoned")]
    LedgerPoisoned,

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// A copied reference could not be constructed.
    #[error("invalid value: {0}")]
    Value(#[from] ValueError),
}

impl CopyError {
    pub(crate) fn consistency(namespace: &str, id: &str, reason: impl Into<String>) -> Self {
        Self::ConsistencyFault {
            namespace: namespace.to_string(),
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn type_mismatch(
        namespace: &str,
        id: &str,
        expected: &ModelType,
        found: ModelType,
    ) -> Self {
        Self::TypeMismatch {
            namespace: namespace.to_string(),
            id: id.to_string(),
            expected: expected.clone(),
            found,
        }
    }
}

/// Convenience alias for copy results.
pub type CopyResult<T> = Result<T, CopyError>;
