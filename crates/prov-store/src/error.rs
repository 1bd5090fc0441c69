use prov_types::{IdKind, ValueError};

/// Errors from model store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No object exists at the coordinate.
    #[error("object not found: {namespace}#{id}")]
    NotFound { namespace: String, id: String },

    /// An object already exists at the coordinate.
    #[error("object already exists: {namespace}#{id}")]
    AlreadyExists { namespace: String, id: String },

    /// The object is still referenced by another object and cannot be deleted.
    #[error("{namespace}#{id} is still referenced by {referenced_by}")]
    IdInUse {
        namespace: String,
        id: String,
        referenced_by: String,
    },

    /// A collection operation was applied to a single-valued property.
    #[error("property {property} of {id} is not a collection")]
    NotACollection { id: String, property: String },

    /// A scalar operation was applied to a collection property.
    #[error("property {property} of {id} is a collection")]
    NotAScalar { id: String, property: String },

    /// The store cannot mint identifiers of this kind.
    #[error("cannot generate identifiers of kind {0}")]
    UnsupportedIdKind(IdKind),

    /// A value could not be constructed.
    #[error("invalid value: {0}")]
    Value(#[from] ValueError),

    /// An internal lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

impl StoreError {
    pub(crate) fn not_found(namespace: &str, id: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_in_use(&self) -> bool {
        matches!(self, Self::IdInUse { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
