use thiserror::Error;

use prov_copy::CopyError;
use prov_store::StoreError;
use prov_types::ValueError;

/// Errors from model object access, conversion and collection views.
#[derive(Debug, Error)]
pub enum ModelError {
    /// An identifier was missing or malformed.
    #[error("identifier error: {0}")]
    Identifier(String),

    /// A type is not registered, or a value is not of the expected type.
    #[error("type error: {0}")]
    Type(String),

    /// No object exists at the coordinate.
    #[error("not found: {namespace}#{id}")]
    NotFound { namespace: String, id: String },

    /// A value bound to another store or namespace was written without a
    /// copy manager to bring it across.
    #[error("{id} needs a copy manager to move from {source_namespace} to {target_namespace}")]
    CrossStoreReference {
        id: String,
        source_namespace: String,
        target_namespace: String,
    },

    /// The operation is not defined for this view.
    #[error("ambiguous operation: {0}")]
    AmbiguousOperation(&'static str),

    /// The value cannot be stored as a property value.
    #[error("invalid property type: {0}")]
    InvalidPropertyType(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("copy error: {0}")]
    Copy(#[from] CopyError),
}

impl ModelError {
    pub(crate) fn not_found(namespace: &str, id: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            id: id.to_string(),
        }
    }

    /// Whether the source graph changed underneath a copy.
    pub fn is_consistency_fault(&self) -> bool {
        matches!(self, Self::Copy(CopyError::ConsistencyFault { .. }))
    }
}

impl From<ValueError> for ModelError {
    fn from(err: ValueError) -> Self {
        match err {
            ValueError::MissingIdentifier | ValueError::MissingUri => {
                Self::Identifier(err.to_string())
            }
            ValueError::UnregisteredType(_) => Self::Type(err.to_string()),
        }
    }
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
