use thiserror::Error;

use crate::model_type::ModelType;

/// Errors produced when constructing value-model types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A typed reference or coordinate was built without an identifier.
    #[error("missing identifier")]
    MissingIdentifier,

    /// An individual URI value was built from an empty URI.
    #[error("missing URI for individual value")]
    MissingUri,

    /// The type is not part of the active type registry.
    #[error("type {0} is not registered")]
    UnregisteredType(ModelType),
}
