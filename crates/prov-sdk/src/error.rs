use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("model error: {0}")]
    Model(#[from] prov_model::ModelError),

    #[error("store error: {0}")]
    Store(#[from] prov_store::StoreError),

    #[error("copy error: {0}")]
    Copy(#[from] prov_copy::CopyError),

    #[error("listing error: {0}")]
    Listing(#[from] prov_listing::ListingError),
}

pub type SdkResult<T> = Result<T, SdkError>;
