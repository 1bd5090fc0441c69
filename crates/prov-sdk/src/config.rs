use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use prov_listing::ListingConfig;
use prov_model::ModelConfig;
use prov_types::SpecVersion;

use crate::error::SdkResult;

/// Top-level configuration for a [`ModelContext`](crate::ModelContext).
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkConfig {
    /// Schema generation used to resolve enum URIs.
    pub spec_version: SpecVersion,
    /// `EnvFilter` directive used by [`init_tracing`](crate::init_tracing)
    /// when `RUST_LOG` is unset.
    pub log_filter: String,
    pub model: ModelConfig,
    pub listing: ListingConfig,
}

impl Default for SdkConfig {
    fn default() -> Self {
        Self {
            spec_version: SpecVersion::default(),
            log_filter: "info".to_string(),
            model: ModelConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl SdkConfig {
    /// Parse a configuration from TOML text. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> SdkResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> SdkResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SdkError;

    #[test]
    fn default_config() {
        let c = SdkConfig::default();
        assert_eq!(c.spec_version, SpecVersion::V3_0);
        assert_eq!(c.log_filter, "info");
        assert!(!c.listing.offline);
        assert!(!c.model.legacy_external_refs);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(SdkConfig::from_toml_str("").unwrap(), SdkConfig::default());
    }

    #[test]
    fn nested_sections() {
        let c = SdkConfig::from_toml_str(
            r#"
            spec_version = "2.3"
            log_filter = "prov_copy=debug"

            [model]
            legacy_external_refs = true

            [listing]
            offline = true
            "#,
        )
        .unwrap();
        assert_eq!(c.spec_version, SpecVersion::V2_3);
        assert_eq!(c.log_filter, "prov_copy=debug");
        assert!(c.model.legacy_external_refs);
        assert!(c.model.warn_unresolved_uris);
        assert!(c.listing.offline);
    }

    #[test]
    fn from_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prov.toml");
        fs::write(&path, "[listing]\noffline = true\n").unwrap();
        assert!(SdkConfig::from_file(&path).unwrap().listing.offline);

        let err = SdkConfig::from_file(dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(err, SdkError::Io(_)));
    }

    #[test]
    fn bad_version_is_rejected() {
        let err = SdkConfig::from_toml_str("spec_version = \"9\"").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }
}
