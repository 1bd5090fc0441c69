use serde::{Deserialize, Serialize};

/// Behavior switches for model object access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Recognize `namespace#SPDXRef-...` URIs from other documents as
    /// external elements. Needed for 2.x documents, which carry no
    /// external map.
    pub legacy_external_refs: bool,
    /// Log URIs that resolve to nothing at `warn` instead of `debug`.
    pub warn_unresolved_uris: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            legacy_external_refs: false,
            warn_unresolved_uris: true,
        }
    }
}

impl ModelConfig {
    /// Settings for reading 2.x documents.
    pub fn legacy() -> Self {
        Self {
            legacy_external_refs: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ModelConfig::default();
        assert!(!c.legacy_external_refs);
        assert!(c.warn_unresolved_uris);
    }

    #[test]
    fn legacy_enables_external_refs() {
        assert!(ModelConfig::legacy().legacy_external_refs);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let c: ModelConfig = toml::from_str("legacy_external_refs = true").unwrap();
        assert!(c.legacy_external_refs);
        assert!(c.warn_unresolved_uris);
    }
}
