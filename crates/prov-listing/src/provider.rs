use std::sync::Arc;

use crate::config::ListingConfig;
use crate::error::{ListingError, ListingResult};
use crate::snapshot::{BundledListing, MirrorListing};
use crate::traits::{BackendProvider, ListingBackend};

/// Provider driven by a [`ListingConfig`]: the mirror directory is the live
/// backend, the compiled-in snapshot is the fallback.
#[derive(Clone, Debug, Default)]
pub struct DefaultProvider {
    config: ListingConfig,
}

impl DefaultProvider {
    pub fn new(config: ListingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }
}

impl BackendProvider for DefaultProvider {
    fn connect_live(&self) -> ListingResult<Arc<dyn ListingBackend>> {
        if self.config.offline {
            return Err(ListingError::unavailable("live", "offline mode"));
        }
        let Some(dir) = &self.config.mirror_dir else {
            return Err(ListingError::unavailable("live", "no mirror directory configured"));
        };
        Ok(Arc::new(MirrorListing::open(dir)?))
    }

    fn load_bundled(&self) -> ListingResult<Arc<dyn ListingBackend>> {
        Ok(Arc::new(BundledListing::load()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_refuses_live() {
        let provider = DefaultProvider::new(ListingConfig::offline());
        assert!(matches!(
            provider.connect_live(),
            Err(ListingError::BackendUnavailable { .. })
        ));
        assert_eq!(provider.load_bundled().unwrap().describe(), "bundled");
    }

    #[test]
    fn unconfigured_mirror_is_unavailable() {
        let provider = DefaultProvider::default();
        assert!(provider.connect_live().is_err());
    }
}
