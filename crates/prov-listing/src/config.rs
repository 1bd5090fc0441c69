use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where listing data comes from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingConfig {
    /// Skip the live backend and use the bundled snapshot directly.
    pub offline: bool,
    /// Directory holding `licenses.json` and `exceptions.json`, served as
    /// the live backend.
    pub mirror_dir: Option<PathBuf>,
}

impl ListingConfig {
    pub fn offline() -> Self {
        Self {
            offline: true,
            mirror_dir: None,
        }
    }

    pub fn with_mirror(dir: impl Into<PathBuf>) -> Self {
        Self {
            offline: false,
            mirror_dir: Some(dir.into()),
        }
    }
}
