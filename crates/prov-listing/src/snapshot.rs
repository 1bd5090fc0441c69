//! Backends serving an immutable snapshot of the license list.
//!
//! [`BundledListing`] parses the snapshot compiled into the crate.
//! [`MirrorListing`] reads `licenses.json` and `exceptions.json` from a
//! local mirror directory, so deployments can track newer list versions
//! without a rebuild.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ListingError, ListingResult};
use crate::traits::ListingBackend;
use crate::types::{ExceptionList, ExceptionRecord, LicenseList, LicenseRecord};

const BUNDLED_LICENSES: &str = include_str!("../data/licenses.json");
const BUNDLED_EXCEPTIONS: &str = include_str!("../data/exceptions.json");

/// File name of the license list inside a mirror directory.
pub const LICENSES_FILE: &str = "licenses.json";
/// File name of the exception list inside a mirror directory.
pub const EXCEPTIONS_FILE: &str = "exceptions.json";

/// Parsed records keyed by lower-cased id.
#[derive(Debug)]
struct Snapshot {
    version: String,
    licenses: BTreeMap<String, LicenseRecord>,
    exceptions: BTreeMap<String, ExceptionRecord>,
}

impl Snapshot {
    fn parse(source_name: &str, licenses_json: &str, exceptions_json: &str) -> ListingResult<Self> {
        let malformed = |err: serde_json::Error| ListingError::Malformed {
            source_name: source_name.to_string(),
            reason: err.to_string(),
        };
        let licenses: LicenseList = serde_json::from_str(licenses_json).map_err(malformed)?;
        let exceptions: ExceptionList = serde_json::from_str(exceptions_json).map_err(malformed)?;
        if licenses.license_list_version != exceptions.license_list_version {
            debug!(
                source_name,
                licenses = %licenses.license_list_version,
                exceptions = %exceptions.license_list_version,
                "license and exception lists disagree on version"
            );
        }
        Ok(Self {
            version: licenses.license_list_version,
            licenses: licenses
                .licenses
                .into_iter()
                .map(|l| (key(&l.license_id), l))
                .collect(),
            exceptions: exceptions
                .exceptions
                .into_iter()
                .map(|e| (key(&e.license_exception_id), e))
                .collect(),
        })
    }

    fn license_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.licenses.values().map(|l| l.license_id.clone()).collect();
        ids.sort();
        ids
    }

    fn exception_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .exceptions
            .values()
            .map(|e| e.license_exception_id.clone())
            .collect();
        ids.sort();
        ids
    }
}

fn key(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// The license list snapshot compiled into this crate.
#[derive(Debug)]
pub struct BundledListing {
    label: String,
    snapshot: Snapshot,
}

impl BundledListing {
    pub fn load() -> ListingResult<Self> {
        Ok(Self {
            label: "bundled".to_string(),
            snapshot: Snapshot::parse("bundled", BUNDLED_LICENSES, BUNDLED_EXCEPTIONS)?,
        })
    }
}

/// A license list read from a mirror directory.
#[derive(Debug)]
pub struct MirrorListing {
    dir: PathBuf,
    label: String,
    snapshot: Snapshot,
}

impl MirrorListing {
    /// Read both list files from `dir`. A missing directory or file is
    /// [`ListingError::BackendUnavailable`].
    pub fn open(dir: impl AsRef<Path>) -> ListingResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        let label = format!("mirror:{}", dir.display());
        let read = |file: &str| {
            fs::read_to_string(dir.join(file))
                .map_err(|err| ListingError::unavailable(label.as_str(), format!("{file}: {err}")))
        };
        let licenses = read(LICENSES_FILE)?;
        let exceptions = read(EXCEPTIONS_FILE)?;
        let snapshot = Snapshot::parse(&label, &licenses, &exceptions)?;
        debug!(dir = %dir.display(), version = %snapshot.version, "opened listing mirror");
        Ok(Self {
            dir,
            label,
            snapshot,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

macro_rules! snapshot_backend {
    ($ty:ty) => {
        impl ListingBackend for $ty {
            fn describe(&self) -> &str {
                &self.label
            }

            fn list_version(&self) -> &str {
                &self.snapshot.version
            }

            fn license_ids(&self) -> Vec<String> {
                self.snapshot.license_ids()
            }

            fn exception_ids(&self) -> Vec<String> {
                self.snapshot.exception_ids()
            }

            fn license(&self, id: &str) -> Option<LicenseRecord> {
                self.snapshot.licenses.get(&key(id)).cloned()
            }

            fn exception(&self, id: &str) -> Option<ExceptionRecord> {
                self.snapshot.exceptions.get(&key(id)).cloned()
            }
        }
    };
}

snapshot_backend!(BundledListing);
snapshot_backend!(MirrorListing);
