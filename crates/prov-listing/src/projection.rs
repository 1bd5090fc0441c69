//! Schema-version views over a listing backend.
//!
//! Both generations of the model describe the same list, but name listed
//! licenses with different URIs. A projection turns backend records into
//! [`ListedLicense`] and [`ListedException`] values carrying the URI of its
//! generation.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use prov_types::{IndividualUri, SpecVersion};

use crate::traits::ListingBackend;
use crate::types::{ExceptionRecord, LicenseRecord};

/// Listed license URI prefix in 2.x documents.
pub const LEGACY_LICENSE_NAMESPACE: &str = "http://spdx.org/licenses/";
/// Listed license URI prefix in 3.x documents.
pub const CURRENT_LICENSE_NAMESPACE: &str = "https://spdx.org/licenses/";

/// A listed license as seen by one schema generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListedLicense {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub osi_approved: bool,
    pub deprecated: bool,
    pub see_also: Vec<String>,
}

impl IndividualUri for ListedLicense {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

prov_types::impl_individual_uri_eq!(ListedLicense);

/// A listed license exception as seen by one schema generation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListedException {
    pub id: String,
    pub name: String,
    pub uri: String,
    pub deprecated: bool,
    pub see_also: Vec<String>,
}

impl IndividualUri for ListedException {
    fn individual_uri(&self) -> &str {
        &self.uri
    }
}

prov_types::impl_individual_uri_eq!(ListedException);

/// A view of a backend for one schema generation.
pub trait VersionProjection: Send + Sync {
    fn spec_version(&self) -> SpecVersion;

    fn backend(&self) -> &dyn ListingBackend;

    /// Prefix of listed license and exception URIs.
    fn namespace(&self) -> &'static str;

    fn license(&self, id: &str) -> Option<ListedLicense> {
        self.backend()
            .license(id)
            .map(|record| project_license(self.namespace(), record))
    }

    fn exception(&self, id: &str) -> Option<ListedException> {
        self.backend()
            .exception(id)
            .map(|record| project_exception(self.namespace(), record))
    }

    fn licenses(&self) -> Vec<ListedLicense> {
        self.backend()
            .license_ids()
            .iter()
            .filter_map(|id| self.license(id))
            .collect()
    }

    fn exceptions(&self) -> Vec<ListedException> {
        self.backend()
            .exception_ids()
            .iter()
            .filter_map(|id| self.exception(id))
            .collect()
    }
}

fn project_license(namespace: &str, record: LicenseRecord) -> ListedLicense {
    ListedLicense {
        uri: format!("{namespace}{}", record.license_id),
        id: record.license_id,
        name: record.name,
        osi_approved: record.is_osi_approved,
        deprecated: record.is_deprecated_license_id,
        see_also: record.see_also,
    }
}

fn project_exception(namespace: &str, record: ExceptionRecord) -> ListedException {
    ListedException {
        uri: format!("{namespace}{}", record.license_exception_id),
        id: record.license_exception_id,
        name: record.name,
        deprecated: record.is_deprecated_license_id,
        see_also: record.see_also,
    }
}

macro_rules! projection {
    ($(#[$meta:meta])* $name:ident, $version:expr, $namespace:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            base: Arc<dyn ListingBackend>,
        }

        impl $name {
            pub fn new(base: Arc<dyn ListingBackend>) -> Self {
                Self { base }
            }
        }

        impl VersionProjection for $name {
            fn spec_version(&self) -> SpecVersion {
                $version
            }

            fn backend(&self) -> &dyn ListingBackend {
                self.base.as_ref()
            }

            fn namespace(&self) -> &'static str {
                $namespace
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("base", &self.base.describe())
                    .finish()
            }
        }
    };
}

projection!(
    /// The 2.x view of a listing.
    LegacyProjection,
    SpecVersion::V2_3,
    LEGACY_LICENSE_NAMESPACE
);
projection!(
    /// The 3.x view of a listing.
    CurrentProjection,
    SpecVersion::V3_0,
    CURRENT_LICENSE_NAMESPACE
);
