//! The listed license registry.
//!
//! [`ListedLicenses`] owns one reader-writer lock guarding the listing
//! singleton and four lookup tables (licenses and exceptions, each for the
//! legacy and current projection). The first access initializes the
//! singleton under the write lock: the live backend is tried first and the
//! bundled snapshot is used if it is unavailable. Tables are built on first
//! use with a read-check, write-recheck sequence. Steady-state lookups take
//! only the read lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use prov_types::SpecVersion;

use crate::config::ListingConfig;
use crate::error::{ListingError, ListingResult};
use crate::projection::{
    CurrentProjection, LegacyProjection, ListedException, ListedLicense, VersionProjection,
};
use crate::provider::DefaultProvider;
use crate::traits::{BackendProvider, ListingBackend};

/// Lifecycle of a [`ListedLicenses`] registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListingState {
    Uninitialized,
    Initializing,
    Ready,
}

/// The initialized listing: the chosen backend and its two projections.
pub struct Listing {
    base: Arc<dyn ListingBackend>,
    legacy: LegacyProjection,
    current: CurrentProjection,
    fallback: bool,
}

impl Listing {
    fn new(base: Arc<dyn ListingBackend>, fallback: bool) -> Self {
        Self {
            legacy: LegacyProjection::new(Arc::clone(&base)),
            current: CurrentProjection::new(Arc::clone(&base)),
            base,
            fallback,
        }
    }

    pub fn base(&self) -> &dyn ListingBackend {
        self.base.as_ref()
    }

    pub fn legacy(&self) -> &LegacyProjection {
        &self.legacy
    }

    pub fn current(&self) -> &CurrentProjection {
        &self.current
    }

    pub fn projection(&self, version: SpecVersion) -> &dyn VersionProjection {
        if version.is_legacy() {
            &self.legacy
        } else {
            &self.current
        }
    }

    /// Whether the bundled snapshot is in use because the live backend was
    /// unavailable.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }
}

impl fmt::Debug for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listing")
            .field("base", &self.base.describe())
            .field("version", &self.base.list_version())
            .field("fallback", &self.fallback)
            .finish()
    }
}

type Table<T> = Arc<HashMap<String, T>>;

#[derive(Default)]
struct Tables {
    legacy_licenses: Option<Table<ListedLicense>>,
    current_licenses: Option<Table<ListedLicense>>,
    legacy_exceptions: Option<Table<ListedException>>,
    current_exceptions: Option<Table<ListedException>>,
}

impl Tables {
    fn licenses(&self, version: SpecVersion) -> Option<&Table<ListedLicense>> {
        if version.is_legacy() {
            self.legacy_licenses.as_ref()
        } else {
            self.current_licenses.as_ref()
        }
    }

    fn exceptions(&self, version: SpecVersion) -> Option<&Table<ListedException>> {
        if version.is_legacy() {
            self.legacy_exceptions.as_ref()
        } else {
            self.current_exceptions.as_ref()
        }
    }

    fn licenses_mut(&mut self, version: SpecVersion) -> &mut Option<Table<ListedLicense>> {
        if version.is_legacy() {
            &mut self.legacy_licenses
        } else {
            &mut self.current_licenses
        }
    }

    fn exceptions_mut(&mut self, version: SpecVersion) -> &mut Option<Table<ListedException>> {
        if version.is_legacy() {
            &mut self.legacy_exceptions
        } else {
            &mut self.current_exceptions
        }
    }
}

struct Inner {
    state: ListingState,
    listing: Option<Arc<Listing>>,
    tables: Tables,
}

/// Lazily initialized, resettable registry of listed licenses and
/// exceptions.
///
/// One registry is meant to be shared by everything that needs listing
/// data; construct it once and pass it down.
pub struct ListedLicenses {
    provider: Arc<dyn BackendProvider>,
    inner: RwLock<Inner>,
}

impl ListedLicenses {
    pub fn new(provider: Arc<dyn BackendProvider>) -> Self {
        Self {
            provider,
            inner: RwLock::new(Inner {
                state: ListingState::Uninitialized,
                listing: None,
                tables: Tables::default(),
            }),
        }
    }

    pub fn from_config(config: &ListingConfig) -> Self {
        Self::new(Arc::new(DefaultProvider::new(config.clone())))
    }

    pub fn state(&self) -> ListingResult<ListingState> {
        Ok(self.read()?.state)
    }

    /// The listing singleton, initializing it on first access.
    pub fn listing(&self) -> ListingResult<Arc<Listing>> {
        if let Some(listing) = &self.read()?.listing {
            return Ok(Arc::clone(listing));
        }
        let mut inner = self.write()?;
        self.ensure_ready(&mut inner)
    }

    /// Discard the singleton and every table. The next access initializes
    /// again.
    pub fn reset(&self) -> ListingResult<()> {
        let mut inner = self.write()?;
        inner.listing = None;
        inner.tables = Tables::default();
        inner.state = ListingState::Uninitialized;
        info!("listed license registry reset");
        Ok(())
    }

    pub fn is_listed_license(&self, id: &str) -> ListingResult<bool> {
        Ok(self
            .license_table(SpecVersion::default())?
            .contains_key(&key(id)))
    }

    pub fn is_listed_exception(&self, id: &str) -> ListingResult<bool> {
        Ok(self
            .exception_table(SpecVersion::default())?
            .contains_key(&key(id)))
    }

    pub fn license(&self, version: SpecVersion, id: &str) -> ListingResult<Option<ListedLicense>> {
        Ok(self.license_table(version)?.get(&key(id)).cloned())
    }

    pub fn exception(
        &self,
        version: SpecVersion,
        id: &str,
    ) -> ListingResult<Option<ListedException>> {
        Ok(self.exception_table(version)?.get(&key(id)).cloned())
    }

    pub fn license_ids(&self) -> ListingResult<Vec<String>> {
        Ok(self.listing()?.base().license_ids())
    }

    pub fn exception_ids(&self) -> ListingResult<Vec<String>> {
        Ok(self.listing()?.base().exception_ids())
    }

    pub fn list_version(&self) -> ListingResult<String> {
        Ok(self.listing()?.base().list_version().to_string())
    }

    fn license_table(&self, version: SpecVersion) -> ListingResult<Table<ListedLicense>> {
        if let Some(table) = self.read()?.tables.licenses(version) {
            return Ok(Arc::clone(table));
        }
        let mut inner = self.write()?;
        if let Some(table) = inner.tables.licenses(version) {
            return Ok(Arc::clone(table));
        }
        let listing = self.ensure_ready(&mut inner)?;
        let table: Table<ListedLicense> = Arc::new(
            listing
                .projection(version)
                .licenses()
                .into_iter()
                .map(|l| (key(&l.id), l))
                .collect(),
        );
        debug!(?version, entries = table.len(), "built license table");
        *inner.tables.licenses_mut(version) = Some(Arc::clone(&table));
        Ok(table)
    }

    fn exception_table(&self, version: SpecVersion) -> ListingResult<Table<ListedException>> {
        if let Some(table) = self.read()?.tables.exceptions(version) {
            return Ok(Arc::clone(table));
        }
        let mut inner = self.write()?;
        if let Some(table) = inner.tables.exceptions(version) {
            return Ok(Arc::clone(table));
        }
        let listing = self.ensure_ready(&mut inner)?;
        let table: Table<ListedException> = Arc::new(
            listing
                .projection(version)
                .exceptions()
                .into_iter()
                .map(|e| (key(&e.id), e))
                .collect(),
        );
        debug!(?version, entries = table.len(), "built exception table");
        *inner.tables.exceptions_mut(version) = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Initialize under an already held write lock unless another thread
    /// got there first.
    fn ensure_ready(&self, inner: &mut Inner) -> ListingResult<Arc<Listing>> {
        if let Some(listing) = &inner.listing {
            return Ok(Arc::clone(listing));
        }
        inner.state = ListingState::Initializing;
        let (base, fallback) = match self.provider.connect_live() {
            Ok(base) => (base, false),
            Err(err) => {
                warn!(error = %err, "live listing unavailable, using bundled snapshot");
                match self.provider.load_bundled() {
                    Ok(base) => (base, true),
                    Err(err) => {
                        inner.state = ListingState::Uninitialized;
                        return Err(err);
                    }
                }
            }
        };
        let listing = Arc::new(Listing::new(base, fallback));
        info!(
            backend = listing.base().describe(),
            version = listing.base().list_version(),
            fallback,
            "listed license registry ready"
        );
        inner.listing = Some(Arc::clone(&listing));
        inner.state = ListingState::Ready;
        Ok(listing)
    }

    fn read(&self) -> ListingResult<RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| ListingError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> ListingResult<RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| ListingError::LockPoisoned(e.to_string()))
    }
}

impl fmt::Debug for ListedLicenses {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.read().map(|inner| inner.state).ok();
        f.debug_struct("ListedLicenses")
            .field("state", &state)
            .finish()
    }
}

fn key(id: &str) -> String {
    id.to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Barrier;
    use std::thread;

    use super::*;
    use crate::snapshot::BundledListing;

    /// Counts backend constructions. The live backend is the bundled
    /// snapshot unless `live_fails` is set.
    #[derive(Default)]
    struct CountingProvider {
        live_fails: bool,
        live_calls: AtomicUsize,
        bundled_calls: AtomicUsize,
    }

    impl CountingProvider {
        fn failing_live() -> Self {
            Self {
                live_fails: true,
                ..Default::default()
            }
        }

        fn initializations(&self) -> usize {
            self.live_calls.load(Ordering::SeqCst)
        }
    }

    impl BackendProvider for CountingProvider {
        fn connect_live(&self) -> ListingResult<Arc<dyn ListingBackend>> {
            self.live_calls.fetch_add(1, Ordering::SeqCst);
            if self.live_fails {
                return Err(ListingError::unavailable("live", "unreachable"));
            }
            Ok(Arc::new(BundledListing::load()?))
        }

        fn load_bundled(&self) -> ListingResult<Arc<dyn ListingBackend>> {
            self.bundled_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(BundledListing::load()?))
        }
    }

    #[test]
    fn starts_uninitialized_and_initializes_on_first_access() {
        let provider = Arc::new(CountingProvider::default());
        let registry = ListedLicenses::new(provider.clone());
        assert_eq!(registry.state().unwrap(), ListingState::Uninitialized);
        assert_eq!(provider.initializations(), 0);

        assert!(registry.is_listed_license("MIT").unwrap());
        assert_eq!(registry.state().unwrap(), ListingState::Ready);
        assert_eq!(provider.initializations(), 1);
        assert!(!registry.listing().unwrap().is_fallback());
    }

    #[test]
    fn concurrent_first_access_initializes_once() {
        const THREADS: usize = 8;
        let provider = Arc::new(CountingProvider::default());
        let registry = Arc::new(ListedLicenses::new(provider.clone()));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    registry.listing().unwrap()
                })
            })
            .collect();
        let seen: Vec<Arc<Listing>> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();

        assert_eq!(provider.initializations(), 1);
        assert!(seen.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn reset_yields_a_new_singleton() {
        let provider = Arc::new(CountingProvider::default());
        let registry = ListedLicenses::new(provider.clone());
        let first = registry.listing().unwrap();
        registry.license(SpecVersion::V2_3, "MIT").unwrap();

        registry.reset().unwrap();
        assert_eq!(registry.state().unwrap(), ListingState::Uninitialized);

        let second = registry.listing().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(provider.initializations(), 2);
    }

    #[test]
    fn falls_back_to_bundled_when_live_fails() {
        let provider = Arc::new(CountingProvider::failing_live());
        let registry = ListedLicenses::new(provider.clone());
        let listing = registry.listing().unwrap();
        assert!(listing.is_fallback());
        assert_eq!(listing.base().describe(), "bundled");
        assert_eq!(provider.bundled_calls.load(Ordering::SeqCst), 1);
        assert!(registry.is_listed_exception("LLVM-exception").unwrap());
    }

    #[test]
    fn lookups_use_the_requested_projection() {
        let registry = ListedLicenses::new(Arc::new(CountingProvider::default()));
        let legacy = registry.license(SpecVersion::V2_3, "mit").unwrap().unwrap();
        let current = registry.license(SpecVersion::V3_0, "MIT").unwrap().unwrap();
        assert_eq!(legacy.uri, "http://spdx.org/licenses/MIT");
        assert_eq!(current.uri, "https://spdx.org/licenses/MIT");
        assert!(registry.license(SpecVersion::V3_0, "LicenseRef-x").unwrap().is_none());

        let exception = registry
            .exception(SpecVersion::V2_3, "LLVM-exception")
            .unwrap()
            .unwrap();
        assert_eq!(exception.uri, "http://spdx.org/licenses/LLVM-exception");
    }

    #[test]
    fn tables_are_built_once() {
        let registry = ListedLicenses::new(Arc::new(CountingProvider::default()));
        let a = registry.license_table(SpecVersion::V3_0).unwrap();
        let b = registry.license_table(SpecVersion::V3_0).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        let legacy = registry.license_table(SpecVersion::V2_3).unwrap();
        assert!(!Arc::ptr_eq(&a, &legacy));
    }

    #[test]
    fn ids_and_version_come_from_backend() {
        let registry = ListedLicenses::from_config(&ListingConfig::offline());
        let ids = registry.license_ids().unwrap();
        assert!(ids.contains(&"Apache-2.0".to_string()));
        assert!(!registry.exception_ids().unwrap().is_empty());
        assert_eq!(registry.list_version().unwrap(), "3.24");
        assert!(registry.listing().unwrap().is_fallback());
    }

    #[test]
    fn mirror_config_serves_mirror_data() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(crate::snapshot::LICENSES_FILE),
            r#"{"licenseListVersion": "4.0",
                "licenses": [{"licenseId": "Brand-New", "name": "Brand New"}]}"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(crate::snapshot::EXCEPTIONS_FILE),
            r#"{"licenseListVersion": "4.0", "exceptions": []}"#,
        )
        .unwrap();

        let registry = ListedLicenses::from_config(&ListingConfig::with_mirror(dir.path()));
        assert_eq!(registry.list_version().unwrap(), "4.0");
        assert!(registry.is_listed_license("brand-new").unwrap());
        assert!(!registry.is_listed_license("MIT").unwrap());
    }
}
