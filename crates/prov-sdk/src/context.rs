//! The [`ModelContext`]: one place that owns the default store, the shared
//! copy manager and the listed license registry.

use std::sync::Arc;

use tracing::debug;

use prov_copy::{CopyManager, Endpoint};
use prov_listing::ListedLicenses;
use prov_model::{ModelEnv, ModelObject};
use prov_store::{InMemoryModelStore, ModelStore};
use prov_types::{EnumConstant, ModelType, Schema, StaticTypeRegistry, TypeRegistry};

use crate::config::SdkConfig;
use crate::error::SdkResult;

/// Explicitly constructed context for working with model objects.
///
/// Everything here is shared: clone the `Arc`s out of the context rather
/// than building parallel copy managers or registries, so deduplication and
/// lazy initialization apply process-wide.
pub struct ModelContext {
    config: SdkConfig,
    store: Arc<InMemoryModelStore>,
    copy_manager: Arc<CopyManager>,
    licenses: Arc<ListedLicenses>,
    env: Arc<ModelEnv>,
}

impl ModelContext {
    /// A context over the core type registry.
    pub fn new(config: SdkConfig) -> Self {
        Self::with_types(config, Arc::new(StaticTypeRegistry::core()))
    }

    /// A context over a caller-supplied type registry.
    pub fn with_types(config: SdkConfig, types: Arc<dyn TypeRegistry>) -> Self {
        let copy_manager = Arc::new(CopyManager::new(Arc::clone(&types)));
        let schema = Schema::new(
            config.spec_version,
            types,
            Arc::new(prov_types::EnumRegistry::core()),
        );
        let env = ModelEnv::new(schema)
            .with_copy_manager(Arc::clone(&copy_manager))
            .with_config(config.model.clone())
            .into_shared();
        let licenses = Arc::new(ListedLicenses::from_config(&config.listing));
        let store = Arc::new(InMemoryModelStore::new());
        debug!(store = %store.store_id(), version = ?config.spec_version, "model context created");
        Self {
            config,
            store,
            copy_manager,
            licenses,
            env,
        }
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<InMemoryModelStore> {
        &self.store
    }

    /// The default store as a trait object.
    pub fn default_store(&self) -> Arc<dyn ModelStore> {
        self.store.clone()
    }

    pub fn copy_manager(&self) -> &Arc<CopyManager> {
        &self.copy_manager
    }

    pub fn licenses(&self) -> &Arc<ListedLicenses> {
        &self.licenses
    }

    pub fn env(&self) -> &Arc<ModelEnv> {
        &self.env
    }

    pub fn schema(&self) -> &Schema {
        self.env.schema()
    }

    /// Look up an enum constant for the configured schema generation.
    pub fn enum_constant(&self, family: &str, name: &str) -> Option<EnumConstant> {
        self.schema()
            .enums()
            .constant(self.config.spec_version, family, name)
            .cloned()
    }

    /// Create (or open) an object in the default store.
    pub fn create_object(
        &self,
        namespace: &str,
        id: &str,
        ty: &ModelType,
    ) -> SdkResult<ModelObject> {
        self.create_object_in(self.default_store(), namespace, id, ty)
    }

    pub fn create_object_in(
        &self,
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: &ModelType,
    ) -> SdkResult<ModelObject> {
        Ok(ModelObject::create(store, namespace, id, ty, &self.env)?)
    }

    /// Open an existing object in the default store.
    pub fn open_object(&self, namespace: &str, id: &str, ty: &ModelType) -> SdkResult<ModelObject> {
        Ok(ModelObject::open(self.default_store(), namespace, id, ty, &self.env)?)
    }

    /// Deep-copy `object` into `(store, namespace)` through the shared copy
    /// manager and open the copy.
    pub fn copy_object(
        &self,
        object: &ModelObject,
        store: Arc<dyn ModelStore>,
        namespace: &str,
    ) -> SdkResult<ModelObject> {
        let copied = self.copy_manager.copy(
            Endpoint::new(store.as_ref(), namespace),
            Endpoint::new(object.store().as_ref(), object.namespace()),
            object.id(),
        )?;
        Ok(ModelObject::open(store, namespace, copied.id(), copied.ty(), &self.env)?)
    }

    /// Teach the default store which ids are listed licenses, so it
    /// classifies them as such. Initializes the registry if needed.
    pub fn register_listed_licenses(&self) -> SdkResult<usize> {
        let ids = self.licenses.license_ids()?;
        for id in &ids {
            self.store.register_listed(id)?;
        }
        debug!(count = ids.len(), "registered listed license ids with default store");
        Ok(ids.len())
    }
}

impl std::fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelContext")
            .field("store", &self.store)
            .field("spec_version", &self.config.spec_version)
            .field("licenses", &self.licenses)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use prov_listing::{ListingConfig, ListingState};
    use prov_model::{properties, ModelValue};
    use prov_types::{core_types, families, IdKind, SpecVersion};

    use super::*;

    const DOC1: &str = "http://doc/1";
    const DOC2: &str = "http://doc/2";

    fn context() -> ModelContext {
        ModelContext::new(SdkConfig {
            listing: ListingConfig::offline(),
            ..Default::default()
        })
    }

    /// A package named `PackageName1` with two files and one anonymous
    /// checksum, all in `DOC1` of the default store.
    fn package(ctx: &ModelContext) -> ModelObject {
        let pkg = ctx
            .create_object(DOC1, "SPDXRef-pkg", &core_types::PACKAGE.into())
            .unwrap();
        pkg.set(properties::NAME, "PackageName1").unwrap();

        let files = pkg
            .typed_collection(properties::HAS_FILE, &core_types::FILE.into())
            .unwrap();
        for (id, name) in [("SPDXRef-file1", "src/a.c"), ("SPDXRef-file2", "src/b.c")] {
            let file = ctx.create_object(DOC1, id, &core_types::FILE.into()).unwrap();
            file.set(properties::NAME, name).unwrap();
            files.add(&file).unwrap();
        }

        let checksum_id = ctx.store().next_id(IdKind::Anonymous, DOC1).unwrap();
        let checksum = ctx
            .create_object(DOC1, &checksum_id, &core_types::CHECKSUM.into())
            .unwrap();
        let sha1 = ctx.enum_constant(families::HASH_ALGORITHM, "SHA1").unwrap();
        checksum.set(properties::ALGORITHM, sha1).unwrap();
        checksum
            .set(properties::CHECKSUM_VALUE, "d6a770ba38583ed4bb4525bd96e50461655d2758")
            .unwrap();
        pkg.collection(properties::CHECKSUM).unwrap().add(&checksum).unwrap();
        pkg
    }

    #[test]
    fn package_copies_across_stores() {
        let ctx = context();
        let pkg = package(&ctx);
        let s1_before = ctx.store().object_count(DOC1).unwrap();
        assert_eq!(s1_before, 4);

        let s2 = Arc::new(InMemoryModelStore::new());
        let copy = ctx.copy_object(&pkg, s2.clone(), DOC2).unwrap();

        assert_eq!(copy.namespace(), DOC2);
        assert!(copy.is_bound_to(s2.store_id(), DOC2));
        assert_eq!(copy.get_string(properties::NAME).unwrap().as_deref(), Some("PackageName1"));

        let files = copy.collection(properties::HAS_FILE).unwrap().to_vec().unwrap();
        assert_eq!(files.len(), 2);
        for file in &files {
            let file = file.as_object().unwrap();
            assert!(file.is_bound_to(s2.store_id(), DOC2));
            assert_eq!(file.ty(), &ModelType::from(core_types::FILE));
        }

        let checksums = copy.collection(properties::CHECKSUM).unwrap().to_vec().unwrap();
        assert_eq!(checksums.len(), 1);
        let checksum = checksums[0].as_object().unwrap();
        assert_eq!(IdKind::classify(checksum.id()), IdKind::Anonymous);
        assert!(checksum.is_bound_to(s2.store_id(), DOC2));
        let algorithm = checksum.get(properties::ALGORITHM).unwrap().unwrap();
        assert_eq!(algorithm.as_enum().map(|c| c.name()), Some("SHA1"));

        assert_eq!(s2.object_count(DOC2).unwrap(), 4);
        assert_eq!(ctx.store().object_count(DOC1).unwrap(), s1_before);
        assert_eq!(ctx.store().total_objects().unwrap(), s1_before);
    }

    #[test]
    fn copying_twice_reuses_the_first_copy() {
        let ctx = context();
        let pkg = package(&ctx);
        let s2 = Arc::new(InMemoryModelStore::new());
        let first = ctx.copy_object(&pkg, s2.clone(), DOC2).unwrap();
        let second = ctx.copy_object(&pkg, s2.clone(), DOC2).unwrap();
        assert_eq!(first, second);
        assert_eq!(s2.object_count(DOC2).unwrap(), 4);
    }

    #[test]
    fn setting_a_foreign_object_copies_it() {
        let ctx = context();
        let pkg = package(&ctx);
        let s2: Arc<dyn ModelStore> = Arc::new(InMemoryModelStore::new());
        let doc = ctx
            .create_object_in(
                Arc::clone(&s2),
                DOC2,
                "SPDXRef-DOCUMENT",
                &core_types::SPDX_DOCUMENT.into(),
            )
            .unwrap();
        doc.set("describes", &pkg).unwrap();

        let described = doc.get("describes").unwrap().unwrap();
        let described = described.as_object().unwrap();
        assert_eq!(described.namespace(), DOC2);
        let name = described.get_string(properties::NAME).unwrap();
        assert_eq!(name.as_deref(), Some("PackageName1"));
        assert_eq!(s2.ids(DOC2).unwrap().len(), 5);
    }

    #[test]
    fn related_elements_through_context() {
        let ctx = context();
        let pkg = package(&ctx);
        let contains = ctx.enum_constant(families::RELATIONSHIP_TYPE, "CONTAINS").unwrap();
        let view = pkg.related_elements(Some(contains), None).unwrap();
        let file = ctx
            .open_object(DOC1, "SPDXRef-file1", &core_types::FILE.into())
            .unwrap();
        assert!(view.add(&file).unwrap());
        assert!(view.contains(&ModelValue::from(&file)).unwrap());
        assert_eq!(pkg.relationships().unwrap().size().unwrap(), 1);
    }

    #[test]
    fn listed_licenses_are_lazy_and_registered() {
        let ctx = context();
        assert_eq!(ctx.licenses().state().unwrap(), ListingState::Uninitialized);
        assert_eq!(ctx.store().id_kind("MIT").unwrap(), IdKind::Unknown);

        let count = ctx.register_listed_licenses().unwrap();
        assert!(count > 0);
        assert_eq!(ctx.licenses().state().unwrap(), ListingState::Ready);
        assert_eq!(ctx.store().id_kind("MIT").unwrap(), IdKind::ListedLicense);
        assert!(ctx.licenses().license(SpecVersion::V2_3, "MIT").unwrap().is_some());
    }

    #[test]
    fn legacy_context_resolves_legacy_enums() {
        let config =
            SdkConfig::from_toml_str("spec_version = \"2.3\"\n[listing]\noffline = true").unwrap();
        let ctx = ModelContext::new(config);
        let describes = ctx.enum_constant(families::RELATIONSHIP_TYPE, "DESCRIBES").unwrap();
        assert_eq!(describes.uri(), "http://spdx.org/rdf/terms#relationshipType_describes");
        assert!(ctx.enum_constant(families::HASH_ALGORITHM, "SHA1").is_none());
    }
}
