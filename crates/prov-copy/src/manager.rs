//! Deep copy of object subgraphs between stores and namespaces.

use std::sync::Arc;

use tracing::debug;

use prov_store::{ModelStore, StoreError};
use prov_types::{
    core_types, IdKind, IndividualUri, ModelType, StoredValue, TypeRegistry, TypedValue,
};

use crate::error::{CopyError, CopyResult};
use crate::ledger::CopyLedger;

/// Copies objects, and everything they reference through typed values, from
/// one `(store, namespace)` into another.
///
/// A manager copies each distinct source object at most once: the target id
/// is recorded in the [`CopyLedger`] before the object's properties are
/// visited, so later visits (including cyclic ones) reuse it. One manager
/// can be shared by threads copying overlapping graphs.
pub struct CopyManager {
    types: Arc<dyn TypeRegistry>,
    ledger: CopyLedger,
}

/// One side of a copy: a store and a namespace inside it.
#[derive(Clone, Copy)]
pub struct Endpoint<'a> {
    pub store: &'a dyn ModelStore,
    pub namespace: &'a str,
}

/// Where a copied object lands.
enum Target {
    /// A new object the copy creates and fills.
    Fresh(String),
    /// A shared identity not yet in the target. Filled by whoever creates it.
    Claim(String),
    /// An existing object with a shared identity, reused untouched.
    Shared(String),
}

impl Target {
    fn id(&self) -> &str {
        match self {
            Self::Fresh(id) | Self::Claim(id) | Self::Shared(id) => id,
        }
    }
}

impl<'a> Endpoint<'a> {
    pub fn new(store: &'a dyn ModelStore, namespace: &'a str) -> Self {
        Self { store, namespace }
    }
}

impl CopyManager {
    /// A manager with an empty ledger. `types` validates the type of every
    /// reference the manager returns.
    pub fn new(types: Arc<dyn TypeRegistry>) -> Self {
        Self {
            types,
            ledger: CopyLedger::new(),
        }
    }

    /// Copy `source_id` from `from` into `to`, returning a reference to the
    /// copy in the target namespace.
    ///
    /// If this manager already copied the object, the recorded target is
    /// returned and nothing is written.
    pub fn copy(
        &self,
        to: Endpoint<'_>,
        from: Endpoint<'_>,
        source_id: &str,
    ) -> CopyResult<TypedValue> {
        check_endpoints(&to, &from)?;
        if source_id.is_empty() {
            return Err(CopyError::Precondition("source id must not be empty"));
        }
        let ty = from
            .store
            .type_of(from.namespace, source_id)?
            .ok_or_else(|| CopyError::NotFound {
                namespace: from.namespace.to_string(),
                id: source_id.to_string(),
            })?;
        self.copy_reference(to, from, source_id, &ty)
    }

    /// Copy `source_id` from `from` into `to` under the explicit id
    /// `target_id`. The target object is created if absent.
    pub fn copy_into(
        &self,
        to: Endpoint<'_>,
        target_id: &str,
        from: Endpoint<'_>,
        source_id: &str,
    ) -> CopyResult<TypedValue> {
        check_endpoints(&to, &from)?;
        if source_id.is_empty() || target_id.is_empty() {
            return Err(CopyError::Precondition("ids must not be empty"));
        }
        let ty = from
            .store
            .type_of(from.namespace, source_id)?
            .ok_or_else(|| CopyError::NotFound {
                namespace: from.namespace.to_string(),
                id: source_id.to_string(),
            })?;
        let target_exists = match to.store.type_of(to.namespace, target_id)? {
            Some(found) if found != ty => {
                return Err(CopyError::type_mismatch(to.namespace, target_id, &ty, found));
            }
            found => found.is_some(),
        };
        let ids = self.ledger.id_map(
            from.store.store_id(),
            to.store.store_id(),
            from.namespace,
            to.namespace,
        )?;
        let recorded = ids.insert_if_absent(source_id, target_id)?;
        if recorded == target_id {
            if !target_exists {
                to.store.create(to.namespace, target_id, &ty)?;
            }
            self.copy_properties(to, target_id, from, source_id, &ty)?;
        }
        Ok(TypedValue::new(recorded, ty, self.types.as_ref())?)
    }

    /// The target id this manager recorded for `source_id`, if any.
    pub fn copied_id(
        &self,
        to: Endpoint<'_>,
        from: Endpoint<'_>,
        source_id: &str,
    ) -> CopyResult<Option<String>> {
        self.ledger.lookup(
            from.store.store_id(),
            to.store.store_id(),
            from.namespace,
            to.namespace,
            source_id,
        )
    }

    /// Number of objects this manager has copied.
    pub fn copied_count(&self) -> CopyResult<usize> {
        self.ledger.len()
    }

    fn copy_reference(
        &self,
        to: Endpoint<'_>,
        from: Endpoint<'_>,
        source_id: &str,
        ty: &ModelType,
    ) -> CopyResult<TypedValue> {
        let ids = self.ledger.id_map(
            from.store.store_id(),
            to.store.store_id(),
            from.namespace,
            to.namespace,
        )?;
        if let Some(existing) = ids.get(source_id)? {
            return Ok(TypedValue::new(existing, ty.clone(), self.types.as_ref())?);
        }

        let target = self.assign_target_id(to, from, source_id, ty)?;
        // Reserve before recursing: any later visit of `source_id`, cyclic or
        // from another thread, resolves to the same target.
        let recorded = ids.insert_if_absent(source_id, target.id())?;
        if recorded != target.id() {
            debug!(source = source_id, target = %recorded, "copy already claimed");
            return Ok(TypedValue::new(recorded, ty.clone(), self.types.as_ref())?);
        }

        match target {
            Target::Shared(_) => {
                debug!(to_ns = to.namespace, target = %recorded, "reusing shared target");
            }
            Target::Fresh(_) => {
                to.store.create(to.namespace, &recorded, ty)?;
                self.copy_properties(to, &recorded, from, source_id, ty)?;
            }
            Target::Claim(_) => match to.store.create(to.namespace, &recorded, ty) {
                Ok(()) => self.copy_properties(to, &recorded, from, source_id, ty)?,
                Err(StoreError::AlreadyExists { .. }) => {
                    debug!(
                        to_ns = to.namespace,
                        target = %recorded,
                        "shared target created elsewhere"
                    );
                }
                Err(e) => return Err(e.into()),
            },
        }
        Ok(TypedValue::new(recorded, ty.clone(), self.types.as_ref())?)
    }

    fn assign_target_id(
        &self,
        to: Endpoint<'_>,
        from: Endpoint<'_>,
        source_id: &str,
        ty: &ModelType,
    ) -> CopyResult<Target> {
        // External document references must be unique per document.
        if ty.is(core_types::EXTERNAL_DOCUMENT_REF) {
            return Ok(Target::Fresh(to.store.next_id(IdKind::DocumentRef, to.namespace)?));
        }
        let kind = from.store.id_kind(source_id)?;
        let existing = match kind {
            IdKind::Anonymous => None,
            _ => to.store.type_of(to.namespace, source_id)?,
        };
        let Some(found) = existing else {
            return match kind {
                IdKind::Anonymous => Ok(Target::Fresh(to.store.next_id(kind, to.namespace)?)),
                IdKind::ListedLicense | IdKind::Literal => Ok(Target::Claim(source_id.to_string())),
                _ => Ok(Target::Fresh(source_id.to_string())),
            };
        };
        match kind {
            IdKind::Anonymous | IdKind::ElementRef | IdKind::LicenseRef | IdKind::DocumentRef => {
                Ok(Target::Fresh(to.store.next_id(kind, to.namespace)?))
            }
            // Shared identities: the existing target object is the same thing
            // and is left as it is.
            IdKind::ListedLicense | IdKind::Literal if &found == ty => {
                Ok(Target::Shared(source_id.to_string()))
            }
            IdKind::ListedLicense | IdKind::Literal => {
                Err(CopyError::type_mismatch(to.namespace, source_id, ty, found))
            }
            IdKind::Unknown => Err(CopyError::UnmintableCollision {
                id: source_id.to_string(),
                kind,
            }),
        }
    }

    /// Copy every property of the source onto an already created target.
    fn copy_properties(
        &self,
        to: Endpoint<'_>,
        target_id: &str,
        from: Endpoint<'_>,
        source_id: &str,
        ty: &ModelType,
    ) -> CopyResult<()> {
        debug!(
            from_ns = from.namespace,
            source = source_id,
            to_ns = to.namespace,
            target = target_id,
            %ty,
            "copying object"
        );

        let properties = from
            .store
            .property_names(from.namespace, source_id)
            .map_err(|e| vanished(from, source_id, e))?;
        for property in properties {
            let is_collection = from
                .store
                .is_collection(from.namespace, source_id, &property)
                .map_err(|e| vanished(from, source_id, e))?;
            if is_collection {
                let values = from
                    .store
                    .collection_values(from.namespace, source_id, &property)
                    .map_err(|e| vanished(from, source_id, e))?;
                for value in values {
                    let copied = self.copy_value(to, from, value)?;
                    to.store
                        .add_value(to.namespace, target_id, &property, copied)?;
                }
            } else {
                let value = from
                    .store
                    .get_value(from.namespace, source_id, &property)
                    .map_err(|e| vanished(from, source_id, e))?;
                if let Some(value) = value {
                    let copied = self.copy_value(to, from, value)?;
                    to.store
                        .set_value(to.namespace, target_id, &property, copied)?;
                }
            }
        }
        Ok(())
    }

    fn copy_value(
        &self,
        to: Endpoint<'_>,
        from: Endpoint<'_>,
        value: StoredValue,
    ) -> CopyResult<StoredValue> {
        match value {
            StoredValue::Primitive(p) => Ok(StoredValue::Primitive(p)),
            StoredValue::Uri(uri) => Ok(StoredValue::Uri(uri.to_uri_value())),
            StoredValue::Typed(reference) => {
                let ty = from
                    .store
                    .type_of(from.namespace, reference.id())?
                    .ok_or_else(|| {
                        CopyError::consistency(
                            from.namespace,
                            reference.id(),
                            "referenced object does not exist",
                        )
                    })?;
                let copied = self.copy_reference(to, from, reference.id(), &ty)?;
                Ok(StoredValue::Typed(copied))
            }
        }
    }
}

impl std::fmt::Debug for CopyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyManager")
            .field("copied", &self.ledger.len().ok())
            .finish()
    }
}

fn check_endpoints(to: &Endpoint<'_>, from: &Endpoint<'_>) -> CopyResult<()> {
    if to.namespace.is_empty() {
        return Err(CopyError::Precondition("target namespace must not be empty"));
    }
    if from.namespace.is_empty() {
        return Err(CopyError::Precondition("source namespace must not be empty"));
    }
    Ok(())
}

fn vanished(from: Endpoint<'_>, id: &str, err: StoreError) -> CopyError {
    if err.is_not_found() {
        CopyError::consistency(from.namespace, id, "object vanished during copy")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::thread;

    use prov_store::InMemoryModelStore;
    use prov_types::{IndividualUriValue, Primitive, StaticTypeRegistry};

    use super::*;

    const NS1: &str = "http://doc/1";
    const NS2: &str = "http://doc/2";
    const SHA1_URI: &str = "http://spdx.org/rdf/terms#checksumAlgorithm_sha1";

    fn registry() -> Arc<dyn TypeRegistry> {
        Arc::new(StaticTypeRegistry::core())
    }

    fn reference(id: &str, ty: &str) -> StoredValue {
        let registry = StaticTypeRegistry::core();
        StoredValue::Typed(TypedValue::new(id, ModelType::named(ty), &registry).unwrap())
    }

    fn text(s: &str) -> StoredValue {
        StoredValue::Primitive(Primitive::from(s))
    }

    /// A package with two files and a checksum in `NS1` of `store`.
    fn package_graph(store: &InMemoryModelStore) {
        store.create(NS1, "SPDXRef-pkg", &ModelType::named("Package")).unwrap();
        store.set_value(NS1, "SPDXRef-pkg", "name", text("PackageName1")).unwrap();
        for f in ["SPDXRef-f1", "SPDXRef-f2"] {
            store.create(NS1, f, &ModelType::named("File")).unwrap();
            store.set_value(NS1, f, "name", text(f)).unwrap();
            store.add_value(NS1, "SPDXRef-pkg", "hasFile", reference(f, "File")).unwrap();
        }
        store.create(NS1, "__anon__c1", &ModelType::named("Checksum")).unwrap();
        store
            .set_value(
                NS1,
                "__anon__c1",
                "algorithm",
                StoredValue::Uri(IndividualUriValue::new(SHA1_URI).unwrap()),
            )
            .unwrap();
        store
            .add_value(NS1, "SPDXRef-pkg", "checksum", reference("__anon__c1", "Checksum"))
            .unwrap();
    }

    #[test]
    fn copies_package_graph_across_stores() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        package_graph(&s1);
        let before = s1.total_objects().unwrap();

        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-pkg")
            .unwrap();

        assert_eq!(copied.id(), "SPDXRef-pkg");
        assert_eq!(s2.object_count(NS2).unwrap(), 4);
        assert_eq!(s1.total_objects().unwrap(), before);
        assert_eq!(
            s2.get_value(NS2, "SPDXRef-pkg", "name").unwrap(),
            Some(text("PackageName1"))
        );
        assert_eq!(s2.collection_size(NS2, "SPDXRef-pkg", "hasFile").unwrap(), 2);

        let checksums = s2.collection_values(NS2, "SPDXRef-pkg", "checksum").unwrap();
        let checksum_id = checksums[0].as_typed().unwrap().id().to_string();
        assert_ne!(checksum_id, "__anon__c1");
        assert!(s2.exists(NS2, &checksum_id).unwrap());
        assert!(s2.get_value(NS2, &checksum_id, "algorithm").unwrap().unwrap().as_uri().is_some());
    }

    #[test]
    fn copying_twice_yields_same_target() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        package_graph(&s1);
        let mgr = CopyManager::new(registry());
        let to = Endpoint::new(&s2, NS2);
        let from = Endpoint::new(&s1, NS1);

        let first = mgr.copy(to, from, "__anon__c1").unwrap();
        let count = s2.object_count(NS2).unwrap();
        let second = mgr.copy(to, from, "__anon__c1").unwrap();
        assert_eq!(first, second);
        assert_eq!(s2.object_count(NS2).unwrap(), count);
        assert_eq!(mgr.copied_id(to, from, "__anon__c1").unwrap().as_deref(), Some(first.id()));
    }

    #[test]
    fn cyclic_references_terminate() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-A", &ModelType::named("Package")).unwrap();
        s1.create(NS1, "SPDXRef-B", &ModelType::named("Package")).unwrap();
        s1.set_value(NS1, "SPDXRef-A", "peer", reference("SPDXRef-B", "Package")).unwrap();
        s1.set_value(NS1, "SPDXRef-B", "peer", reference("SPDXRef-A", "Package")).unwrap();

        let mgr = CopyManager::new(registry());
        let a = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-A")
            .unwrap();
        assert_eq!(s2.object_count(NS2).unwrap(), 2);
        let b = s2.get_value(NS2, a.id(), "peer").unwrap().unwrap();
        let b_id = b.as_typed().unwrap().id().to_string();
        assert_eq!(
            s2.get_value(NS2, &b_id, "peer").unwrap(),
            Some(StoredValue::Typed(a))
        );
        assert_eq!(mgr.copied_count().unwrap(), 2);
    }

    #[test]
    fn element_ref_ids_are_reused_without_collision() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-f", &ModelType::named("File")).unwrap();
        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-f")
            .unwrap();
        assert_eq!(copied.id(), "SPDXRef-f");
    }

    #[test]
    fn anonymous_ids_are_always_reminted() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "__anon__7", &ModelType::named("Checksum")).unwrap();
        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "__anon__7")
            .unwrap();
        assert_ne!(copied.id(), "__anon__7");
        assert_eq!(IdKind::classify(copied.id()), IdKind::Anonymous);
    }

    #[test]
    fn colliding_ids_are_reminted_with_same_kind() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "LicenseRef-x", &ModelType::named("ExtractedLicenseInfo")).unwrap();
        s2.create(NS2, "LicenseRef-x", &ModelType::named("ExtractedLicenseInfo")).unwrap();
        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "LicenseRef-x")
            .unwrap();
        assert_ne!(copied.id(), "LicenseRef-x");
        assert_eq!(IdKind::classify(copied.id()), IdKind::LicenseRef);
    }

    #[test]
    fn external_document_refs_get_fresh_document_ids() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-ext", &ModelType::named("ExternalDocumentRef")).unwrap();
        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-ext")
            .unwrap();
        assert_eq!(IdKind::classify(copied.id()), IdKind::DocumentRef);
    }

    #[test]
    fn copy_within_same_store_to_other_namespace() {
        let s = InMemoryModelStore::new();
        package_graph(&s);
        let mgr = CopyManager::new(registry());
        mgr.copy(Endpoint::new(&s, NS2), Endpoint::new(&s, NS1), "SPDXRef-pkg")
            .unwrap();
        assert_eq!(s.object_count(NS1).unwrap(), 4);
        assert_eq!(s.object_count(NS2).unwrap(), 4);
    }

    #[test]
    fn copy_into_explicit_target() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-f", &ModelType::named("File")).unwrap();
        s1.set_value(NS1, "SPDXRef-f", "name", text("x.c")).unwrap();
        let mgr = CopyManager::new(registry());
        let (to, from) = (Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1));
        let copied = mgr.copy_into(to, "SPDXRef-renamed", from, "SPDXRef-f").unwrap();
        assert_eq!(copied.id(), "SPDXRef-renamed");
        assert_eq!(s2.get_value(NS2, "SPDXRef-renamed", "name").unwrap(), Some(text("x.c")));
    }

    #[test]
    fn shared_listed_target_is_left_untouched() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        let listed = ModelType::named("ListedLicense");
        s1.register_listed("MIT").unwrap();
        s1.create(NS1, "MIT", &listed).unwrap();
        s1.set_value(NS1, "MIT", "name", text("Local edit")).unwrap();
        s2.create(NS2, "MIT", &listed).unwrap();
        s2.set_value(NS2, "MIT", "name", text("MIT License")).unwrap();

        let mgr = CopyManager::new(registry());
        let copied = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "MIT")
            .unwrap();
        assert_eq!(copied.id(), "MIT");
        assert_eq!(s2.get_value(NS2, "MIT", "name").unwrap(), Some(text("MIT License")));
        assert_eq!(s2.object_count(NS2).unwrap(), 1);
    }

    #[test]
    fn shared_target_of_other_type_is_rejected() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.register_listed("MIT").unwrap();
        s1.create(NS1, "MIT", &ModelType::named("ListedLicense")).unwrap();
        s2.create(NS2, "MIT", &ModelType::named("File")).unwrap();
        let mgr = CopyManager::new(registry());
        let err = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "MIT")
            .unwrap_err();
        assert!(matches!(err, CopyError::TypeMismatch { .. }), "{err}");
        assert!(mgr
            .copied_id(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "MIT")
            .unwrap()
            .is_none());
    }

    #[test]
    fn copy_into_existing_target_checks_type() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-f", &ModelType::named("File")).unwrap();
        s1.set_value(NS1, "SPDXRef-f", "name", text("x.c")).unwrap();
        s2.create(NS2, "SPDXRef-pkg", &ModelType::named("Package")).unwrap();
        s2.create(NS2, "SPDXRef-file", &ModelType::named("File")).unwrap();
        let mgr = CopyManager::new(registry());

        let (to, from) = (Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1));
        let err = mgr.copy_into(to, "SPDXRef-pkg", from, "SPDXRef-f").unwrap_err();
        assert!(matches!(err, CopyError::TypeMismatch { .. }), "{err}");
        assert!(s2.get_value(NS2, "SPDXRef-pkg", "name").unwrap().is_none());

        let copied = mgr.copy_into(to, "SPDXRef-file", from, "SPDXRef-f").unwrap();
        assert_eq!(copied.ty(), &ModelType::named("File"));
        assert_eq!(s2.get_value(NS2, "SPDXRef-file", "name").unwrap(), Some(text("x.c")));
    }

    #[test]
    fn missing_source_is_not_found() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        let mgr = CopyManager::new(registry());
        let err = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-none")
            .unwrap_err();
        assert!(matches!(err, CopyError::NotFound { .. }));
    }

    #[test]
    fn dangling_reference_is_a_consistency_fault() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "SPDXRef-pkg", &ModelType::named("Package")).unwrap();
        s1.add_value(NS1, "SPDXRef-pkg", "hasFile", reference("SPDXRef-gone", "File"))
            .unwrap();
        let mgr = CopyManager::new(registry());
        let err = mgr
            .copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "SPDXRef-pkg")
            .unwrap_err();
        assert!(matches!(err, CopyError::ConsistencyFault { .. }), "{err}");
    }

    #[test]
    fn empty_arguments_are_preconditions() {
        let s1 = InMemoryModelStore::new();
        let mgr = CopyManager::new(registry());
        assert!(matches!(
            mgr.copy(Endpoint::new(&s1, ""), Endpoint::new(&s1, NS1), "x").unwrap_err(),
            CopyError::Precondition(_)
        ));
        assert!(matches!(
            mgr.copy(Endpoint::new(&s1, NS2), Endpoint::new(&s1, NS1), "").unwrap_err(),
            CopyError::Precondition(_)
        ));
    }

    #[test]
    fn unknown_id_collision_is_rejected() {
        let s1 = InMemoryModelStore::new();
        let s2 = InMemoryModelStore::new();
        s1.create(NS1, "weird", &ModelType::named("File")).unwrap();
        s2.create(NS2, "weird", &ModelType::named("File")).unwrap();
        let mgr = CopyManager::new(registry());
        assert!(matches!(
            mgr.copy(Endpoint::new(&s2, NS2), Endpoint::new(&s1, NS1), "weird").unwrap_err(),
            CopyError::UnmintableCollision { .. }
        ));
    }

    #[test]
    fn concurrent_overlapping_copies_deduplicate() {
        let s1 = Arc::new(InMemoryModelStore::new());
        let s2 = Arc::new(InMemoryModelStore::new());
        // Eight packages all sharing one anonymous checksum.
        s1.create(NS1, "__anon__shared", &ModelType::named("Checksum")).unwrap();
        for i in 0..8 {
            let id = format!("SPDXRef-p{i}");
            s1.create(NS1, &id, &ModelType::named("Package")).unwrap();
            s1.add_value(NS1, &id, "checksum", reference("__anon__shared", "Checksum"))
                .unwrap();
        }
        let mgr = Arc::new(CopyManager::new(registry()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let (s1, s2, mgr) = (Arc::clone(&s1), Arc::clone(&s2), Arc::clone(&mgr));
                thread::spawn(move || {
                    let id = format!("SPDXRef-p{i}");
                    mgr.copy(Endpoint::new(s2.as_ref(), NS2), Endpoint::new(s1.as_ref(), NS1), &id)
                        .unwrap();
                    let vals = s2.collection_values(NS2, &id, "checksum").unwrap();
                    vals[0].as_typed().unwrap().id().to_string()
                })
            })
            .collect();
        let targets: HashSet<String> = handles
            .into_iter()
            .map(|h| h.join().expect("thread should not panic"))
            .collect();
        assert_eq!(targets.len(), 1);
        assert_eq!(s2.object_count(NS2).unwrap(), 9);
    }
}
