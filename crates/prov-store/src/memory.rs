use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use prov_types::{IdKind, ModelType, StoredValue};

use crate::critical::{CriticalSection, NamespaceLocks};
use crate::error::{StoreError, StoreResult};
use crate::traits::{ModelStore, StoreId};

#[derive(Clone, Debug)]
enum Slot {
    Single(StoredValue),
    Many(Vec<StoredValue>),
}

#[derive(Clone, Debug)]
struct StoredObject {
    ty: ModelType,
    properties: BTreeMap<String, Slot>,
}

impl StoredObject {
    fn references(&self, id: &str) -> bool {
        self.properties.values().any(|slot| match slot {
            Slot::Single(v) => v.references(id),
            Slot::Many(vs) => vs.iter().any(|v| v.references(id)),
        })
    }
}

type Namespaces = HashMap<String, HashMap<String, StoredObject>>;

/// In-memory, HashMap-based model store.
///
/// Intended for tests and embedding. All state sits behind one `RwLock`;
/// collection values keep insertion order.
pub struct InMemoryModelStore {
    id: StoreId,
    namespaces: RwLock<Namespaces>,
    next_generated: AtomicU64,
    listed: RwLock<HashSet<String>>,
    locks: NamespaceLocks,
}

impl InMemoryModelStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            id: StoreId::new(),
            namespaces: RwLock::new(HashMap::new()),
            next_generated: AtomicU64::new(0),
            listed: RwLock::new(HashSet::new()),
            locks: NamespaceLocks::new(),
        }
    }

    /// Number of objects in `namespace`.
    pub fn object_count(&self, namespace: &str) -> StoreResult<usize> {
        let state = self.read_state()?;
        Ok(state.get(namespace).map_or(0, HashMap::len))
    }

    /// Number of objects across all namespaces.
    pub fn total_objects(&self) -> StoreResult<usize> {
        let state = self.read_state()?;
        Ok(state.values().map(HashMap::len).sum())
    }

    /// Report `id` as a listed license id from [`ModelStore::id_kind`].
    pub fn register_listed(&self, id: &str) -> StoreResult<()> {
        self.listed
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .insert(id.to_string());
        Ok(())
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, Namespaces>> {
        self.namespaces
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, Namespaces>> {
        self.namespaces
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn with_object<T>(
        &self,
        namespace: &str,
        id: &str,
        f: impl FnOnce(&StoredObject) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let state = self.read_state()?;
        let object = state
            .get(namespace)
            .and_then(|objects| objects.get(id))
            .ok_or_else(|| StoreError::not_found(namespace, id))?;
        f(object)
    }

    fn with_object_mut<T>(
        &self,
        namespace: &str,
        id: &str,
        f: impl FnOnce(&mut StoredObject) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut state = self.write_state()?;
        let object = state
            .get_mut(namespace)
            .and_then(|objects| objects.get_mut(id))
            .ok_or_else(|| StoreError::not_found(namespace, id))?;
        f(object)
    }
}

impl Default for InMemoryModelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelStore for InMemoryModelStore {
    fn store_id(&self) -> StoreId {
        self.id
    }

    fn exists(&self, namespace: &str, id: &str) -> StoreResult<bool> {
        let state = self.read_state()?;
        Ok(state
            .get(namespace)
            .is_some_and(|objects| objects.contains_key(id)))
    }

    fn create(&self, namespace: &str, id: &str, ty: &ModelType) -> StoreResult<()> {
        let mut state = self.write_state()?;
        let objects = state.entry(namespace.to_string()).or_default();
        if objects.contains_key(id) {
            return Err(StoreError::AlreadyExists {
                namespace: namespace.to_string(),
                id: id.to_string(),
            });
        }
        objects.insert(
            id.to_string(),
            StoredObject {
                ty: ty.clone(),
                properties: BTreeMap::new(),
            },
        );
        debug!(store = %self.id, namespace, id, %ty, "created object");
        Ok(())
    }

    fn type_of(&self, namespace: &str, id: &str) -> StoreResult<Option<ModelType>> {
        let state = self.read_state()?;
        Ok(state
            .get(namespace)
            .and_then(|objects| objects.get(id))
            .map(|o| o.ty.clone()))
    }

    fn id_kind(&self, id: &str) -> StoreResult<IdKind> {
        let listed = self
            .listed
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?
            .contains(id);
        if listed {
            Ok(IdKind::ListedLicense)
        } else {
            Ok(IdKind::classify(id))
        }
    }

    fn property_names(&self, namespace: &str, id: &str) -> StoreResult<Vec<String>> {
        self.with_object(namespace, id, |o| Ok(o.properties.keys().cloned().collect()))
    }

    fn get_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
    ) -> StoreResult<Option<StoredValue>> {
        self.with_object(namespace, id, |o| match o.properties.get(property) {
            None => Ok(None),
            Some(Slot::Single(v)) => Ok(Some(v.clone())),
            Some(Slot::Many(_)) => Err(StoreError::NotAScalar {
                id: id.to_string(),
                property: property.to_string(),
            }),
        })
    }

    fn set_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> StoreResult<()> {
        self.with_object_mut(namespace, id, |o| {
            o.properties.insert(property.to_string(), Slot::Single(value));
            Ok(())
        })
    }

    fn remove_property(&self, namespace: &str, id: &str, property: &str) -> StoreResult<bool> {
        self.with_object_mut(namespace, id, |o| Ok(o.properties.remove(property).is_some()))
    }

    fn is_collection(&self, namespace: &str, id: &str, property: &str) -> StoreResult<bool> {
        self.with_object(namespace, id, |o| {
            Ok(matches!(o.properties.get(property), Some(Slot::Many(_))))
        })
    }

    fn collection_values(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
    ) -> StoreResult<Vec<StoredValue>> {
        self.with_object(namespace, id, |o| match o.properties.get(property) {
            None => Ok(Vec::new()),
            Some(Slot::Many(vs)) => Ok(vs.clone()),
            Some(Slot::Single(_)) => Err(StoreError::NotACollection {
                id: id.to_string(),
                property: property.to_string(),
            }),
        })
    }

    fn add_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> StoreResult<bool> {
        self.with_object_mut(namespace, id, |o| {
            let slot = o
                .properties
                .entry(property.to_string())
                .or_insert_with(|| Slot::Many(Vec::new()));
            match slot {
                Slot::Many(vs) => {
                    if vs.contains(&value) {
                        Ok(false)
                    } else {
                        vs.push(value);
                        Ok(true)
                    }
                }
                Slot::Single(_) => Err(StoreError::NotACollection {
                    id: id.to_string(),
                    property: property.to_string(),
                }),
            }
        })
    }

    fn remove_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: &StoredValue,
    ) -> StoreResult<bool> {
        self.with_object_mut(namespace, id, |o| match o.properties.get_mut(property) {
            None => Ok(false),
            Some(Slot::Many(vs)) => {
                let before = vs.len();
                vs.retain(|v| v != value);
                Ok(vs.len() != before)
            }
            Some(Slot::Single(_)) => Err(StoreError::NotACollection {
                id: id.to_string(),
                property: property.to_string(),
            }),
        })
    }

    fn clear_collection(&self, namespace: &str, id: &str, property: &str) -> StoreResult<()> {
        self.with_object_mut(namespace, id, |o| match o.properties.get_mut(property) {
            None => Ok(()),
            Some(Slot::Many(vs)) => {
                vs.clear();
                Ok(())
            }
            Some(Slot::Single(_)) => Err(StoreError::NotACollection {
                id: id.to_string(),
                property: property.to_string(),
            }),
        })
    }

    fn next_id(&self, kind: IdKind, namespace: &str) -> StoreResult<String> {
        if !kind.is_mintable() {
            return Err(StoreError::UnsupportedIdKind(kind));
        }
        loop {
            let n = self.next_generated.fetch_add(1, Ordering::Relaxed);
            let candidate = kind
                .generated(n)
                .ok_or(StoreError::UnsupportedIdKind(kind))?;
            if !self.exists(namespace, &candidate)? {
                debug!(namespace, id = %candidate, %kind, "minted id");
                return Ok(candidate);
            }
        }
    }

    fn enter_critical_section(
        &self,
        namespace: &str,
        read_only: bool,
    ) -> StoreResult<CriticalSection> {
        self.locks.enter(namespace, read_only)
    }

    fn delete(&self, namespace: &str, id: &str) -> StoreResult<()> {
        let mut state = self.write_state()?;
        let objects = state
            .get_mut(namespace)
            .ok_or_else(|| StoreError::not_found(namespace, id))?;
        if !objects.contains_key(id) {
            return Err(StoreError::not_found(namespace, id));
        }
        if let Some((referrer, _)) = objects
            .iter()
            .find(|(other, o)| other.as_str() != id && o.references(id))
        {
            return Err(StoreError::IdInUse {
                namespace: namespace.to_string(),
                id: id.to_string(),
                referenced_by: referrer.clone(),
            });
        }
        objects.remove(id);
        debug!(store = %self.id, namespace, id, "deleted object");
        Ok(())
    }

    fn ids(&self, namespace: &str) -> StoreResult<Vec<String>> {
        let state = self.read_state()?;
        let mut ids: Vec<String> = state
            .get(namespace)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort();
        Ok(ids)
    }
}

impl std::fmt::Debug for InMemoryModelStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryModelStore")
            .field("id", &self.id)
            .field("object_count", &self.total_objects().ok())
            .finish()
    }
}
