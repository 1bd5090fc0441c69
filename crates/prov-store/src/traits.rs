use std::fmt;

use serde::{Deserialize, Serialize};

use prov_types::{IdKind, ModelType, StoredValue, TypeRegistry};

use crate::critical::CriticalSection;
use crate::error::StoreResult;

/// Identity of a store instance, used to decide whether two objects live in
/// the same store.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StoreId(uuid::Uuid);

impl StoreId {
    /// A fresh, time-ordered store identity.
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for StoreId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StoreId({})", self.0)
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Property-value store for model objects.
///
/// Objects are addressed by `(namespace, id)`; the same id in two namespaces
/// names two unrelated objects. Every method is atomic on its own. Callers
/// that need a read-modify-write sequence to be consistent must wrap it in
/// [`enter_critical_section`](ModelStore::enter_critical_section).
///
/// Collection properties have set semantics: adding a value already present
/// is a no-op. Backends that keep insertion order should preserve it.
pub trait ModelStore: Send + Sync {
    /// Identity of this store instance.
    fn store_id(&self) -> StoreId;

    /// Whether an object exists at `(namespace, id)`.
    fn exists(&self, namespace: &str, id: &str) -> StoreResult<bool>;

    /// Create an empty object. Fails if one already exists.
    fn create(&self, namespace: &str, id: &str, ty: &ModelType) -> StoreResult<()>;

    /// The type of the object, or `None` if it does not exist.
    fn type_of(&self, namespace: &str, id: &str) -> StoreResult<Option<ModelType>>;

    /// Classify `id`. Backends that know more than the lexical form (for
    /// example, listed license ids) may refine the result.
    fn id_kind(&self, id: &str) -> StoreResult<IdKind> {
        Ok(IdKind::classify(id))
    }

    /// Names of all properties currently set on the object.
    fn property_names(&self, namespace: &str, id: &str) -> StoreResult<Vec<String>>;

    /// Value of a single-valued property.
    fn get_value(&self, namespace: &str, id: &str, property: &str)
        -> StoreResult<Option<StoredValue>>;

    /// Set a single-valued property, replacing any previous value.
    fn set_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> StoreResult<()>;

    /// Remove a property of either arity. Returns `true` if it was set.
    fn remove_property(&self, namespace: &str, id: &str, property: &str) -> StoreResult<bool>;

    /// Whether the property currently holds a collection.
    fn is_collection(&self, namespace: &str, id: &str, property: &str) -> StoreResult<bool>;

    /// A snapshot of a collection property. An unset property is empty.
    fn collection_values(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
    ) -> StoreResult<Vec<StoredValue>>;

    fn collection_size(&self, namespace: &str, id: &str, property: &str) -> StoreResult<usize> {
        Ok(self.collection_values(namespace, id, property)?.len())
    }

    fn collection_contains(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: &StoredValue,
    ) -> StoreResult<bool> {
        Ok(self
            .collection_values(namespace, id, property)?
            .contains(value))
    }

    /// Add a value to a collection. Returns `true` if membership changed.
    fn add_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: StoredValue,
    ) -> StoreResult<bool>;

    /// Remove a value from a collection. Returns `true` if it was present.
    fn remove_value(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        value: &StoredValue,
    ) -> StoreResult<bool>;

    /// Remove every value from a collection.
    fn clear_collection(&self, namespace: &str, id: &str, property: &str) -> StoreResult<()>;

    /// Whether every member of the collection is a typed reference whose
    /// type is assignable to `ty`.
    fn collection_members_assignable(
        &self,
        namespace: &str,
        id: &str,
        property: &str,
        ty: &ModelType,
        types: &dyn TypeRegistry,
    ) -> StoreResult<bool> {
        let values = self.collection_values(namespace, id, property)?;
        Ok(values.iter().all(|v| match v {
            StoredValue::Typed(tv) => types.is_assignable(tv.ty(), ty),
            _ => false,
        }))
    }

    /// Mint an identifier of `kind` that is unused in `namespace`.
    fn next_id(&self, kind: IdKind, namespace: &str) -> StoreResult<String>;

    /// Enter the critical section scoped to `namespace`.
    fn enter_critical_section(&self, namespace: &str, read_only: bool)
        -> StoreResult<CriticalSection>;

    /// Delete an object. Fails with `IdInUse` while another object in the
    /// namespace still references it.
    fn delete(&self, namespace: &str, id: &str) -> StoreResult<()>;

    /// All object ids in `namespace`, sorted.
    fn ids(&self, namespace: &str) -> StoreResult<Vec<String>>;
}
