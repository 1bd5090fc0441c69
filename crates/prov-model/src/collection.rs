//! Live views over collection properties.

use std::fmt;
use std::sync::Arc;

use prov_store::ModelStore;
use prov_types::{ModelType, StoredValue};

use crate::convert::{model_to_stored, stored_to_model};
use crate::env::ModelEnv;
use crate::error::{ModelError, ModelResult};
use crate::value::ModelValue;

/// A view over one collection property of one object.
///
/// The view caches nothing: every read takes a fresh snapshot from the
/// store, so two views over the same property always agree. Collections
/// have set semantics; adding a member that is already present changes
/// nothing and returns `false`.
///
/// Bulk mutations run inside the namespace critical section. A failure
/// part way through leaves the members changed so far in place.
pub struct ModelCollection {
    store: Arc<dyn ModelStore>,
    namespace: String,
    id: String,
    property: String,
    element_type: Option<ModelType>,
    env: Arc<ModelEnv>,
}

impl ModelCollection {
    /// Open a view. Fails with `NotFound` if the owner does not exist and
    /// with `Type` if existing members are not assignable to `element_type`.
    pub fn new(
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        property: &str,
        element_type: Option<ModelType>,
        env: Arc<ModelEnv>,
    ) -> ModelResult<Self> {
        if !store.exists(namespace, id)? {
            return Err(ModelError::not_found(namespace, id));
        }
        if let Some(ty) = &element_type {
            let types = env.schema().types();
            if !types.contains(ty) {
                return Err(ModelError::Type(format!("element type {ty} is not registered")));
            }
            if !store.collection_members_assignable(namespace, id, property, ty, types)? {
                return Err(ModelError::Type(format!(
                    "members of {namespace}#{id}.{property} are not all {ty}"
                )));
            }
        }
        Ok(Self {
            store,
            namespace: namespace.to_string(),
            id: id.to_string(),
            property: property.to_string(),
            element_type,
            env,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn owner_id(&self) -> &str {
        &self.id
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn element_type(&self) -> Option<&ModelType> {
        self.element_type.as_ref()
    }

    pub fn size(&self) -> ModelResult<usize> {
        Ok(self
            .store
            .collection_size(&self.namespace, &self.id, &self.property)?)
    }

    pub fn is_empty(&self) -> ModelResult<bool> {
        Ok(self.size()? == 0)
    }

    pub fn contains(&self, value: &ModelValue) -> ModelResult<bool> {
        match self.lookup_form(value)? {
            Some(stored) => Ok(self
                .store
                .collection_contains(&self.namespace, &self.id, &self.property, &stored)?),
            None => Ok(false),
        }
    }

    /// Iterate over a snapshot taken now. Each member is converted as it is
    /// yielded.
    pub fn iter(&self) -> ModelResult<CollectionIter> {
        let values = self
            .store
            .collection_values(&self.namespace, &self.id, &self.property)?;
        Ok(CollectionIter {
            values: values.into_iter(),
            namespace: self.namespace.clone(),
            store: Arc::clone(&self.store),
            env: Arc::clone(&self.env),
        })
    }

    pub fn to_vec(&self) -> ModelResult<Vec<ModelValue>> {
        self.iter()?.collect()
    }

    /// Add a member. Returns `true` if membership changed.
    pub fn add(&self, value: impl Into<ModelValue>) -> ModelResult<bool> {
        let value = value.into();
        self.check_element_type(&value)?;
        let stored = model_to_stored(&value, &self.namespace, self.store.as_ref(), &self.env)?;
        Ok(self
            .store
            .add_value(&self.namespace, &self.id, &self.property, stored)?)
    }

    /// Remove a member. Returns `true` if it was present.
    pub fn remove(&self, value: &ModelValue) -> ModelResult<bool> {
        match self.lookup_form(value)? {
            Some(stored) => Ok(self
                .store
                .remove_value(&self.namespace, &self.id, &self.property, &stored)?),
            None => Ok(false),
        }
    }

    pub fn add_all<I>(&self, values: I) -> ModelResult<bool>
    where
        I: IntoIterator,
        I::Item: Into<ModelValue>,
    {
        let _section = self.store.enter_critical_section(&self.namespace, false)?;
        let mut changed = false;
        for value in values {
            changed |= self.add(value)?;
        }
        Ok(changed)
    }

    pub fn remove_all(&self, values: &[ModelValue]) -> ModelResult<bool> {
        let _section = self.store.enter_critical_section(&self.namespace, false)?;
        let mut changed = false;
        for value in values {
            changed |= self.remove(value)?;
        }
        Ok(changed)
    }

    /// Keep only members present in `values`.
    pub fn retain_all(&self, values: &[ModelValue]) -> ModelResult<bool> {
        let _section = self.store.enter_critical_section(&self.namespace, false)?;
        let mut keep = Vec::with_capacity(values.len());
        for value in values {
            if let Some(stored) = self.lookup_form(value)? {
                keep.push(stored);
            }
        }
        let mut changed = false;
        for member in self
            .store
            .collection_values(&self.namespace, &self.id, &self.property)?
        {
            if !keep.contains(&member) {
                changed |= self
                    .store
                    .remove_value(&self.namespace, &self.id, &self.property, &member)?;
            }
        }
        Ok(changed)
    }

    pub fn clear(&self) -> ModelResult<()> {
        let _section = self.store.enter_critical_section(&self.namespace, false)?;
        self.store
            .clear_collection(&self.namespace, &self.id, &self.property)?;
        Ok(())
    }

    /// The stored form used to find `value` among the members, or `None` if
    /// it cannot be a member (an object bound to another store or
    /// namespace).
    fn lookup_form(&self, value: &ModelValue) -> ModelResult<Option<StoredValue>> {
        if let ModelValue::Object(object) = value {
            if !object.is_bound_to(self.store.store_id(), &self.namespace) {
                return Ok(None);
            }
        }
        model_to_stored(value, &self.namespace, self.store.as_ref(), &self.env).map(Some)
    }

    fn check_element_type(&self, value: &ModelValue) -> ModelResult<()> {
        let Some(expected) = &self.element_type else {
            return Ok(());
        };
        match value {
            ModelValue::Object(object)
                if self.env.schema().types().is_assignable(object.ty(), expected) =>
            {
                Ok(())
            }
            other => Err(ModelError::Type(format!(
                "{other:?} cannot be added to a collection of {expected}"
            ))),
        }
    }
}

impl fmt::Debug for ModelCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelCollection")
            .field("namespace", &self.namespace)
            .field("id", &self.id)
            .field("property", &self.property)
            .field("element_type", &self.element_type)
            .finish()
    }
}

/// Iterator over a collection snapshot.
pub struct CollectionIter {
    values: std::vec::IntoIter<StoredValue>,
    namespace: String,
    store: Arc<dyn ModelStore>,
    env: Arc<ModelEnv>,
}

impl Iterator for CollectionIter {
    type Item = ModelResult<ModelValue>;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.values.next()?;
        Some(stored_to_model(value, &self.namespace, &self.store, &self.env))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}
