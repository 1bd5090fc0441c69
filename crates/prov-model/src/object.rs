use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::debug;

use prov_store::{ModelStore, StoreId};
use prov_types::{core_types, EnumConstant, IdKind, ModelType, Primitive, TypedValue};

use crate::collection::ModelCollection;
use crate::convert::{model_to_stored, stored_to_model};
use crate::env::ModelEnv;
use crate::error::ModelResult;
use crate::properties;
use crate::related::RelatedElementCollection;
use crate::value::ModelValue;

/// Handle to an object at `(store, namespace, id)`.
///
/// A handle holds no property data; every read goes to the store. Two
/// handles are equal when they address the same object in the same store,
/// whatever environment they were created under.
#[derive(Clone)]
pub struct ModelObject {
    store: Arc<dyn ModelStore>,
    namespace: String,
    id: String,
    ty: ModelType,
    env: Arc<ModelEnv>,
}

impl ModelObject {
    pub(crate) fn bind(
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: ModelType,
        env: Arc<ModelEnv>,
    ) -> Self {
        Self {
            store,
            namespace: namespace.to_string(),
            id: id.to_string(),
            ty,
            env,
        }
    }

    /// Open the object, creating it in the store if it does not exist yet.
    pub fn create(
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: &ModelType,
        env: &Arc<ModelEnv>,
    ) -> ModelResult<Self> {
        env.factory().create(store, namespace, id, ty, env, true)
    }

    /// Open an existing object.
    pub fn open(
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: &ModelType,
        env: &Arc<ModelEnv>,
    ) -> ModelResult<Self> {
        env.factory().create(store, namespace, id, ty, env, false)
    }

    pub fn store(&self) -> &Arc<dyn ModelStore> {
        &self.store
    }

    pub fn store_id(&self) -> StoreId {
        self.store.store_id()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn ty(&self) -> &ModelType {
        &self.ty
    }

    pub fn env(&self) -> &Arc<ModelEnv> {
        &self.env
    }

    /// The reference form of this object.
    pub fn typed_value(&self) -> ModelResult<TypedValue> {
        Ok(TypedValue::new(
            self.id.as_str(),
            self.ty.clone(),
            self.env.schema().types(),
        )?)
    }

    pub fn is_bound_to(&self, store: StoreId, namespace: &str) -> bool {
        self.store_id() == store && self.namespace == namespace
    }

    /// Whether the backing object still exists.
    pub fn exists(&self) -> ModelResult<bool> {
        Ok(self.store.exists(&self.namespace, &self.id)?)
    }

    /// Value of a single-valued property.
    pub fn get(&self, property: &str) -> ModelResult<Option<ModelValue>> {
        match self.store.get_value(&self.namespace, &self.id, property)? {
            Some(stored) => Ok(Some(stored_to_model(
                stored,
                &self.namespace,
                &self.store,
                &self.env,
            )?)),
            None => Ok(None),
        }
    }

    /// A string property, or `None` if it is unset or not a string.
    pub fn get_string(&self, property: &str) -> ModelResult<Option<String>> {
        Ok(self
            .store
            .get_value(&self.namespace, &self.id, property)?
            .and_then(|v| v.as_primitive().and_then(Primitive::as_str).map(str::to_string)))
    }

    /// Set a single-valued property. Objects from other stores or namespaces
    /// are copied in if the environment has a copy manager.
    pub fn set(&self, property: &str, value: impl Into<ModelValue>) -> ModelResult<()> {
        let stored =
            model_to_stored(&value.into(), &self.namespace, self.store.as_ref(), &self.env)?;
        self.store
            .set_value(&self.namespace, &self.id, property, stored)?;
        Ok(())
    }

    /// Unset a property. Returns `true` if it was set.
    pub fn remove(&self, property: &str) -> ModelResult<bool> {
        Ok(self
            .store
            .remove_property(&self.namespace, &self.id, property)?)
    }

    /// Live view of a collection property.
    pub fn collection(&self, property: &str) -> ModelResult<ModelCollection> {
        ModelCollection::new(
            Arc::clone(&self.store),
            &self.namespace,
            &self.id,
            property,
            None,
            Arc::clone(&self.env),
        )
    }

    /// Live view of a collection property whose members must be objects
    /// assignable to `element_type`.
    pub fn typed_collection(
        &self,
        property: &str,
        element_type: &ModelType,
    ) -> ModelResult<ModelCollection> {
        ModelCollection::new(
            Arc::clone(&self.store),
            &self.namespace,
            &self.id,
            property,
            Some(element_type.clone()),
            Arc::clone(&self.env),
        )
    }

    /// The relationships this element owns.
    pub fn relationships(&self) -> ModelResult<ModelCollection> {
        self.typed_collection(properties::RELATIONSHIP, &core_types::RELATIONSHIP.into())
    }

    /// Create a relationship object in this element's namespace pointing at
    /// `related`. The relationship is not added to
    /// [`relationships`](Self::relationships).
    pub fn create_relationship(
        &self,
        related: &ModelValue,
        relationship_type: &EnumConstant,
        comment: Option<&str>,
    ) -> ModelResult<ModelObject> {
        let id = self.store.next_id(IdKind::ElementRef, &self.namespace)?;
        let relationship = ModelObject::create(
            Arc::clone(&self.store),
            &self.namespace,
            &id,
            &core_types::RELATIONSHIP.into(),
            &self.env,
        )?;
        relationship.set(properties::RELATIONSHIP_TYPE, relationship_type.clone())?;
        relationship.set(properties::RELATED_ELEMENT, related.clone())?;
        if let Some(comment) = comment {
            relationship.set(properties::COMMENT, comment)?;
        }
        debug!(
            owner = %self.id,
            relationship = %id,
            relationship_type = relationship_type.name(),
            "created relationship"
        );
        Ok(relationship)
    }

    /// Elements related to this one through relationships matching the
    /// filters.
    pub fn related_elements(
        &self,
        relationship_type: Option<EnumConstant>,
        element_type: Option<ModelType>,
    ) -> ModelResult<RelatedElementCollection> {
        RelatedElementCollection::new(self.clone(), relationship_type, element_type)
    }
}

impl PartialEq for ModelObject {
    fn eq(&self, other: &Self) -> bool {
        self.store_id() == other.store_id()
            && self.namespace == other.namespace
            && self.id == other.id
    }
}

impl Eq for ModelObject {}

impl Hash for ModelObject {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.store_id().hash(state);
        self.namespace.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Debug for ModelObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}#{})", self.ty, self.namespace, self.id)
    }
}
