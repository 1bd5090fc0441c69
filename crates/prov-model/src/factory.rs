//! The object factory contract.

use std::sync::Arc;

use prov_store::ModelStore;
use prov_types::ModelType;

use crate::env::ModelEnv;
use crate::error::{ModelError, ModelResult};
use crate::object::ModelObject;

/// Builds model object handles for store coordinates.
pub trait ObjectFactory: Send + Sync {
    /// Whether this factory knows how to construct objects of `ty`.
    fn constructs(&self, ty: &ModelType, env: &ModelEnv) -> bool;

    /// Build a handle for `(store, namespace, id)` of type `ty`.
    ///
    /// With `create` set, the backing object is created when absent;
    /// otherwise a missing object is `NotFound`.
    fn create(
        &self,
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: &ModelType,
        env: &Arc<ModelEnv>,
        create: bool,
    ) -> ModelResult<ModelObject>;
}

/// Factory producing generic [`ModelObject`] handles for every type the
/// schema registers.
#[derive(Clone, Copy, Debug, Default)]
pub struct GenericObjectFactory;

impl ObjectFactory for GenericObjectFactory {
    fn constructs(&self, ty: &ModelType, env: &ModelEnv) -> bool {
        env.schema().types().contains(ty)
    }

    fn create(
        &self,
        store: Arc<dyn ModelStore>,
        namespace: &str,
        id: &str,
        ty: &ModelType,
        env: &Arc<ModelEnv>,
        create: bool,
    ) -> ModelResult<ModelObject> {
        if id.is_empty() {
            return Err(ModelError::Identifier("object id must not be empty".into()));
        }
        if !self.constructs(ty, env) {
            return Err(ModelError::Type(format!("no constructor for type {ty}")));
        }
        match store.type_of(namespace, id)? {
            Some(existing) if &existing != ty => {
                return Err(ModelError::Type(format!(
                    "{namespace}#{id} has type {existing}, not {ty}"
                )));
            }
            Some(_) => {}
            None if create => store.create(namespace, id, ty)?,
            None => return Err(ModelError::not_found(namespace, id)),
        }
        Ok(ModelObject::bind(store, namespace, id, ty.clone(), Arc::clone(env)))
    }
}
