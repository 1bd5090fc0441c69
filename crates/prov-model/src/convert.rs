//! Storage class conversion between [`StoredValue`] and [`ModelValue`].

use std::sync::Arc;

use prov_copy::Endpoint;
use prov_store::ModelStore;
use prov_types::{IndividualUri, StoredValue, TypedValue, ValueError};

use crate::env::ModelEnv;
use crate::error::{ModelError, ModelResult};
use crate::inflate::Inflate;
use crate::value::ModelValue;

/// Convert a stored value read from `(store, namespace)` into a model value.
///
/// URIs are inflated, typed references become object handles bound to the
/// same store and namespace, primitives pass through.
pub fn stored_to_model(
    value: StoredValue,
    namespace: &str,
    store: &Arc<dyn ModelStore>,
    env: &Arc<ModelEnv>,
) -> ModelResult<ModelValue> {
    match value {
        StoredValue::Primitive(p) => Ok(ModelValue::Primitive(p)),
        StoredValue::Uri(uri) => Ok(uri.inflate(env, Some(namespace))),
        StoredValue::Typed(tv) => {
            let (id, ty) = tv.into_parts();
            let object = env
                .factory()
                .create(Arc::clone(store), namespace, &id, &ty, env, false)?;
            Ok(ModelValue::Object(object))
        }
    }
}

/// Convert a model value for writing into `(store, namespace)`.
///
/// URI-shaped values are persisted in their bare form. An object bound
/// elsewhere is copied through the environment's copy manager; without one
/// the write is a [`ModelError::CrossStoreReference`].
pub fn model_to_stored(
    value: &ModelValue,
    namespace: &str,
    store: &dyn ModelStore,
    env: &ModelEnv,
) -> ModelResult<StoredValue> {
    match value {
        ModelValue::Primitive(p) => Ok(StoredValue::Primitive(p.clone())),
        ModelValue::Uri(u) => Ok(StoredValue::Uri(u.clone())),
        ModelValue::Enum(v) => Ok(StoredValue::Uri(v.to_uri_value())),
        ModelValue::Literal(v) => Ok(StoredValue::Uri(v.to_uri_value())),
        ModelValue::ReferenceType(v) => Ok(StoredValue::Uri(v.to_uri_value())),
        ModelValue::External(v) => Ok(StoredValue::Uri(v.to_uri_value())),
        ModelValue::Object(object) => {
            if object.is_bound_to(store.store_id(), namespace) {
                let typed = TypedValue::new(object.id(), object.ty().clone(), env.schema().types())
                    .map_err(|err| match err {
                        ValueError::UnregisteredType(ty) => ModelError::InvalidPropertyType(
                            format!("object type {ty} is not registered"),
                        ),
                        other => other.into(),
                    })?;
                return Ok(StoredValue::Typed(typed));
            }
            let Some(copy_manager) = env.copy_manager() else {
                return Err(ModelError::CrossStoreReference {
                    id: object.id().to_string(),
                    source_namespace: object.namespace().to_string(),
                    target_namespace: namespace.to_string(),
                });
            };
            let copied = copy_manager.copy(
                Endpoint::new(store, namespace),
                Endpoint::new(object.store().as_ref(), object.namespace()),
                object.id(),
            )?;
            Ok(StoredValue::Typed(copied))
        }
    }
}

#[cfg(test)]
mod tests {
    use prov_copy::CopyManager;
    use prov_store::InMemoryModelStore;
    use prov_types::{
        core_types, families, EnumRegistry, IndividualUriValue, Primitive, Schema, SpecVersion,
        StaticTypeRegistry,
    };

    use super::*;
    use crate::object::ModelObject;

    fn env() -> Arc<ModelEnv> {
        ModelEnv::new(Schema::core(SpecVersion::V3_0)).into_shared()
    }

    fn store() -> Arc<dyn ModelStore> {
        Arc::new(InMemoryModelStore::new())
    }

    #[test]
    fn enum_is_stored_as_bare_uri() {
        let env = env();
        let store = store();
        let constant = env
            .schema()
            .enums()
            .constant(SpecVersion::V3_0, families::RELATIONSHIP_TYPE, "DESCRIBES")
            .unwrap()
            .clone();
        let stored = model_to_stored(&constant.clone().into(), "http://doc/1", store.as_ref(), &env)
            .unwrap();
        assert_eq!(stored, StoredValue::Uri(IndividualUriValue::new(constant.uri()).unwrap()));

        let back = stored_to_model(stored, "http://doc/1", &store, &env).unwrap();
        assert_eq!(back.as_enum(), Some(&constant));
    }

    #[test]
    fn primitives_pass_through() {
        let env = env();
        let store = store();
        let stored = model_to_stored(&ModelValue::from(42i64), "ns", store.as_ref(), &env).unwrap();
        assert_eq!(stored, StoredValue::Primitive(Primitive::Integer(42)));
    }

    #[test]
    fn same_store_object_becomes_typed_value() {
        let env = env();
        let store = store();
        let file = ModelObject::create(
            Arc::clone(&store),
            "http://doc/1",
            "SPDXRef-f",
            &core_types::FILE.into(),
            &env,
        )
        .unwrap();
        let stored =
            model_to_stored(&file.clone().into(), "http://doc/1", store.as_ref(), &env).unwrap();
        let typed = stored.as_typed().unwrap();
        assert_eq!(typed.id(), "SPDXRef-f");

        let back = stored_to_model(stored, "http://doc/1", &store, &env).unwrap();
        assert_eq!(back.as_object(), Some(&file));
    }

    #[test]
    fn foreign_object_without_copy_manager_is_rejected() {
        let env = env();
        let (s1, s2) = (store(), store());
        let file = ModelObject::create(
            Arc::clone(&s1),
            "http://doc/1",
            "SPDXRef-f",
            &core_types::FILE.into(),
            &env,
        )
        .unwrap();
        let err = model_to_stored(&file.into(), "http://doc/2", s2.as_ref(), &env).unwrap_err();
        assert!(matches!(err, ModelError::CrossStoreReference { .. }));
        assert_eq!(s2.ids("http://doc/2").unwrap().len(), 0);
    }

    #[test]
    fn foreign_object_is_copied_through_manager() {
        let schema = Schema::core(SpecVersion::V3_0);
        let manager = Arc::new(CopyManager::new(Arc::new(StaticTypeRegistry::core())));
        let env = ModelEnv::new(schema).with_copy_manager(manager).into_shared();
        let (s1, s2) = (store(), store());
        let file = ModelObject::create(
            Arc::clone(&s1),
            "http://doc/1",
            "SPDXRef-f",
            &core_types::FILE.into(),
            &env,
        )
        .unwrap();
        file.set("name", "a.c").unwrap();

        let stored = model_to_stored(&file.into(), "http://doc/2", s2.as_ref(), &env).unwrap();
        assert_eq!(stored.as_typed().unwrap().id(), "SPDXRef-f");
        assert!(s2.exists("http://doc/2", "SPDXRef-f").unwrap());
    }

    #[test]
    fn unregistered_object_type_is_invalid() {
        let registry = StaticTypeRegistry::core().with_type("Widget", None);
        let wide =
            Schema::new(SpecVersion::V3_0, Arc::new(registry), Arc::new(EnumRegistry::core()));
        let wide_env = ModelEnv::new(wide).into_shared();
        let store = store();
        let widget =
            ModelObject::create(Arc::clone(&store), "ns", "SPDXRef-w", &"Widget".into(), &wide_env)
                .unwrap();

        let narrow = env();
        let err = model_to_stored(&widget.into(), "ns", store.as_ref(), &narrow).unwrap_err();
        assert!(matches!(err, ModelError::InvalidPropertyType(_)));
    }

    #[test]
    fn dangling_typed_reference_is_not_found() {
        let env = env();
        let store = store();
        let dangling =
            TypedValue::new("SPDXRef-gone", core_types::FILE.into(), env.schema().types()).unwrap();
        let err = stored_to_model(StoredValue::Typed(dangling), "ns", &store, &env).unwrap_err();
        assert!(matches!(err, ModelError::NotFound { .. }));
    }
}
