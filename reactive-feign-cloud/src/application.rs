// Application-wide bean registry

use crate::{CloudError, Result, TypeRef};
use parking_lot::RwLock;
use std::any::{Any, type_name};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

pub(crate) type Bean = Arc<dyn Any + Send + Sync>;

/// Zero-argument constructor of a capability implementation.
pub type Constructor<C> = Arc<dyn Fn() -> Arc<C> + Send + Sync>;

/// Singletons and constructors shared by every client, keyed by type name.
///
/// A bean is registered *as* a capability `C` (for example `dyn Contract`)
/// and can only be retrieved as that capability.
#[derive(Default)]
pub struct ApplicationContext {
    singletons: RwLock<HashMap<TypeRef, Bean>>,
    constructors: RwLock<HashMap<TypeRef, Bean>>,
}

impl ApplicationContext {
    pub fn new() -> Self {
        debug!("Creating new application context");
        Self::default()
    }

    /// Register a singleton for `type_ref`
    pub fn register_singleton<C>(&self, type_ref: impl Into<TypeRef>, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let type_ref = type_ref.into();
        trace!(bean = %type_ref, capability = type_name::<C>(), "Registering singleton");
        self.singletons.write().insert(type_ref.clone(), Arc::new(instance));
        debug!(bean = %type_ref, "Singleton registered in application context");
    }

    /// Register the zero-argument constructor of `type_ref`
    pub fn register_constructor<C, F>(&self, type_ref: impl Into<TypeRef>, constructor: F)
    where
        C: ?Sized + Send + Sync + 'static,
        F: Fn() -> Arc<C> + Send + Sync + 'static,
    {
        let type_ref = type_ref.into();
        let constructor: Constructor<C> = Arc::new(constructor);
        self.constructors
            .write()
            .insert(type_ref.clone(), Arc::new(constructor));
        debug!(bean = %type_ref, capability = type_name::<C>(), "Constructor registered");
    }

    /// Resolve the singleton registered for `type_ref`
    pub fn get_bean<C>(&self, type_ref: &TypeRef) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let bean = self
            .singletons
            .read()
            .get(type_ref)
            .cloned()
            .ok_or_else(|| CloudError::NoSuchBean(type_ref.to_string()))?;

        let instance = bean
            .downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or_else(|| CloudError::IncompatibleBean {
                bean_type: type_ref.to_string(),
                expected: type_name::<C>().to_string(),
            })?;

        trace!(bean = %type_ref, "Singleton resolved");
        Ok(instance)
    }

    /// Create a new instance of `type_ref` with its registered constructor
    pub fn instantiate<C>(&self, type_ref: &TypeRef) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let bean = self
            .constructors
            .read()
            .get(type_ref)
            .cloned()
            .ok_or_else(|| CloudError::Instantiation {
                type_name: type_ref.to_string(),
                reason: "no zero-argument constructor registered".to_string(),
            })?;

        let constructor = bean.downcast_ref::<Constructor<C>>().ok_or_else(|| {
            CloudError::IncompatibleBean {
                bean_type: type_ref.to_string(),
                expected: type_name::<C>().to_string(),
            }
        })?;

        trace!(bean = %type_ref, "Instantiating bean");
        Ok(constructor())
    }

    pub fn has_bean(&self, type_ref: &TypeRef) -> bool {
        self.singletons.read().contains_key(type_ref)
    }

    pub fn has_constructor(&self, type_ref: &TypeRef) -> bool {
        self.constructors.read().contains_key(type_ref)
    }

    pub fn clear(&self) {
        let mut singletons = self.singletons.write();
        let mut constructors = self.constructors.write();
        let count = singletons.len() + constructors.len();
        singletons.clear();
        constructors.clear();
        drop((singletons, constructors));
        debug!(bean_count = count, "Cleared application context");
    }
}
