// Per-client registries

use crate::application::Bean;
use crate::{BuilderDefaults, TypeRef};
use parking_lot::RwLock;
use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Default)]
struct Beans {
    capabilities: HashMap<TypeId, Bean>,
    named: HashMap<TypeRef, Bean>,
}

impl Beans {
    fn capability<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.capabilities
            .get(&TypeId::of::<C>())
            .and_then(|bean| bean.downcast_ref::<Arc<C>>().cloned())
    }
}

/// Beans visible to each named client.
///
/// Every client sees its own beans first and the shared defaults second.
/// Capability beans are keyed by the capability they were registered as;
/// named beans (fallbacks and fallback factories) by their type name.
pub struct NamedContexts {
    defaults: RwLock<Beans>,
    clients: RwLock<HashMap<String, Beans>>,
}

impl NamedContexts {
    /// Create contexts whose shared defaults hold the standard
    /// [`BuilderDefaults`].
    pub fn new() -> Self {
        let contexts = Self::empty();
        contexts.register_default(Arc::new(BuilderDefaults::default()));
        contexts
    }

    /// Create contexts without any shared defaults.
    pub fn empty() -> Self {
        debug!("Creating named client contexts");
        Self {
            defaults: RwLock::new(Beans::default()),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Register a capability shared by every client
    pub fn register_default<C>(&self, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.defaults
            .write()
            .capabilities
            .insert(TypeId::of::<C>(), Arc::new(instance));
        debug!(capability = type_name::<C>(), "Shared capability registered");
    }

    /// Register a capability for one client
    pub fn register<C>(&self, client: &str, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.clients
            .write()
            .entry(client.to_string())
            .or_default()
            .capabilities
            .insert(TypeId::of::<C>(), Arc::new(instance));
        debug!(client, capability = type_name::<C>(), "Client capability registered");
    }

    /// Register a named bean for one client, declared as type `C`
    pub fn register_named<C>(&self, client: &str, type_ref: impl Into<TypeRef>, instance: Arc<C>)
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let type_ref = type_ref.into();
        trace!(client, bean = %type_ref, declared = type_name::<C>(), "Registering named bean");
        self.clients
            .write()
            .entry(client.to_string())
            .or_default()
            .named
            .insert(type_ref.clone(), Arc::new(instance));
        debug!(client, bean = %type_ref, "Named bean registered");
    }

    /// Look up capability `C` for `client`
    pub fn get_instance<C>(&self, client: &str) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let own = self
            .clients
            .read()
            .get(client)
            .and_then(|beans| beans.capability::<C>());

        let instance = own.or_else(|| self.defaults.read().capability::<C>());
        trace!(
            client,
            capability = type_name::<C>(),
            found = instance.is_some(),
            "Capability lookup"
        );
        instance
    }

    pub(crate) fn get_named(&self, client: &str, type_ref: &TypeRef) -> Option<Bean> {
        let own = self
            .clients
            .read()
            .get(client)
            .and_then(|beans| beans.named.get(type_ref).cloned());
        own.or_else(|| self.defaults.read().named.get(type_ref).cloned())
    }

    pub fn client_names(&self) -> Vec<String> {
        self.clients.read().keys().cloned().collect()
    }
}

impl Default for NamedContexts {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reactive_feign_client::{Contract, DefaultContract, StatusHandler};

    #[derive(Debug)]
    struct Lenient;

    impl Contract for Lenient {
        fn name(&self) -> &str {
            "lenient"
        }
    }

    #[test]
    fn test_client_beans_shadow_defaults() {
        let contexts = NamedContexts::new();
        contexts.register_default::<dyn Contract>(Arc::new(DefaultContract));
        contexts.register::<dyn Contract>("orders", Arc::new(Lenient));

        let orders = contexts.get_instance::<dyn Contract>("orders").unwrap();
        let billing = contexts.get_instance::<dyn Contract>("billing").unwrap();
        assert_eq!(orders.name(), "lenient");
        assert_eq!(billing.name(), "default");
    }

    #[test]
    fn test_absent_capability() {
        let contexts = NamedContexts::new();
        contexts.register::<dyn Contract>("orders", Arc::new(Lenient));

        assert!(contexts.get_instance::<dyn StatusHandler>("orders").is_none());
    }

    #[test]
    fn test_new_registers_builder_defaults() {
        assert!(NamedContexts::new().get_instance::<BuilderDefaults>("any").is_some());
        assert!(NamedContexts::empty().get_instance::<BuilderDefaults>("any").is_none());
    }

    #[test]
    fn test_named_beans_are_per_client() {
        let contexts = NamedContexts::new();
        contexts.register_named::<dyn Contract>("orders", "lenient", Arc::new(Lenient));

        assert!(contexts.get_named("orders", &"lenient".into()).is_some());
        assert!(contexts.get_named("billing", &"lenient".into()).is_none());
        assert_eq!(contexts.client_names(), vec!["orders".to_string()]);
    }
}
