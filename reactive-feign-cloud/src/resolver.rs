// Capability resolution for one named client

use crate::{ApplicationContext, CloudError, Component, NamedContexts, Result, TypeRef};
use std::any::type_name;
use std::sync::Arc;
use tracing::{debug, trace};

/// Outcome of [`Resolver::lookup_or_instantiate`].
pub enum Resolution<C: ?Sized> {
    /// A singleton was registered for the type.
    Found(Arc<C>),
    /// No singleton; a new instance was constructed.
    Instantiated(Arc<C>),
    /// Neither lookup nor construction succeeded.
    Failed(CloudError),
}

impl<C: ?Sized> Resolution<C> {
    pub fn into_result(self) -> Result<Arc<C>> {
        match self {
            Self::Found(instance) | Self::Instantiated(instance) => Ok(instance),
            Self::Failed(err) => Err(err),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    pub fn is_instantiated(&self) -> bool {
        matches!(self, Self::Instantiated(_))
    }
}

/// Looks up capabilities of one client in the per-client registry and
/// type-named beans in the application context.
pub struct Resolver<'a> {
    client: &'a str,
    application: &'a ApplicationContext,
    contexts: &'a NamedContexts,
}

impl<'a> Resolver<'a> {
    pub fn new(
        client: &'a str,
        application: &'a ApplicationContext,
        contexts: &'a NamedContexts,
    ) -> Self {
        Self {
            client,
            application,
            contexts,
        }
    }

    pub fn client(&self) -> &str {
        self.client
    }

    /// Capability `C` of this client, if registered.
    pub fn lookup_optional<C>(&self) -> Option<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.contexts.get_instance::<C>(self.client)
    }

    /// Capability `C` of this client; absence is an error.
    pub fn lookup_required<C>(&self) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.lookup_optional::<C>()
            .ok_or_else(|| CloudError::NotFound {
                capability: type_name::<C>().to_string(),
                client: self.client.to_string(),
            })
    }

    /// Singleton registered for `type_ref`, or a new instance of it.
    pub fn lookup_or_instantiate<C>(&self, type_ref: &TypeRef) -> Resolution<C>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match self.application.get_bean::<C>(type_ref) {
            Ok(instance) => {
                trace!(client = self.client, bean = %type_ref, "Using registered singleton");
                Resolution::Found(instance)
            }
            Err(CloudError::NoSuchBean(_)) => match self.application.instantiate::<C>(type_ref) {
                Ok(instance) => {
                    debug!(client = self.client, bean = %type_ref, "Instantiated bean");
                    Resolution::Instantiated(instance)
                }
                Err(err) => Resolution::Failed(err),
            },
            Err(err) => Resolution::Failed(err),
        }
    }

    /// Named bean `bean_type` of this client, which must be declared as `C`.
    ///
    /// `mechanism` names what the bean is used for in error messages.
    pub fn lookup_required_assignable<C>(&self, mechanism: &str, bean_type: &TypeRef) -> Result<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let bean = self
            .contexts
            .get_named(self.client, bean_type)
            .ok_or_else(|| CloudError::NotFound {
                capability: format!("{mechanism} instance of type {bean_type}"),
                client: self.client.to_string(),
            })?;

        bean.downcast_ref::<Arc<C>>()
            .cloned()
            .ok_or_else(|| CloudError::IncompatibleType {
                mechanism: mechanism.to_string(),
                bean_type: bean_type.to_string(),
                target_type: type_name::<C>().to_string(),
                client: self.client.to_string(),
            })
    }

    /// Resolve a layer component; `Unset` resolves to `None`.
    pub fn resolve<C>(&self, component: &Component<C>) -> Result<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        match component {
            Component::Unset => Ok(None),
            Component::Instance(instance) => Ok(Some(instance.clone())),
            Component::Type(type_ref) => self.lookup_or_instantiate(type_ref).into_result().map(Some),
        }
    }
}
