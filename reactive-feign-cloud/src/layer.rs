// Override layers applied to a client builder

use crate::{ClientIdentity, ClientProperties, Component, Resolver, Result};
use reactive_feign_client::{
    CommandSetterFactory, Contract, FallbackFactory, ReactiveOptions, RetryHandler, RetryPolicy,
    StatusHandler,
};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Partial configuration of a client interface `T`.
///
/// Unset fields leave whatever a lower layer (or the builder default) chose.
pub struct ClientConfigOverride<T: ?Sized> {
    pub contract: Component<dyn Contract>,
    pub options: Component<ReactiveOptions>,
    pub retry_policy: Component<dyn RetryPolicy>,
    pub status_handler: Component<dyn StatusHandler>,
    pub decode404: Option<bool>,
    pub retry_handler: Component<dyn RetryHandler>,
    pub command_setter_factory: Component<dyn CommandSetterFactory>,
    pub fallback_factory: Component<dyn FallbackFactory<T>>,
    pub fallback: Component<T>,
}

impl<T: ?Sized + 'static> ClientConfigOverride<T> {
    pub fn new() -> Self {
        Self {
            contract: Component::Unset,
            options: Component::Unset,
            retry_policy: Component::Unset,
            status_handler: Component::Unset,
            decode404: None,
            retry_handler: Component::Unset,
            command_setter_factory: Component::Unset,
            fallback_factory: Component::Unset,
            fallback: Component::Unset,
        }
    }

    /// Layer described by a property block; every component is a type reference.
    pub fn from_properties(properties: &ClientProperties) -> Self {
        Self {
            contract: properties.contract.clone().into(),
            options: properties.http_options.clone().into(),
            retry_policy: properties.retry_policy.clone().into(),
            status_handler: properties.status_handler.clone().into(),
            decode404: properties.decode404,
            retry_handler: properties.retry_handler.clone().into(),
            command_setter_factory: properties.command_setter_factory.clone().into(),
            fallback_factory: properties.fallback_factory.clone().into(),
            fallback: properties.fallback.clone().into(),
        }
    }

    pub fn with_contract(mut self, contract: Component<dyn Contract>) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_options(mut self, options: Component<ReactiveOptions>) -> Self {
        self.options = options;
        self
    }

    pub fn with_retry_policy(mut self, policy: Component<dyn RetryPolicy>) -> Self {
        self.retry_policy = policy;
        self
    }

    pub fn with_status_handler(mut self, handler: Component<dyn StatusHandler>) -> Self {
        self.status_handler = handler;
        self
    }

    pub fn with_decode404(mut self, decode404: bool) -> Self {
        self.decode404 = Some(decode404);
        self
    }

    pub fn with_retry_handler(mut self, handler: Component<dyn RetryHandler>) -> Self {
        self.retry_handler = handler;
        self
    }

    pub fn with_command_setter_factory(
        mut self,
        factory: Component<dyn CommandSetterFactory>,
    ) -> Self {
        self.command_setter_factory = factory;
        self
    }

    pub fn with_fallback_factory(mut self, factory: Component<dyn FallbackFactory<T>>) -> Self {
        self.fallback_factory = factory;
        self
    }

    pub fn with_fallback(mut self, fallback: Component<T>) -> Self {
        self.fallback = fallback;
        self
    }
}

impl<T: ?Sized + 'static> Default for ClientConfigOverride<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ClientConfigOverride<T> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
            options: self.options.clone(),
            retry_policy: self.retry_policy.clone(),
            status_handler: self.status_handler.clone(),
            decode404: self.decode404,
            retry_handler: self.retry_handler.clone(),
            command_setter_factory: self.command_setter_factory.clone(),
            fallback_factory: self.fallback_factory.clone(),
            fallback: self.fallback.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ClientConfigOverride<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfigOverride")
            .field("contract", &self.contract)
            .field("options", &self.options)
            .field("retry_policy", &self.retry_policy)
            .field("status_handler", &self.status_handler)
            .field("decode404", &self.decode404)
            .field("retry_handler", &self.retry_handler)
            .field("command_setter_factory", &self.command_setter_factory)
            .field("fallback_factory", &self.fallback_factory)
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Where a layer came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerSource {
    /// Beans of the client's context.
    Context,
    /// Property block under the given key.
    Properties(String),
}

impl fmt::Display for LayerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Context => f.write_str("context"),
            Self::Properties(key) => write!(f, "properties[{key}]"),
        }
    }
}

/// An override together with its origin.
pub struct ConfigLayer<T: ?Sized> {
    pub source: LayerSource,
    pub config: ClientConfigOverride<T>,
}

impl<T: ?Sized> Clone for ConfigLayer<T> {
    fn clone(&self) -> Self {
        Self {
            source: self.source.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ConfigLayer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("source", &self.source)
            .field("config", &self.config)
            .finish()
    }
}

impl<T: ?Sized + Send + Sync + 'static> ConfigLayer<T> {
    pub fn new(source: LayerSource, config: ClientConfigOverride<T>) -> Self {
        Self { source, config }
    }

    /// Layer of the property block stored under `key`.
    pub fn properties(key: impl Into<String>, properties: &ClientProperties) -> Self {
        Self::new(
            LayerSource::Properties(key.into()),
            ClientConfigOverride::from_properties(properties),
        )
    }

    /// Layer of the beans registered for the client.
    ///
    /// Capabilities are optional; the fallback and fallback factory declared
    /// on `identity` are required and must be declared as the client type.
    pub fn context(resolver: &Resolver<'_>, identity: &ClientIdentity) -> Result<Self> {
        let mut config = ClientConfigOverride::new();
        config.contract = instance(resolver.lookup_optional::<dyn Contract>());
        config.options = instance(resolver.lookup_optional::<ReactiveOptions>());
        config.retry_policy = instance(resolver.lookup_optional::<dyn RetryPolicy>());
        config.status_handler = instance(resolver.lookup_optional::<dyn StatusHandler>());
        config.decode404 = identity.decode404.then_some(true);
        config.retry_handler = instance(resolver.lookup_optional::<dyn RetryHandler>());
        config.command_setter_factory =
            instance(resolver.lookup_optional::<dyn CommandSetterFactory>());

        if let Some(factory) = &identity.fallback_factory {
            config.fallback_factory = Component::Instance(
                resolver.lookup_required_assignable::<dyn FallbackFactory<T>>("fallbackFactory", factory)?,
            );
        }
        if let Some(fallback) = &identity.fallback {
            config.fallback =
                Component::Instance(resolver.lookup_required_assignable::<T>("fallback", fallback)?);
        }

        trace!(client = resolver.client(), layer = ?config, "Context layer resolved");
        Ok(Self::new(LayerSource::Context, config))
    }
}

fn instance<C: ?Sized>(found: Option<Arc<C>>) -> Component<C> {
    found.map_or(Component::Unset, Component::Instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApplicationContext, CloudError, NamedContexts, TypeRef};
    use reactive_feign_client::{ClientError, DefaultContract};

    trait Catalog: fmt::Debug + Send + Sync {
        fn items(&self) -> Vec<String>;
    }

    #[derive(Debug)]
    struct EmptyCatalog;

    impl Catalog for EmptyCatalog {
        fn items(&self) -> Vec<String> {
            Vec::new()
        }
    }

    struct EmptyCatalogFactory;

    impl FallbackFactory<dyn Catalog> for EmptyCatalogFactory {
        fn create(&self, _cause: &ClientError) -> Arc<dyn Catalog> {
            Arc::new(EmptyCatalog)
        }
    }

    #[test]
    fn test_from_properties_maps_every_field() {
        let properties = ClientProperties {
            contract: Some(TypeRef::new("strict")),
            http_options: Some(TypeRef::new("short")),
            decode404: Some(false),
            fallback: Some(TypeRef::new("empty")),
            ..Default::default()
        };

        let layer = ClientConfigOverride::<dyn Catalog>::from_properties(&properties);
        assert!(matches!(layer.contract, Component::Type(ref t) if t.as_str() == "strict"));
        assert!(matches!(layer.options, Component::Type(ref t) if t.as_str() == "short"));
        assert!(matches!(layer.fallback, Component::Type(_)));
        assert_eq!(layer.decode404, Some(false));
        assert!(!layer.retry_policy.is_set());
        assert!(!layer.fallback_factory.is_set());
    }

    #[test]
    fn test_context_layer_collects_registered_beans() {
        let application = ApplicationContext::new();
        let contexts = NamedContexts::new();
        contexts.register::<dyn Contract>("catalog", Arc::new(DefaultContract));
        contexts.register_named::<dyn Catalog>("catalog", "empty", Arc::new(EmptyCatalog));
        contexts.register_named::<dyn FallbackFactory<dyn Catalog>>(
            "catalog",
            "empty-factory",
            Arc::new(EmptyCatalogFactory),
        );
        let resolver = Resolver::new("catalog", &application, &contexts);
        let identity = ClientIdentity::new("catalog")
            .with_decode404(true)
            .with_fallback("empty")
            .with_fallback_factory("empty-factory");

        let layer = ConfigLayer::<dyn Catalog>::context(&resolver, &identity).unwrap();
        assert_eq!(layer.source, LayerSource::Context);
        assert!(matches!(layer.config.contract, Component::Instance(_)));
        assert!(!layer.config.retry_policy.is_set());
        assert_eq!(layer.config.decode404, Some(true));
        assert!(matches!(layer.config.fallback, Component::Instance(_)));
        assert!(matches!(layer.config.fallback_factory, Component::Instance(_)));
    }

    #[test]
    fn test_context_layer_leaves_decode404_unset() {
        let application = ApplicationContext::new();
        let contexts = NamedContexts::new();
        let resolver = Resolver::new("catalog", &application, &contexts);

        let layer =
            ConfigLayer::<dyn Catalog>::context(&resolver, &ClientIdentity::new("catalog")).unwrap();
        assert_eq!(layer.config.decode404, None);
    }

    #[test]
    fn test_context_layer_requires_declared_fallback() {
        let application = ApplicationContext::new();
        let contexts = NamedContexts::new();
        let resolver = Resolver::new("catalog", &application, &contexts);
        let identity = ClientIdentity::new("catalog").with_fallback("empty");

        let err = ConfigLayer::<dyn Catalog>::context(&resolver, &identity).unwrap_err();
        assert!(matches!(err, CloudError::NotFound { .. }));
        assert!(err.to_string().contains("fallback"));
    }

    #[test]
    fn test_layer_source_display() {
        assert_eq!(LayerSource::Context.to_string(), "context");
        assert_eq!(
            LayerSource::Properties("default".into()).to_string(),
            "properties[default]"
        );
    }
}
