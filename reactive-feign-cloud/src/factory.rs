// Client factory

use crate::{
    ApplicationContext, ClientIdentity, ConfigLayer, ConfigurationMerger, GlobalDefaults,
    NamedContexts, ReactiveFeignClientProperties, Resolver, Result, TargetUrlBuilder,
};
use reactive_feign_client::{
    CommandSetterFactory, Contract, ReactiveFeignBuilder, ReactiveFeignClient, ReactiveOptions,
    RetryPolicy, StatusHandler,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Values every builder starts from before any layer is applied.
///
/// Registered in the shared client context; a client context may register its
/// own to replace them.
#[derive(Debug, Clone, Default)]
pub struct BuilderDefaults {
    pub contract: Option<Arc<dyn Contract>>,
    pub options: Option<Arc<ReactiveOptions>>,
    pub retry_policy: Option<Arc<dyn RetryPolicy>>,
    pub status_handler: Option<Arc<dyn StatusHandler>>,
    pub command_setter_factory: Option<Arc<dyn CommandSetterFactory>>,
}

impl BuilderDefaults {
    pub fn builder<T: ?Sized + 'static>(&self) -> ReactiveFeignBuilder<T> {
        let mut builder = ReactiveFeignBuilder::new();
        if let Some(contract) = &self.contract {
            builder = builder.contract(contract.clone());
        }
        if let Some(options) = &self.options {
            builder = builder.options(options.clone());
        }
        if let Some(policy) = &self.retry_policy {
            builder = builder.retry_when(policy.clone());
        }
        if let Some(handler) = &self.status_handler {
            builder = builder.status_handler(handler.clone());
        }
        if let Some(factory) = &self.command_setter_factory {
            builder = builder.command_setter_factory(factory.clone());
        }
        builder
    }
}

/// Produces configured clients from registries and properties.
///
/// Holds no per-build state: every [`build`](Self::build) starts from fresh
/// builder defaults and may run concurrently with others.
#[derive(Clone)]
pub struct ClientFactory {
    application: Arc<ApplicationContext>,
    contexts: Arc<NamedContexts>,
    properties: Option<Arc<ReactiveFeignClientProperties>>,
}

impl ClientFactory {
    pub fn new(application: Arc<ApplicationContext>, contexts: Arc<NamedContexts>) -> Self {
        Self {
            application,
            contexts,
            properties: None,
        }
    }

    pub fn with_properties(mut self, properties: ReactiveFeignClientProperties) -> Self {
        self.properties = Some(Arc::new(properties));
        self
    }

    pub fn application(&self) -> &ApplicationContext {
        &self.application
    }

    pub fn contexts(&self) -> &NamedContexts {
        &self.contexts
    }

    pub fn properties(&self) -> Option<&ReactiveFeignClientProperties> {
        self.properties.as_deref()
    }

    /// Build the client declared by `identity`.
    ///
    /// Without properties only the context layer is applied.
    pub fn build<T>(&self, identity: &ClientIdentity) -> Result<ReactiveFeignClient<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        identity.validate()?;
        let resolver = Resolver::new(&identity.name, &self.application, &self.contexts);
        let context = ConfigLayer::context(&resolver, identity)?;

        let layers = match self.properties.as_deref() {
            Some(properties) => {
                let defaults = properties.global_defaults();
                let property_layers = [defaults.default_config_key.as_str(), identity.name.as_str()]
                    .into_iter()
                    .filter_map(|key| {
                        properties
                            .client(key)
                            .map(|block| ConfigLayer::properties(key, block))
                    })
                    .collect();
                ConfigurationMerger::order_layers(
                    defaults.apply_context_config_first,
                    context,
                    property_layers,
                )
            }
            None => vec![context],
        };

        self.assemble(&resolver, identity, &layers)
    }

    /// Build a client from caller-supplied layers, ordered per `defaults`.
    pub fn build_with_layers<T>(
        &self,
        identity: &ClientIdentity,
        context: ConfigLayer<T>,
        property_layers: Vec<ConfigLayer<T>>,
        defaults: &GlobalDefaults,
    ) -> Result<ReactiveFeignClient<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        identity.validate()?;
        let resolver = Resolver::new(&identity.name, &self.application, &self.contexts);
        let layers = ConfigurationMerger::order_layers(
            defaults.apply_context_config_first,
            context,
            property_layers,
        );
        self.assemble(&resolver, identity, &layers)
    }

    fn assemble<T>(
        &self,
        resolver: &Resolver<'_>,
        identity: &ClientIdentity,
        layers: &[ConfigLayer<T>],
    ) -> Result<ReactiveFeignClient<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let initial = resolver.lookup_required::<BuilderDefaults>()?.builder::<T>();
        let load_balanced = identity.is_load_balanced();
        let mut resolved = ConfigurationMerger::new(resolver)
            .with_load_balancing(load_balanced)
            .merge(initial, layers)?;

        if load_balanced {
            resolved = resolved.enable_load_balancer();
        }

        let url = TargetUrlBuilder::build_url(identity);
        debug!(
            client = %identity.name,
            layers = layers.len(),
            load_balanced,
            "Client configuration resolved"
        );

        let client = resolved.target(identity.name.clone(), url);
        info!(client = %client.name(), url = %client.url(), "Reactive client created");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ClientConfigOverride, ClientProperties, CloudError, Component, LayerSource, TypeRef};
    use reactive_feign_client::{ClientError, DefaultContract, FallbackFactory};

    trait Ledger: std::fmt::Debug + Send + Sync {
        fn balance(&self) -> i64;
    }

    #[derive(Debug)]
    struct Zero;

    impl Ledger for Zero {
        fn balance(&self) -> i64 {
            0
        }
    }

    #[derive(Debug)]
    struct Named(&'static str);

    impl Contract for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    fn factory() -> ClientFactory {
        ClientFactory::new(Arc::new(ApplicationContext::new()), Arc::new(NamedContexts::new()))
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let result = factory().build::<dyn Ledger>(&ClientIdentity::new(""));
        assert!(matches!(result, Err(CloudError::Config(_))));
    }

    #[test]
    fn test_defaults_without_properties() {
        let client = factory()
            .build::<dyn Ledger>(&ClientIdentity::new("ledger").with_path("api/"))
            .unwrap();

        assert_eq!(client.name(), "ledger");
        assert_eq!(client.url(), "http://ledger/api");
        assert!(client.is_load_balanced());
        assert_eq!(client.settings().contract.name(), "default");
        assert!(!client.settings().decode404);
    }

    #[test]
    fn test_explicit_url_disables_load_balancing() {
        let client = factory()
            .build::<dyn Ledger>(&ClientIdentity::new("ledger").with_url("localhost:8080"))
            .unwrap();

        assert_eq!(client.url(), "http://localhost:8080");
        assert!(!client.is_load_balanced());
    }

    #[test]
    fn test_builder_defaults_are_required() {
        let factory =
            ClientFactory::new(Arc::new(ApplicationContext::new()), Arc::new(NamedContexts::empty()));
        let result = factory.build::<dyn Ledger>(&ClientIdentity::new("ledger"));
        assert!(matches!(result, Err(CloudError::NotFound { client, .. }) if client == "ledger"));
    }

    #[test]
    fn test_client_builder_defaults_replace_shared_ones() {
        let factory = factory();
        factory.contexts().register(
            "ledger",
            Arc::new(BuilderDefaults {
                contract: Some(Arc::new(Named("ledger-defaults"))),
                ..Default::default()
            }),
        );

        let ledger = factory.build::<dyn Ledger>(&ClientIdentity::new("ledger")).unwrap();
        let audit = factory.build::<dyn Ledger>(&ClientIdentity::new("audit")).unwrap();
        assert_eq!(ledger.settings().contract.name(), "ledger-defaults");
        assert_eq!(audit.settings().contract.name(), "default");
    }

    #[test]
    fn test_property_precedence_follows_default_to_properties() {
        let build = |default_to_properties: bool| {
            let factory = factory().with_properties(ReactiveFeignClientProperties {
                default_to_properties,
                ..Default::default()
            }
            .with_client(
                "ledger",
                ClientProperties {
                    contract: Some(TypeRef::new("strict")),
                    ..Default::default()
                },
            ));
            factory
                .application()
                .register_constructor::<dyn Contract, _>("strict", || Arc::new(Named("strict")));
            factory
                .contexts()
                .register::<dyn Contract>("ledger", Arc::new(Named("context")));
            factory.build::<dyn Ledger>(&ClientIdentity::new("ledger")).unwrap()
        };

        assert_eq!(build(true).settings().contract.name(), "strict");
        assert_eq!(build(false).settings().contract.name(), "context");
    }

    #[test]
    fn test_build_with_layers() {
        let context = ConfigLayer::new(
            LayerSource::Context,
            ClientConfigOverride::<dyn Ledger>::new().with_contract(Component::Instance(Arc::new(
                Named("context"),
            ))),
        );
        let client_block = ConfigLayer::new(
            LayerSource::Properties("ledger".into()),
            ClientConfigOverride::new().with_contract(Component::Instance(Arc::new(DefaultContract))),
        );
        let defaults = GlobalDefaults {
            apply_context_config_first: false,
            default_config_key: "default".into(),
        };

        let client = factory()
            .build_with_layers(&ClientIdentity::new("ledger"), context, vec![client_block], &defaults)
            .unwrap();
        assert_eq!(client.settings().contract.name(), "context");
    }

    #[test]
    fn test_declared_fallback_must_match_client_type() {
        let factory = factory();
        factory
            .contexts()
            .register_named::<dyn Contract>("ledger", "zero", Arc::new(DefaultContract));

        let result =
            factory.build::<dyn Ledger>(&ClientIdentity::new("ledger").with_fallback("zero"));
        assert!(matches!(result, Err(CloudError::IncompatibleType { .. })));
    }

    #[test]
    fn test_declared_fallback_factory() {
        struct ZeroFactory;

        impl FallbackFactory<dyn Ledger> for ZeroFactory {
            fn create(&self, _cause: &ClientError) -> Arc<dyn Ledger> {
                Arc::new(Zero)
            }
        }

        let factory = factory();
        factory.contexts().register_named::<dyn FallbackFactory<dyn Ledger>>(
            "ledger",
            "zero-factory",
            Arc::new(ZeroFactory),
        );

        let client = factory
            .build::<dyn Ledger>(&ClientIdentity::new("ledger").with_fallback_factory("zero-factory"))
            .unwrap();
        let fallback = client
            .fallback_for(&ClientError::Connection("down".into()))
            .unwrap();
        assert_eq!(fallback.balance(), 0);
    }
}
