//! Builder accumulating the configuration of one reactive client.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::fallback::{self, FallbackFactory, FallbackFn};
use crate::{
    ClientSettings, CommandSetterFactory, Contract, DefaultCommandSetterFactory, DefaultContract,
    DefaultRetryHandler, DefaultStatusHandler, LoadBalancing, ReactiveFeignClient, ReactiveOptions,
    RetryHandler, RetryPolicy, StatusHandler,
};

/// Builder for a [`ReactiveFeignClient`] implementing interface `T`.
///
/// Every setter replaces the previous value; nothing is ever unset. Aspects
/// that were never set resolve to builder defaults in [`target`](Self::target).
pub struct ReactiveFeignBuilder<T: ?Sized> {
    contract: Option<Arc<dyn Contract>>,
    options: Option<Arc<ReactiveOptions>>,
    retry_policy: Option<Arc<dyn RetryPolicy>>,
    status_handler: Option<Arc<dyn StatusHandler>>,
    decode404: bool,
    retry_handler: Option<Arc<dyn RetryHandler>>,
    load_balancer: bool,
    command_setter_factory: Option<Arc<dyn CommandSetterFactory>>,
    fallback: Option<Arc<T>>,
    fallback_factory: Option<FallbackFn<T>>,
}

impl<T: ?Sized + 'static> ReactiveFeignBuilder<T> {
    /// Create a builder with nothing configured.
    pub fn new() -> Self {
        Self {
            contract: None,
            options: None,
            retry_policy: None,
            status_handler: None,
            decode404: false,
            retry_handler: None,
            load_balancer: false,
            command_setter_factory: None,
            fallback: None,
            fallback_factory: None,
        }
    }

    /// Set the contract.
    pub fn contract(mut self, contract: Arc<dyn Contract>) -> Self {
        self.contract = Some(contract);
        self
    }

    /// Set the HTTP options.
    pub fn options(mut self, options: Arc<ReactiveOptions>) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the retry policy.
    pub fn retry_when(mut self, policy: Arc<dyn RetryPolicy>) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Set the status handler.
    pub fn status_handler(mut self, handler: Arc<dyn StatusHandler>) -> Self {
        self.status_handler = Some(handler);
        self
    }

    /// Decode 404 responses as empty results instead of errors.
    pub fn decode404(mut self, enable: bool) -> Self {
        self.decode404 = enable;
        self
    }

    /// Set the load-balancer retry handler without enabling load balancing.
    pub fn retry_handler(mut self, handler: Arc<dyn RetryHandler>) -> Self {
        self.retry_handler = Some(handler);
        self
    }

    /// Route calls through the load balancer.
    pub fn enable_load_balancer(mut self) -> Self {
        self.load_balancer = true;
        self
    }

    /// Set the command setter factory.
    pub fn command_setter_factory(mut self, factory: Arc<dyn CommandSetterFactory>) -> Self {
        self.command_setter_factory = Some(factory);
        self
    }

    /// Set the fallback instance.
    pub fn fallback(mut self, fallback: Arc<T>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Set the fallback factory.
    pub fn fallback_factory(mut self, factory: Arc<dyn FallbackFactory<T>>) -> Self {
        self.fallback_factory = Some(fallback::from_factory(factory));
        self
    }

    /// Configured contract, if any.
    pub fn configured_contract(&self) -> Option<&Arc<dyn Contract>> {
        self.contract.as_ref()
    }

    /// Configured options, if any.
    pub fn configured_options(&self) -> Option<&Arc<ReactiveOptions>> {
        self.options.as_ref()
    }

    /// Configured retry policy, if any.
    pub fn configured_retry_policy(&self) -> Option<&Arc<dyn RetryPolicy>> {
        self.retry_policy.as_ref()
    }

    /// Configured status handler, if any.
    pub fn configured_status_handler(&self) -> Option<&Arc<dyn StatusHandler>> {
        self.status_handler.as_ref()
    }

    /// Whether 404 responses are decoded.
    pub fn is_decode404(&self) -> bool {
        self.decode404
    }

    /// Configured load-balancer retry handler, if any.
    pub fn configured_retry_handler(&self) -> Option<&Arc<dyn RetryHandler>> {
        self.retry_handler.as_ref()
    }

    /// Whether load balancing was enabled.
    pub fn is_load_balancer_enabled(&self) -> bool {
        self.load_balancer
    }

    /// Configured command setter factory, if any.
    pub fn configured_command_setter_factory(&self) -> Option<&Arc<dyn CommandSetterFactory>> {
        self.command_setter_factory.as_ref()
    }

    /// Configured fallback instance, if any.
    pub fn configured_fallback(&self) -> Option<&Arc<T>> {
        self.fallback.as_ref()
    }

    /// Configured fallback factory, if any.
    pub fn configured_fallback_factory(&self) -> Option<&FallbackFn<T>> {
        self.fallback_factory.as_ref()
    }

    /// Resolve defaults and bind the client to `name` and `url`.
    pub fn target(self, name: impl Into<String>, url: impl Into<String>) -> ReactiveFeignClient<T> {
        let name = name.into();
        let url = url.into();

        let load_balancing = if self.load_balancer {
            LoadBalancing::Enabled(
                self.retry_handler
                    .unwrap_or_else(|| Arc::new(DefaultRetryHandler::default())),
            )
        } else {
            LoadBalancing::Disabled
        };

        let settings = ClientSettings {
            contract: self.contract.unwrap_or_else(|| Arc::new(DefaultContract)),
            options: self.options.unwrap_or_default(),
            retry_policy: self.retry_policy,
            status_handler: self
                .status_handler
                .unwrap_or_else(|| Arc::new(DefaultStatusHandler)),
            decode404: self.decode404,
            load_balancing,
            command_setter_factory: self
                .command_setter_factory
                .unwrap_or_else(|| Arc::new(DefaultCommandSetterFactory)),
            fallback: self.fallback,
            fallback_factory: self.fallback_factory,
        };

        debug!(
            client = %name,
            url = %url,
            contract = settings.contract.name(),
            load_balanced = settings.load_balancing.is_enabled(),
            decode404 = settings.decode404,
            "Reactive client targeted"
        );

        ReactiveFeignClient::new(name, url, settings)
    }
}

impl<T: ?Sized + 'static> Default for ReactiveFeignBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> Clone for ReactiveFeignBuilder<T> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
            options: self.options.clone(),
            retry_policy: self.retry_policy.clone(),
            status_handler: self.status_handler.clone(),
            decode404: self.decode404,
            retry_handler: self.retry_handler.clone(),
            load_balancer: self.load_balancer,
            command_setter_factory: self.command_setter_factory.clone(),
            fallback: self.fallback.clone(),
            fallback_factory: self.fallback_factory.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ReactiveFeignBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveFeignBuilder")
            .field("contract", &self.contract)
            .field("options", &self.options)
            .field("retry_policy", &self.retry_policy)
            .field("status_handler", &self.status_handler)
            .field("decode404", &self.decode404)
            .field("retry_handler", &self.retry_handler)
            .field("load_balancer", &self.load_balancer)
            .field("command_setter_factory", &self.command_setter_factory)
            .field("fallback", &self.fallback.is_some())
            .field("fallback_factory", &self.fallback_factory.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BackoffRetryPolicy;
    use std::time::Duration;

    trait Echo: Send + Sync {
        fn echo(&self) -> &str;
    }

    struct Fixed(&'static str);

    impl Echo for Fixed {
        fn echo(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_target_resolves_defaults() {
        let client = ReactiveFeignBuilder::<dyn Echo>::new().target("echo", "http://echo");
        let settings = client.settings();

        assert_eq!(settings.contract.name(), "default");
        assert_eq!(*settings.options, ReactiveOptions::default());
        assert!(settings.retry_policy.is_none());
        assert!(!settings.decode404);
        assert!(!settings.load_balancing.is_enabled());
        assert!(settings.fallback.is_none());
    }

    #[test]
    fn test_setters_replace_previous_values() {
        let first = Arc::new(ReactiveOptions::builder().read_timeout(Duration::from_secs(1)).build());
        let second = Arc::new(ReactiveOptions::builder().read_timeout(Duration::from_secs(2)).build());

        let builder = ReactiveFeignBuilder::<dyn Echo>::new()
            .options(first)
            .options(second.clone())
            .retry_when(Arc::new(BackoffRetryPolicy::immediate(1)))
            .decode404(true)
            .decode404(false);

        assert!(Arc::ptr_eq(builder.configured_options().unwrap(), &second));
        assert!(builder.configured_retry_policy().is_some());
        assert!(!builder.is_decode404());
    }

    #[test]
    fn test_load_balancer_uses_configured_retry_handler() {
        let handler: Arc<dyn RetryHandler> = Arc::new(DefaultRetryHandler {
            same_server: 2,
            next_server: 3,
        });
        let client = ReactiveFeignBuilder::<dyn Echo>::new()
            .retry_handler(handler)
            .enable_load_balancer()
            .target("echo", "http://echo");

        let retry_handler = client.settings().load_balancing.retry_handler().unwrap();
        assert_eq!(retry_handler.retry_same_server(), 2);
    }

    #[test]
    fn test_retry_handler_alone_does_not_enable_load_balancing() {
        let client = ReactiveFeignBuilder::<dyn Echo>::new()
            .retry_handler(Arc::new(DefaultRetryHandler::default()))
            .target("echo", "http://localhost:8080");

        assert!(!client.is_load_balanced());
    }

    #[test]
    fn test_fallback_factory_is_wrapped() {
        let factory: Arc<dyn FallbackFactory<dyn Echo>> =
            Arc::new(|_: &crate::ClientError| -> Arc<dyn Echo> { Arc::new(Fixed("from factory")) });
        let builder = ReactiveFeignBuilder::<dyn Echo>::new().fallback_factory(factory);

        let create = builder.configured_fallback_factory().unwrap();
        let echo = create(&crate::ClientError::Connection("down".into()));
        assert_eq!(echo.echo(), "from factory");
    }
}
