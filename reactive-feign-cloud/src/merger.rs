// Folding override layers into a client builder

use crate::{ConfigLayer, Resolver, Result};
use reactive_feign_client::ReactiveFeignBuilder;
use tracing::debug;

/// Builder state once every layer has been applied.
pub type ResolvedClientConfig<T> = ReactiveFeignBuilder<T>;

/// Applies override layers in order; later layers win field by field.
pub struct ConfigurationMerger<'r, 'a> {
    resolver: &'r Resolver<'a>,
    load_balanced: bool,
}

impl<'r, 'a> ConfigurationMerger<'r, 'a> {
    pub fn new(resolver: &'r Resolver<'a>) -> Self {
        Self {
            resolver,
            load_balanced: true,
        }
    }

    /// Retry handler overrides are only resolved for load-balanced clients.
    pub fn with_load_balancing(mut self, load_balanced: bool) -> Self {
        self.load_balanced = load_balanced;
        self
    }

    /// Order the context layer relative to the property layers.
    ///
    /// `property_layers` must already be ordered default block first, client
    /// block second. With `apply_context_config_first` the property layers
    /// get the final say, otherwise the context layer does.
    pub fn order_layers<T: ?Sized>(
        apply_context_config_first: bool,
        context: ConfigLayer<T>,
        property_layers: Vec<ConfigLayer<T>>,
    ) -> Vec<ConfigLayer<T>> {
        let mut layers = Vec::with_capacity(property_layers.len() + 1);
        if apply_context_config_first {
            layers.push(context);
            layers.extend(property_layers);
        } else {
            layers.extend(property_layers);
            layers.push(context);
        }
        layers
    }

    /// Apply `layers` to `initial` in order.
    pub fn merge<T>(
        &self,
        initial: ResolvedClientConfig<T>,
        layers: &[ConfigLayer<T>],
    ) -> Result<ResolvedClientConfig<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        layers
            .iter()
            .try_fold(initial, |builder, layer| self.apply(builder, layer))
    }

    /// Apply the fields `layer` sets; unset fields are left alone.
    pub fn apply<T>(
        &self,
        mut builder: ResolvedClientConfig<T>,
        layer: &ConfigLayer<T>,
    ) -> Result<ResolvedClientConfig<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let config = &layer.config;

        if let Some(contract) = self.resolver.resolve(&config.contract)? {
            builder = builder.contract(contract);
        }
        if let Some(options) = self.resolver.resolve(&config.options)? {
            builder = builder.options(options);
        }
        if let Some(policy) = self.resolver.resolve(&config.retry_policy)? {
            builder = builder.retry_when(policy);
        }
        if let Some(handler) = self.resolver.resolve(&config.status_handler)? {
            builder = builder.status_handler(handler);
        }
        if let Some(decode404) = config.decode404 {
            builder = builder.decode404(decode404);
        }
        if self.load_balanced {
            if let Some(handler) = self.resolver.resolve(&config.retry_handler)? {
                builder = builder.retry_handler(handler);
            }
        }
        if let Some(factory) = self.resolver.resolve(&config.command_setter_factory)? {
            builder = builder.command_setter_factory(factory);
        }
        if let Some(factory) = self.resolver.resolve(&config.fallback_factory)? {
            builder = builder.fallback_factory(factory);
        }
        if let Some(fallback) = self.resolver.resolve(&config.fallback)? {
            builder = builder.fallback(fallback);
        }

        debug!(
            client = self.resolver.client(),
            layer = %layer.source,
            "Applied configuration layer"
        );
        Ok(builder)
    }
}
