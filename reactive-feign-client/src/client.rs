//! The configured reactive client.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::fallback::FallbackFn;
use crate::{
    ClientError, CommandSetter, CommandSetterFactory, Contract, LoadBalancing, ReactiveOptions,
    Result, RetryPolicy, StatusHandler,
};

/// Cross-cutting behaviors a client was built with, defaults resolved.
pub struct ClientSettings<T: ?Sized> {
    /// Contract.
    pub contract: Arc<dyn Contract>,
    /// HTTP options.
    pub options: Arc<ReactiveOptions>,
    /// Retry policy; no retries when absent.
    pub retry_policy: Option<Arc<dyn RetryPolicy>>,
    /// Status handler.
    pub status_handler: Arc<dyn StatusHandler>,
    /// Decode 404 responses as empty results.
    pub decode404: bool,
    /// Load-balancing mode.
    pub load_balancing: LoadBalancing,
    /// Command setter factory.
    pub command_setter_factory: Arc<dyn CommandSetterFactory>,
    /// Fallback instance.
    pub fallback: Option<Arc<T>>,
    /// Per-failure fallback constructor.
    pub fallback_factory: Option<FallbackFn<T>>,
}

impl<T: ?Sized> Clone for ClientSettings<T> {
    fn clone(&self) -> Self {
        Self {
            contract: self.contract.clone(),
            options: self.options.clone(),
            retry_policy: self.retry_policy.clone(),
            status_handler: self.status_handler.clone(),
            decode404: self.decode404,
            load_balancing: self.load_balancing.clone(),
            command_setter_factory: self.command_setter_factory.clone(),
            fallback: self.fallback.clone(),
            fallback_factory: self.fallback_factory.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ClientSettings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("contract", &self.contract)
            .field("options", &self.options)
            .field("retry_policy", &self.retry_policy)
            .field("status_handler", &self.status_handler)
            .field("decode404", &self.decode404)
            .field("load_balancing", &self.load_balancing)
            .field("command_setter_factory", &self.command_setter_factory)
            .field("fallback", &self.fallback.is_some())
            .field("fallback_factory", &self.fallback_factory.is_some())
            .finish()
    }
}

/// A reactive client bound to one logical service and base URL.
pub struct ReactiveFeignClient<T: ?Sized> {
    name: String,
    url: String,
    settings: ClientSettings<T>,
}

impl<T: ?Sized> ReactiveFeignClient<T> {
    pub(crate) fn new(name: String, url: String, settings: ClientSettings<T>) -> Self {
        Self {
            name,
            url,
            settings,
        }
    }

    /// Logical client name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base URL including the path prefix.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Parse the base URL.
    pub fn parsed_url(&self) -> Result<Url> {
        Ok(Url::parse(&self.url)?)
    }

    /// Resolved settings.
    pub fn settings(&self) -> &ClientSettings<T> {
        &self.settings
    }

    /// Whether calls resolve the service name through the load balancer.
    pub fn is_load_balanced(&self) -> bool {
        self.settings.load_balancing.is_enabled()
    }

    /// Contract key of `method` on `interface`.
    pub fn method_key(&self, interface: &str, method: &str) -> String {
        self.settings.contract.method_key(interface, method)
    }

    /// Command keys for `method_key`.
    pub fn command_setter(&self, method_key: &str) -> CommandSetter {
        self.settings.command_setter_factory.create(&self.name, method_key)
    }

    /// Fallback to use after `cause`.
    ///
    /// The fallback factory wins over the fallback instance when both are set.
    pub fn fallback_for(&self, cause: &ClientError) -> Option<Arc<T>> {
        if let Some(factory) = &self.settings.fallback_factory {
            return Some(factory(cause));
        }
        self.settings.fallback.clone()
    }
}

impl<T: ?Sized> fmt::Debug for ReactiveFeignClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveFeignClient")
            .field("name", &self.name)
            .field("url", &self.url)
            .field("settings", &self.settings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FallbackFactory, ReactiveFeignBuilder};

    trait Quotes: Send + Sync {
        fn quote(&self) -> String;
    }

    struct Canned(String);

    impl Quotes for Canned {
        fn quote(&self) -> String {
            self.0.clone()
        }
    }

    #[test]
    fn test_parsed_url() {
        let client = ReactiveFeignBuilder::<dyn Quotes>::new().target("quotes", "http://quotes:8080/v1");
        let url = client.parsed_url().unwrap();
        assert_eq!(url.host_str(), Some("quotes"));
        assert_eq!(url.port(), Some(8080));
        assert_eq!(url.path(), "/v1");
    }

    #[test]
    fn test_invalid_url() {
        let client = ReactiveFeignBuilder::<dyn Quotes>::new().target("quotes", "not a url");
        assert!(matches!(client.parsed_url(), Err(ClientError::UrlParse(_))));
    }

    #[test]
    fn test_fallback_instance() {
        let canned: Arc<dyn Quotes> = Arc::new(Canned("static".into()));
        let client = ReactiveFeignBuilder::<dyn Quotes>::new()
            .fallback(canned)
            .target("quotes", "http://quotes");

        let fallback = client.fallback_for(&ClientError::Connection("down".into())).unwrap();
        assert_eq!(fallback.quote(), "static");
    }

    #[test]
    fn test_fallback_factory_wins_over_instance() {
        let canned: Arc<dyn Quotes> = Arc::new(Canned("static".into()));
        let factory: Arc<dyn FallbackFactory<dyn Quotes>> =
            Arc::new(|cause: &ClientError| -> Arc<dyn Quotes> {
                Arc::new(Canned(format!("after {}", cause.status_code().unwrap_or(0))))
            });
        let client = ReactiveFeignBuilder::<dyn Quotes>::new()
            .fallback(canned)
            .fallback_factory(factory)
            .target("quotes", "http://quotes");

        let cause = ClientError::Status {
            method_key: "Quotes#quote()".into(),
            status: 503,
            message: String::new(),
        };
        assert_eq!(client.fallback_for(&cause).unwrap().quote(), "after 503");
    }

    #[test]
    fn test_no_fallback() {
        let client = ReactiveFeignBuilder::<dyn Quotes>::new().target("quotes", "http://quotes");
        assert!(client.fallback_for(&ClientError::Decode("x".into())).is_none());
    }

    #[test]
    fn test_keys_use_contract_and_name() {
        let client = ReactiveFeignBuilder::<dyn Quotes>::new().target("quotes", "http://quotes");
        let key = client.method_key("Quotes", "quote");
        assert_eq!(key, "Quotes#quote()");
        assert_eq!(client.command_setter(&key).group_key, "quotes");
    }
}
