//! # Reactive Feign Cloud
//!
//! Autoconfiguration of reactive Feign clients from registries and
//! configuration properties.
//!
//! A client is configured from up to three override layers:
//!
//! - the **context layer**: beans registered for the client (or shared by all
//!   clients) in [`NamedContexts`]
//! - the **default property block**: `feign.client.config.<default-config>`
//! - the **client property block**: `feign.client.config.<client name>`
//!
//! With `default-to-properties = true` (the default) the context layer is
//! applied first and the property blocks override it; otherwise the property
//! blocks are applied first and the context layer has the final say.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use reactive_feign_client::Contract;
//! use reactive_feign_cloud::*;
//!
//! #[derive(Debug)]
//! struct Strict;
//!
//! impl Contract for Strict {
//!     fn name(&self) -> &str {
//!         "strict"
//!     }
//! }
//!
//! trait Orders: Send + Sync {}
//!
//! let properties = PropertiesLoader::new(FileFormat::Toml)
//!     .parse(
//!         r#"
//!         [feign.client.config.orders]
//!         contract = "strict"
//!         decode404 = true
//!         "#,
//!     )
//!     .unwrap();
//!
//! let application = Arc::new(ApplicationContext::new());
//! application.register_constructor::<dyn Contract, _>("strict", || Arc::new(Strict));
//!
//! let factory = ClientFactory::new(application, Arc::new(NamedContexts::new()))
//!     .with_properties(properties);
//!
//! let client = factory
//!     .build::<dyn Orders>(&ClientIdentity::new("orders").with_path("/v1/"))
//!     .unwrap();
//!
//! assert_eq!(client.url(), "http://orders/v1");
//! assert_eq!(client.settings().contract.name(), "strict");
//! assert!(client.settings().decode404);
//! assert!(client.is_load_balanced());
//! ```

pub mod application;
pub mod error;
pub mod factory;
pub mod layer;
pub mod merger;
pub mod named;
pub mod properties;
pub mod resolver;
pub mod target;
pub mod type_ref;

pub use application::{ApplicationContext, Constructor};
pub use error::{CloudError, Result};
pub use factory::{BuilderDefaults, ClientFactory};
pub use layer::{ClientConfigOverride, ConfigLayer, LayerSource};
pub use merger::{ConfigurationMerger, ResolvedClientConfig};
pub use named::NamedContexts;
pub use properties::{
    ClientProperties, FileFormat, GlobalDefaults, PROPERTIES_PREFIX, PropertiesLoader,
    ReactiveFeignClientProperties,
};
pub use resolver::{Resolution, Resolver};
pub use target::{ClientIdentity, TargetUrlBuilder};
pub use type_ref::{Component, TypeRef};
