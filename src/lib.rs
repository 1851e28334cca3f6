// Reactive Feign - declarative reactive HTTP clients
//
// This library assembles reactive clients from per-client registries and
// configuration properties, wiring contracts, options, retry policies,
// status handlers, load balancing and fallbacks onto a client builder.

// Re-export the client builder and capability types
pub use reactive_feign_client::*;

// Re-export autoconfiguration
#[cfg(feature = "cloud")]
pub use reactive_feign_cloud as cloud;

// Prelude for common imports
pub mod prelude {
    pub use reactive_feign_client::prelude::*;

    #[cfg(feature = "cloud")]
    pub use reactive_feign_cloud::{
        ApplicationContext, ClientFactory, ClientIdentity, ClientProperties, GlobalDefaults,
        NamedContexts, PropertiesLoader, ReactiveFeignClientProperties, TypeRef,
    };
}
