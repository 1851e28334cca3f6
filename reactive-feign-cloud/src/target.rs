// Client identity and target URL assembly

use crate::{CloudError, Result, TypeRef};

/// Declaration of one logical client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientIdentity {
    /// Logical service name; also the client's registry key.
    pub name: String,
    /// Fixed URL; when absent the client is load balanced by name.
    pub explicit_url: Option<String>,
    /// Path prefix of every call.
    pub path: String,
    /// Decode 404 responses instead of failing.
    pub decode404: bool,
    /// Fallback bean declared for the client.
    pub fallback: Option<TypeRef>,
    /// Fallback factory bean declared for the client.
    pub fallback_factory: Option<TypeRef>,
}

impl ClientIdentity {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.explicit_url = Some(url.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn with_decode404(mut self, decode404: bool) -> Self {
        self.decode404 = decode404;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<TypeRef>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_fallback_factory(mut self, factory: impl Into<TypeRef>) -> Self {
        self.fallback_factory = Some(factory.into());
        self
    }

    /// Explicit URL, treating a blank one as absent.
    pub fn url(&self) -> Option<&str> {
        self.explicit_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Clients without an explicit URL are load balanced.
    pub fn is_load_balanced(&self) -> bool {
        self.url().is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(CloudError::Config("Name must be set".to_string()));
        }
        Ok(())
    }
}

/// Derives the base URL of a client.
pub struct TargetUrlBuilder;

impl TargetUrlBuilder {
    /// Base URL plus normalized path.
    ///
    /// Without an explicit URL the name is used as host. Either base gets an
    /// `http://` scheme unless it already starts with `http`.
    pub fn build_url(identity: &ClientIdentity) -> String {
        let base = identity.url().unwrap_or(&identity.name);
        let mut url = if base.starts_with("http") {
            base.to_string()
        } else {
            format!("http://{base}")
        };
        url.push_str(&Self::clean_path(&identity.path));
        url
    }

    /// Trimmed path with one leading slash and without one trailing slash.
    pub fn clean_path(path: &str) -> String {
        let path = path.trim();
        if path.is_empty() {
            return String::new();
        }

        let mut cleaned = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        if cleaned.ends_with('/') {
            cleaned.pop();
        }
        cleaned
    }
}
