//! HTTP options applied to every call of a client.

use std::time::Duration;

/// Transport-level options for a reactive client.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactiveOptions {
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Time allowed to read a response.
    pub read_timeout: Duration,
    /// Time allowed to write a request body.
    pub write_timeout: Duration,
    /// Ask the server for compressed responses.
    pub try_use_compression: bool,
    /// Follow redirects.
    pub follow_redirects: bool,
    /// Maximum redirects to follow.
    pub max_redirects: usize,
    /// User agent string.
    pub user_agent: String,
    /// Default headers for all requests.
    pub default_headers: Vec<(String, String)>,
}

impl Default for ReactiveOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(60),
            try_use_compression: false,
            follow_redirects: true,
            max_redirects: 10,
            user_agent: format!("reactive-feign/{}", env!("CARGO_PKG_VERSION")),
            default_headers: Vec::new(),
        }
    }
}

impl ReactiveOptions {
    /// Create a new options builder.
    pub fn builder() -> ReactiveOptionsBuilder {
        ReactiveOptionsBuilder::default()
    }
}

/// Builder for [`ReactiveOptions`].
#[derive(Debug, Default)]
pub struct ReactiveOptionsBuilder {
    options: ReactiveOptions,
}

impl ReactiveOptionsBuilder {
    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set the read timeout.
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.options.read_timeout = timeout;
        self
    }

    /// Set the write timeout.
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.options.write_timeout = timeout;
        self
    }

    /// Enable or disable response compression.
    pub fn try_use_compression(mut self, enable: bool) -> Self {
        self.options.try_use_compression = enable;
        self
    }

    /// Enable or disable following redirects.
    pub fn follow_redirects(mut self, enable: bool) -> Self {
        self.options.follow_redirects = enable;
        self
    }

    /// Set the maximum number of redirects to follow.
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.options.max_redirects = max;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.options.user_agent = user_agent.into();
        self
    }

    /// Add a default header for all requests.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.default_headers.push((name.into(), value.into()));
        self
    }

    /// Build the options.
    pub fn build(self) -> ReactiveOptions {
        self.options
    }
}
