use std::time::Duration;

/// User-Agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("engage-http/", env!("CARGO_PKG_VERSION"));

/// Which URL schemes the client will connect to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransportSecurity {
    #[default]
    TlsOnly,
    /// Plain `http://` is accepted too. Local backends and mock servers.
    AllowInsecureHttp,
}

/// Settings of one [`crate::HttpClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Bounds the whole exchange: connect, headers and body.
    pub request_timeout: Duration,
    /// Larger response bodies fail with `BodyTooLarge`.
    pub max_body_size: usize,
    pub user_agent: String,
    pub transport: TransportSecurity,
    pub pool_idle_timeout: Option<Duration>,
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_size: 10 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            transport: TransportSecurity::TlsOnly,
            pool_idle_timeout: Some(Duration::from_secs(90)),
            pool_max_idle_per_host: 32,
        }
    }
}

impl HttpClientConfig {
    /// Short timeouts, small bodies and plain HTTP for mock servers.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            max_body_size: 1024 * 1024,
            transport: TransportSecurity::AllowInsecureHttp,
            pool_idle_timeout: Some(Duration::from_secs(10)),
            pool_max_idle_per_host: 4,
            ..Self::default()
        }
    }
}
