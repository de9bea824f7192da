use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use http::HeaderValue;
use http_body_util::Full;
use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::{TokioExecutor, TokioTimer};
use rustls::crypto::CryptoProvider;

use crate::client::{HttpClient, HyperClient};
use crate::config::{HttpClientConfig, TransportSecurity};
use crate::error::HttpError;

/// Fluent construction of an [`HttpClient`].
#[derive(Debug, Default)]
pub struct HttpClientBuilder {
    config: HttpClientConfig,
}

impl HttpClientBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: HttpClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    #[must_use]
    pub fn max_body_size(mut self, size: usize) -> Self {
        self.config.max_body_size = size;
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: TransportSecurity) -> Self {
        self.config.transport = transport;
        self
    }

    /// # Errors
    ///
    /// - `Tls` if the webpki root store cannot be set up
    /// - `InvalidHeaderValue` for a user agent that is not a valid header
    pub fn build(self) -> Result<HttpClient, HttpError> {
        let user_agent = HeaderValue::try_from(self.config.user_agent.as_str())?;
        let connector = connector(self.config.transport)?;

        let mut pool = Client::builder(TokioExecutor::new());
        // Idle eviction only runs with a timer.
        pool.pool_timer(TokioTimer::new())
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .pool_idle_timeout(self.config.pool_idle_timeout);
        let inner: HyperClient = pool.build::<_, Full<Bytes>>(connector);

        if self.config.transport == TransportSecurity::AllowInsecureHttp {
            tracing::warn!("HTTP client accepts plain http:// URLs");
        }
        Ok(HttpClient {
            inner,
            user_agent,
            config: Arc::new(self.config),
        })
    }
}

/// Process-wide provider when one is installed, aws-lc-rs otherwise.
fn crypto_provider() -> Arc<CryptoProvider> {
    CryptoProvider::get_default()
        .cloned()
        .unwrap_or_else(|| Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
}

fn connector(transport: TransportSecurity) -> Result<HttpsConnector<HttpConnector>, HttpError> {
    let roots = HttpsConnectorBuilder::new().with_provider_and_webpki_roots(crypto_provider())?;
    Ok(match transport {
        TransportSecurity::TlsOnly => roots.https_only().enable_all_versions().build(),
        TransportSecurity::AllowInsecureHttp => roots.https_or_http().enable_all_versions().build(),
    })
}
