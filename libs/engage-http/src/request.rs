use crate::client::HttpClient;
use crate::config::TransportSecurity;
use crate::error::{HttpError, UrlRejection};
use crate::response::HttpResponse;
use bytes::Bytes;
use http::Request;
use http_body_util::Full;
use serde::Serialize;

/// One request being assembled.
///
/// Header errors are held back until [`RequestBuilder::send`]. The URL is
/// taken as given, query string included.
#[must_use = "RequestBuilder does nothing until .send() is called"]
pub struct RequestBuilder {
    client: HttpClient,
    method: http::Method,
    url: String,
    headers: Vec<(http::header::HeaderName, http::header::HeaderValue)>,
    body: Option<Bytes>,
    json: bool,
    error: Option<HttpError>,
}

impl RequestBuilder {
    pub(crate) fn new(client: HttpClient, method: http::Method, url: String) -> Self {
        Self {
            client,
            method,
            url,
            headers: Vec::new(),
            body: None,
            json: false,
            error: None,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        if self.error.is_some() {
            return self;
        }

        match (
            http::header::HeaderName::try_from(name),
            http::header::HeaderValue::try_from(value),
        ) {
            (Ok(name), Ok(value)) => self.headers.push((name, value)),
            (Err(e), _) => self.error = Some(HttpError::InvalidHeaderName(e)),
            (_, Err(e)) => self.error = Some(HttpError::InvalidHeaderValue(e)),
        }
        self
    }

    pub fn bearer_auth(self, token: &str) -> Self {
        self.header(http::header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// Serialize `body` and mark the request as JSON.
    ///
    /// # Errors
    ///
    /// `Json` if serialization fails, or a header error held back so far.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        self.body = Some(Bytes::from(serde_json::to_vec(body)?));
        self.json = true;
        Ok(self)
    }

    fn checked_uri(&self) -> Result<http::Uri, HttpError> {
        let reject = |rejection: UrlRejection| HttpError::url(&self.url, rejection);
        let uri: http::Uri = self
            .url
            .parse()
            .map_err(|_| reject(UrlRejection::Unparsable))?;
        if uri.authority().is_none() {
            return Err(reject(UrlRejection::NoHost));
        }
        match (uri.scheme_str(), self.client.config.transport) {
            (Some("https"), _) | (Some("http"), TransportSecurity::AllowInsecureHttp) => Ok(uri),
            (Some("http"), TransportSecurity::TlsOnly) => Err(reject(UrlRejection::PlainHttp)),
            (Some(_), _) => Err(reject(UrlRejection::UnsupportedScheme)),
            (None, _) => Err(reject(UrlRejection::NoScheme)),
        }
    }

    /// Any status counts as success here; the body readers check it.
    ///
    /// # Errors
    ///
    /// A header error deferred from the builder, `Url`, `Transport` or
    /// `Timeout`.
    pub async fn send(mut self) -> Result<HttpResponse, HttpError> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }

        let uri = self.checked_uri()?;
        let mut builder = Request::builder()
            .method(self.method.clone())
            .uri(uri)
            .header(http::header::USER_AGENT, self.client.user_agent.clone())
            .header(http::header::ACCEPT, "application/json");

        let has_content_type = self
            .headers
            .iter()
            .any(|(name, _)| name == http::header::CONTENT_TYPE);
        if self.json && !has_content_type {
            builder = builder.header(http::header::CONTENT_TYPE, "application/json");
        }
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }

        let request = builder.body(Full::new(self.body.unwrap_or_default()))?;

        let timeout = self.client.config.request_timeout;
        tracing::trace!(method = %self.method, url = %self.url, "sending request");

        let response = tokio::time::timeout(timeout, self.client.inner.request(request))
            .await
            .map_err(|_| HttpError::Timeout(timeout))??;

        Ok(HttpResponse {
            inner: response,
            max_body_size: self.client.config.max_body_size,
            timeout,
        })
    }
}
