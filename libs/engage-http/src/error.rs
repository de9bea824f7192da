use std::time::Duration;

use thiserror::Error;

/// Why a request URL was refused before anything was sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlRejection {
    Unparsable,
    /// Relative URLs have no host to connect to.
    NoHost,
    NoScheme,
    /// `http://` while the client is [`crate::TransportSecurity::TlsOnly`].
    PlainHttp,
    UnsupportedScheme,
}

#[derive(Error, Debug)]
pub enum HttpError {
    #[error("url '{url}' rejected: {rejection:?}")]
    Url { url: String, rejection: UrlRejection },

    #[error("invalid header name: {0}")]
    InvalidHeaderName(#[from] http::header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    InvalidHeaderValue(#[from] http::header::InvalidHeaderValue),

    #[error("request could not be assembled: {0}")]
    Request(#[from] http::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("tls setup failed: {0}")]
    Tls(#[from] rustls::Error),

    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// Non-2xx answer, with the start of its body for diagnostics.
    #[error("status {status}: {body_preview}")]
    Status {
        status: http::StatusCode,
        body_preview: String,
    },

    #[error("malformed json: {0}")]
    Json(#[from] serde_json::Error),
}

impl HttpError {
    /// The HTTP status, for `Status` errors only.
    #[must_use]
    pub fn status(&self) -> Option<http::StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn url(url: &str, rejection: UrlRejection) -> Self {
        Self::Url {
            url: url.to_owned(),
            rejection,
        }
    }
}

impl From<hyper::Error> for HttpError {
    fn from(err: hyper::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for HttpError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}
