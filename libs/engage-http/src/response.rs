use std::time::Duration;

use bytes::Bytes;
use http::{Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use serde::de::DeserializeOwned;

use crate::error::HttpError;

/// At most this much of a failed response's body is kept in the error.
const ERROR_PREVIEW_BYTES: usize = 8 * 1024;

/// Received response whose body has not been read yet.
///
/// Every body read is bounded by the client's size limit and timeout.
#[derive(Debug)]
pub struct HttpResponse {
    pub(crate) inner: Response<Incoming>,
    pub(crate) max_body_size: usize,
    pub(crate) timeout: Duration,
}

impl HttpResponse {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Body regardless of status.
    ///
    /// # Errors
    ///
    /// `BodyTooLarge`, `Timeout` or `Transport` while reading.
    pub async fn bytes(self) -> Result<Bytes, HttpError> {
        collect(self.inner, self.max_body_size, self.timeout).await
    }

    /// Body of a 2xx response.
    ///
    /// # Errors
    ///
    /// `Status` carrying a body preview for any other status, otherwise the
    /// errors of [`HttpResponse::bytes`].
    pub async fn checked_bytes(self) -> Result<Bytes, HttpError> {
        let status = self.inner.status();
        if status.is_success() {
            return self.bytes().await;
        }

        let limit = self.max_body_size.min(ERROR_PREVIEW_BYTES);
        let body_preview = match collect(self.inner, limit, self.timeout).await {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(HttpError::BodyTooLarge { .. }) => format!("<more than {limit} bytes>"),
            Err(e) => return Err(e),
        };
        Err(HttpError::Status {
            status,
            body_preview,
        })
    }

    /// Decode a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// The errors of [`HttpResponse::checked_bytes`], or `Json`.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, HttpError> {
        let body = self.checked_bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

async fn collect(
    response: Response<Incoming>,
    limit: usize,
    timeout: Duration,
) -> Result<Bytes, HttpError> {
    let mut body = response.into_body();
    let read = async move {
        let mut buf = Vec::new();
        while let Some(frame) = body.frame().await {
            if let Some(chunk) = frame?.data_ref() {
                if buf.len() + chunk.len() > limit {
                    return Err(HttpError::BodyTooLarge { limit });
                }
                buf.extend_from_slice(chunk);
            }
        }
        Ok(Bytes::from(buf))
    };

    tokio::time::timeout(timeout, read)
        .await
        .map_err(|_| HttpError::Timeout(timeout))?
}
