//! Eagerly started fetches awaited independently per key.

use std::future::Future;

use engagement_access_sdk::{AccessError, LoadError};
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use tokio_util::sync::CancellationToken;

/// Cloneable handle to a fetch that is already running.
///
/// A failure is stored in the handle instead of being raised by the loader,
/// so one failing section never takes down the rest of the page.
#[derive(Clone)]
pub struct Deferred<T: Clone> {
    inner: Shared<BoxFuture<'static, Result<T, LoadError>>>,
}

impl<T> Deferred<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start `fetch` on the runtime now.
    ///
    /// The token is checked before the fetch is issued and raced while it
    /// is in flight; either way a cancelled navigation yields `Cancelled`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn spawn<F>(token: &CancellationToken, fetch: F) -> Self
    where
        F: Future<Output = Result<T, AccessError>> + Send + 'static,
    {
        let token = token.clone();
        let task = tokio::spawn(async move {
            if token.is_cancelled() {
                return Err(LoadError::from(AccessError::Cancelled));
            }
            tokio::select! {
                biased;
                () = token.cancelled() => Err(LoadError::from(AccessError::Cancelled)),
                result = fetch => result.map_err(LoadError::from),
            }
        });

        let inner = async move {
            match task.await {
                Ok(result) => result,
                Err(e) => Err(LoadError::from(AccessError::BackendFailure(format!(
                    "loader task failed: {e}"
                )))),
            }
        }
        .boxed()
        .shared();

        Self { inner }
    }

    /// Already-resolved value.
    pub fn ready(value: T) -> Self {
        Self {
            inner: futures::future::ready(Ok(value)).boxed().shared(),
        }
    }

    /// Already-failed fetch.
    pub fn failed(error: AccessError) -> Self {
        Self {
            inner: futures::future::ready(Err(LoadError::from(error)))
                .boxed()
                .shared(),
        }
    }

    /// Start a dependent fetch that is issued only after `self` succeeds.
    ///
    /// A parent failure becomes the child's failure without calling `next`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn then<U, F, Fut>(&self, token: &CancellationToken, next: F) -> Deferred<U>
    where
        U: Clone + Send + Sync + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, AccessError>> + Send + 'static,
    {
        let parent = self.clone();
        Deferred::spawn(token, async move {
            let value = parent.get().await.map_err(AccessError::from)?;
            next(value).await
        })
    }

    /// Wait for the result. Every clone observes the same outcome.
    ///
    /// # Errors
    ///
    /// The stored fetch failure.
    pub async fn get(&self) -> Result<T, LoadError> {
        self.inner.clone().await
    }

    /// The result if the fetch already settled.
    #[must_use]
    pub fn peek(&self) -> Option<&Result<T, LoadError>> {
        self.inner.peek()
    }
}

impl<T: Clone> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.inner.peek() {
            None => "pending",
            Some(Ok(_)) => "ready",
            Some(Err(_)) => "failed",
        };
        f.debug_struct("Deferred").field("state", &state).finish()
    }
}
