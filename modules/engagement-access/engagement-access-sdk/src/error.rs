//! Error types for the engagement-access module.

use std::sync::Arc;
use thiserror::Error;

/// Errors surfaced by resolvers, the permission gate and backend calls.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Unknown or empty tenant, slug or id.
    #[error("{what} not found")]
    NotFound {
        /// What was looked up, e.g. `tenant 'gdx'`.
        what: String,
    },

    /// Authenticated but lacking the required scope.
    #[error("unauthorized")]
    Unauthorized,

    /// Network or server failure on a backend call.
    #[error("backend failure: {0}")]
    BackendFailure(String),

    /// The backend already holds the resource being created.
    #[error("{what} already exists")]
    Conflict { what: String },

    /// Malformed admin input, rejected before any network call.
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The navigation that issued the call was superseded.
    #[error("cancelled")]
    Cancelled,
}

impl AccessError {
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conflict(what: impl Into<String>) -> Self {
        Self::Conflict { what: what.into() }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Error stored inside a deferred loader result.
///
/// Cheap to clone so every consumer awaiting the same key sees the same
/// failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error(transparent)]
pub struct LoadError(Arc<AccessError>);

impl LoadError {
    #[must_use]
    pub fn kind(&self) -> &AccessError {
        &self.0
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(*self.0, AccessError::Cancelled)
    }
}

impl From<AccessError> for LoadError {
    fn from(err: AccessError) -> Self {
        Self(Arc::new(err))
    }
}

impl From<LoadError> for AccessError {
    fn from(err: LoadError) -> Self {
        (*err.0).clone()
    }
}
