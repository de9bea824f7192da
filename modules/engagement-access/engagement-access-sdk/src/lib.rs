//! Engagement Access SDK
//!
//! This crate provides the public API for the `engagement-access` module:
//!
//! - [`AccessClient`] - Public API trait for consumers
//! - [`Backend`] and its parts - one trait method per backend REST call
//! - [`Tenant`], [`Language`], [`Engagement`], [`Widget`], ... - Domain models
//! - [`AccessError`], [`LoadError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use engagement_access_sdk::AccessClient;
//!
//! let tenant = client.resolve_tenant(&ctx, "gdx").await?;
//! let active = client.resolve_active_language(&ctx, &session, &tenant).await?;
//! ```

pub mod api;
pub mod backend;
pub mod error;
pub mod models;

pub use api::AccessClient;
pub use backend::{
    Backend, DocumentApi, EngagementApi, LanguageApi, MetaApi, TenantApi, UserApi, WidgetApi,
};
pub use error::{AccessError, LoadError};
pub use models::{
    ActiveLanguage, Document, DocumentKind, DocumentNode, Engagement, EngagementId,
    EngagementStatus, Language, LanguageChange, Page, Tenant, TenantLanguage, TenantPatch,
    TenantResolution, User, UserQuery, UserStatus, Widget, WidgetId, WidgetSortEntry, WidgetType,
};
