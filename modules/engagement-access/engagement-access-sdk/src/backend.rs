//! Backend API traits.
//!
//! Each method maps to exactly one REST call of the backend. Implementations
//! receive the caller's [`RequestContext`] explicitly and surface every
//! failure as an [`AccessError`].

use async_trait::async_trait;
use engage_security::RequestContext;

use crate::error::AccessError;
use crate::models::{
    Document, Engagement, EngagementId, Language, Page, Tenant, TenantLanguage, TenantPatch,
    User, UserQuery, Widget, WidgetId, WidgetSortEntry,
};

#[async_trait]
pub trait TenantApi: Send + Sync {
    /// # Errors
    /// `NotFound` if no tenant has this short-name.
    async fn get_tenant(&self, ctx: &RequestContext, short_name: &str)
    -> Result<Tenant, AccessError>;

    /// # Errors
    /// `BackendFailure` on transport or server errors.
    async fn list_tenants(&self, ctx: &RequestContext) -> Result<Vec<Tenant>, AccessError>;

    /// # Errors
    /// `Validation` if the short-name is taken.
    async fn create_tenant(&self, ctx: &RequestContext, tenant: &Tenant)
    -> Result<Tenant, AccessError>;

    /// # Errors
    /// `NotFound` if no tenant has this short-name.
    async fn update_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
        patch: &TenantPatch,
    ) -> Result<Tenant, AccessError>;

    /// # Errors
    /// `NotFound` if no tenant has this short-name.
    async fn delete_tenant(&self, ctx: &RequestContext, short_name: &str)
    -> Result<(), AccessError>;
}

#[async_trait]
pub trait LanguageApi: Send + Sync {
    /// Global language catalog.
    ///
    /// # Errors
    /// `BackendFailure` on transport or server errors.
    async fn list_languages(&self, ctx: &RequestContext) -> Result<Vec<Language>, AccessError>;

    /// Languages enabled for a tenant, in backend order.
    ///
    /// # Errors
    /// `NotFound` if the tenant does not exist.
    async fn list_tenant_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError>;

    /// # Errors
    /// `NotFound` for an unknown tenant or language code.
    async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<TenantLanguage, AccessError>;

    /// # Errors
    /// `NotFound` if the mapping does not exist.
    async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<(), AccessError>;
}

#[async_trait]
pub trait EngagementApi: Send + Sync {
    /// # Errors
    /// `NotFound` if no engagement has this id.
    async fn get_engagement(
        &self,
        ctx: &RequestContext,
        id: EngagementId,
    ) -> Result<Engagement, AccessError>;

    /// Resolve a public slug to its engagement id.
    ///
    /// # Errors
    /// `NotFound` if the slug is unknown.
    async fn engagement_id_by_slug(
        &self,
        ctx: &RequestContext,
        slug: &str,
    ) -> Result<EngagementId, AccessError>;
}

#[async_trait]
pub trait WidgetApi: Send + Sync {
    /// # Errors
    /// `NotFound` if the engagement does not exist.
    async fn list_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
    ) -> Result<Vec<Widget>, AccessError>;

    /// Persist a new widget order.
    ///
    /// # Errors
    /// `NotFound` if the engagement does not exist.
    async fn sort_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        order: &[WidgetSortEntry],
    ) -> Result<(), AccessError>;
}

#[async_trait]
pub trait DocumentApi: Send + Sync {
    /// Flat document list of a documents widget.
    ///
    /// # Errors
    /// `NotFound` if the widget does not exist.
    async fn list_documents(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<Document>, AccessError>;
}

#[async_trait]
pub trait UserApi: Send + Sync {
    /// # Errors
    /// `Unauthorized` if the caller may not list users.
    async fn list_users(&self, ctx: &RequestContext, query: &UserQuery)
    -> Result<Page<User>, AccessError>;

    /// # Errors
    /// `NotFound` if no user has this id.
    async fn get_user(&self, ctx: &RequestContext, id: &str) -> Result<User, AccessError>;
}

#[async_trait]
pub trait MetaApi: Send + Sync {
    /// Version string reported by the backend.
    ///
    /// # Errors
    /// `BackendFailure` on transport or server errors.
    async fn api_version(&self, ctx: &RequestContext) -> Result<String, AccessError>;
}

/// The whole backend surface used by resolvers and loaders.
pub trait Backend:
    TenantApi + LanguageApi + EngagementApi + WidgetApi + DocumentApi + UserApi + MetaApi
{
}

impl<T> Backend for T where
    T: TenantApi + LanguageApi + EngagementApi + WidgetApi + DocumentApi + UserApi + MetaApi
{
}
