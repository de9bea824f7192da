//! Public API trait for the engagement-access module.

use async_trait::async_trait;
use engage_security::{RequestContext, Session};

use crate::error::AccessError;
use crate::models::{
    ActiveLanguage, DocumentNode, EngagementId, Language, LanguageChange, Tenant,
    TenantResolution, Widget, WidgetId,
};

/// Public API of the access-resolution layer.
///
/// ```ignore
/// let tenant = client.resolve_tenant(&ctx, "gdx").await?;
/// let language = client.resolve_active_language(&ctx, &session, &tenant).await?;
/// ```
///
/// Every method logs its failure once before returning it.
#[async_trait]
pub trait AccessClient: Send + Sync {
    /// Tenant configuration for a URL short-name.
    ///
    /// # Errors
    ///
    /// - `NotFound` for an empty or unknown short-name
    /// - `BackendFailure` on transport or server errors
    async fn resolve_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, AccessError>;

    /// Like [`AccessClient::resolve_tenant`], but an unknown tenant yields a
    /// redirect onto the configured default tenant.
    ///
    /// # Errors
    ///
    /// - `NotFound` if neither tenant exists or no default is configured
    async fn resolve_tenant_or_fallback(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<TenantResolution, AccessError>;

    /// Languages enabled for a tenant. An empty short-name yields an empty list.
    ///
    /// # Errors
    ///
    /// - `BackendFailure` on transport or server errors
    async fn enabled_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError>;

    /// Enabled languages plus the session's active language, repairing the
    /// session when its language is not enabled for `tenant`.
    ///
    /// # Errors
    ///
    /// - `BackendFailure` on transport or server errors
    async fn resolve_active_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
    ) -> Result<ActiveLanguage, AccessError>;

    /// Switch the session to `code`.
    ///
    /// # Errors
    ///
    /// - `Validation` if `code` is not enabled for `tenant`
    async fn select_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
        code: &str,
    ) -> Result<Language, AccessError>;

    /// Global language catalog.
    ///
    /// # Errors
    ///
    /// - `BackendFailure` on transport or server errors
    async fn language_catalog(&self, ctx: &RequestContext) -> Result<Vec<Language>, AccessError>;

    /// Enable a language for a tenant. Idempotent.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty code
    /// - `NotFound` for an unknown language code
    async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, AccessError>;

    /// Disable a language for a tenant.
    ///
    /// # Errors
    ///
    /// - `Validation` if `code` is the tenant's default language; no backend
    ///   call is made in that case
    async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, AccessError>;

    /// Move a widget from position `from` to `to` and persist the order.
    ///
    /// # Errors
    ///
    /// - `Validation` if a position is out of range
    async fn reorder_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        from: usize,
        to: usize,
    ) -> Result<Vec<Widget>, AccessError>;

    /// Folder tree of a documents widget.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the widget does not exist
    async fn document_tree(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<DocumentNode>, AccessError>;
}
