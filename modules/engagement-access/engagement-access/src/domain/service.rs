use std::sync::Arc;

use engage_security::{RequestContext, Scope, Session};
use engagement_access_sdk::{
    ActiveLanguage, Backend, DocumentApi, DocumentNode, EngagementId, Language, LanguageChange,
    Tenant, TenantResolution, Widget, WidgetApi, WidgetId,
};
use tracing::info;

use super::documents::build_document_tree;
use super::error::DomainError;
use super::language_resolver::LanguageResolver;
use super::loaders::RouteLoaders;
use super::permission_gate::{GatePolicy, require};
use super::tenant_resolver::TenantResolver;
use super::widgets::{reorder, sort_entries};
use crate::config::AccessConfig;

/// Engagement access service.
///
/// Composes the resolvers over one backend and applies the configured gate
/// policy.
pub struct Service {
    backend: Arc<dyn Backend>,
    tenants: Arc<TenantResolver>,
    languages: Arc<LanguageResolver>,
    policy: GatePolicy,
}

impl Service {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, config: &AccessConfig) -> Self {
        Self {
            tenants: Arc::new(TenantResolver::new(
                Arc::clone(&backend),
                config.default_tenant.clone(),
            )),
            languages: Arc::new(LanguageResolver::new(Arc::clone(&backend))),
            policy: GatePolicy {
                allow_team_member_override: config.team_member_override,
            },
            backend,
        }
    }

    #[must_use]
    pub fn policy(&self) -> GatePolicy {
        self.policy
    }

    #[must_use]
    pub fn loaders(&self) -> RouteLoaders {
        RouteLoaders::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.tenants),
            Arc::clone(&self.languages),
        )
    }

    /// # Errors
    ///
    /// See [`TenantResolver::resolve`].
    pub async fn resolve_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, DomainError> {
        self.tenants.resolve(ctx, short_name).await
    }

    /// # Errors
    ///
    /// See [`TenantResolver::resolve_or_fallback`].
    pub async fn resolve_tenant_or_fallback(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<TenantResolution, DomainError> {
        self.tenants.resolve_or_fallback(ctx, short_name).await
    }

    /// # Errors
    ///
    /// Backend failures.
    pub async fn enabled_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, DomainError> {
        self.languages.enabled_languages(ctx, tenant).await
    }

    /// # Errors
    ///
    /// Backend failures.
    pub async fn resolve_active_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
    ) -> Result<ActiveLanguage, DomainError> {
        self.languages.resolve_active(ctx, session, tenant).await
    }

    /// # Errors
    ///
    /// `LanguageNotEnabled` if `code` is not enabled for `tenant`.
    pub async fn select_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
        code: &str,
    ) -> Result<Language, DomainError> {
        self.languages.select(ctx, session, tenant, code).await
    }

    /// # Errors
    ///
    /// Backend failures.
    pub async fn language_catalog(
        &self,
        ctx: &RequestContext,
    ) -> Result<Vec<Language>, DomainError> {
        self.languages.list_catalog(ctx).await
    }

    /// # Errors
    ///
    /// See [`LanguageResolver::add_language`].
    pub async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, DomainError> {
        self.languages.add_language(ctx, tenant, code).await
    }

    /// # Errors
    ///
    /// See [`LanguageResolver::remove_language`].
    pub async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, DomainError> {
        self.languages.remove_language(ctx, tenant, code).await
    }

    /// Route-level guard under the configured policy.
    ///
    /// # Errors
    ///
    /// `MissingScope` if no required scope is held.
    pub fn authorize(&self, ctx: &RequestContext, scopes: &[Scope]) -> Result<(), DomainError> {
        require(ctx, scopes, self.policy)
    }

    /// Move one widget and persist the new order.
    ///
    /// # Errors
    ///
    /// - `PositionOutOfRange` before the order is persisted
    /// - `Backend` for fetch or persist failures
    #[tracing::instrument(skip_all, fields(engagement_id = engagement_id, from = from, to = to))]
    pub async fn reorder_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        from: usize,
        to: usize,
    ) -> Result<Vec<Widget>, DomainError> {
        let widgets = self.backend.list_widgets(ctx, engagement_id).await?;
        let reordered = reorder(&widgets, from, to)?;
        self.backend
            .sort_widgets(ctx, engagement_id, &sort_entries(&reordered))
            .await?;
        info!("widget order saved");
        Ok(reordered)
    }

    /// # Errors
    ///
    /// Backend failures.
    pub async fn document_tree(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<DocumentNode>, DomainError> {
        let documents = self.backend.list_documents(ctx, widget_id).await?;
        Ok(build_document_tree(documents))
    }
}
