//! Local (in-process) client for the engagement access module.

use std::sync::Arc;

use async_trait::async_trait;
use engage_security::{RequestContext, Session};
use engagement_access_sdk::{
    AccessClient, AccessError, ActiveLanguage, DocumentNode, EngagementId, Language,
    LanguageChange, Tenant, TenantResolution, Widget, WidgetId,
};

use super::DomainError;
use super::service::Service;

/// Local client wrapping the access service.
pub struct AccessLocalClient {
    svc: Arc<Service>,
}

impl AccessLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> AccessError {
    tracing::error!(operation = op, error = %e, "engagement-access call failed");
    e.into()
}

#[async_trait]
impl AccessClient for AccessLocalClient {
    async fn resolve_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, AccessError> {
        self.svc
            .resolve_tenant(ctx, short_name)
            .await
            .map_err(|e| log_and_convert("resolve_tenant", e))
    }

    async fn resolve_tenant_or_fallback(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<TenantResolution, AccessError> {
        self.svc
            .resolve_tenant_or_fallback(ctx, short_name)
            .await
            .map_err(|e| log_and_convert("resolve_tenant_or_fallback", e))
    }

    async fn enabled_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError> {
        self.svc
            .enabled_languages(ctx, tenant)
            .await
            .map_err(|e| log_and_convert("enabled_languages", e))
    }

    async fn resolve_active_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
    ) -> Result<ActiveLanguage, AccessError> {
        self.svc
            .resolve_active_language(ctx, session, tenant)
            .await
            .map_err(|e| log_and_convert("resolve_active_language", e))
    }

    async fn select_language(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
        code: &str,
    ) -> Result<Language, AccessError> {
        self.svc
            .select_language(ctx, session, tenant, code)
            .await
            .map_err(|e| log_and_convert("select_language", e))
    }

    async fn language_catalog(&self, ctx: &RequestContext) -> Result<Vec<Language>, AccessError> {
        self.svc
            .language_catalog(ctx)
            .await
            .map_err(|e| log_and_convert("language_catalog", e))
    }

    async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, AccessError> {
        self.svc
            .add_tenant_language(ctx, tenant, code)
            .await
            .map_err(|e| log_and_convert("add_tenant_language", e))
    }

    async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, AccessError> {
        self.svc
            .remove_tenant_language(ctx, tenant, code)
            .await
            .map_err(|e| log_and_convert("remove_tenant_language", e))
    }

    async fn reorder_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        from: usize,
        to: usize,
    ) -> Result<Vec<Widget>, AccessError> {
        self.svc
            .reorder_widgets(ctx, engagement_id, from, to)
            .await
            .map_err(|e| log_and_convert("reorder_widgets", e))
    }

    async fn document_tree(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<DocumentNode>, AccessError> {
        self.svc
            .document_tree(ctx, widget_id)
            .await
            .map_err(|e| log_and_convert("document_tree", e))
    }
}
