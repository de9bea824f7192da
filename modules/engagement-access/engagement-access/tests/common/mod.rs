#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use engage_security::RequestContext;
use engagement_access::StaticBackendConfig;
use engagement_access::infra::static_backend::StaticBackend;
use engagement_access_sdk::{
    AccessError, Document, DocumentApi, Engagement, EngagementApi, EngagementId,
    EngagementStatus, Language, LanguageApi, MetaApi, Page, Tenant, TenantApi, TenantLanguage,
    TenantPatch, User, UserApi, UserQuery, Widget, WidgetApi, WidgetId, WidgetSortEntry,
    WidgetType,
};
use parking_lot::Mutex;
use tokio::sync::Notify;

pub fn language(code: &str, name: &str) -> Language {
    Language {
        code: code.to_owned(),
        name: name.to_owned(),
        right_to_left: false,
    }
}

pub fn tenant(short_name: &str, default_language: &str) -> Tenant {
    Tenant {
        short_name: short_name.to_owned(),
        title: short_name.to_uppercase(),
        description: None,
        logo_url: None,
        contact_name: None,
        contact_email: None,
        basename: None,
        default_language: default_language.to_owned(),
    }
}

pub fn engagement(id: EngagementId, slug: &str) -> Engagement {
    Engagement {
        id,
        slug: slug.to_owned(),
        name: format!("Engagement {id}"),
        description: None,
        status: EngagementStatus::Published,
        start_date: None,
        end_date: None,
    }
}

pub fn widget(id: WidgetId, engagement_id: EngagementId, widget_type: WidgetType) -> Widget {
    Widget {
        id,
        engagement_id,
        widget_type,
        title: format!("widget {id}"),
        sort_index: u32::try_from(id).unwrap(),
    }
}

/// `gdx` with {en, fr}; engagement 42 at `test-engagement` with two widgets.
pub fn seed() -> StaticBackendConfig {
    StaticBackendConfig {
        tenants: vec![tenant("gdx", "en")],
        languages: vec![
            language("en", "English"),
            language("fr", "French"),
            language("de", "German"),
        ],
        tenant_languages: vec![
            TenantLanguage {
                tenant: "gdx".to_owned(),
                language: "en".to_owned(),
            },
            TenantLanguage {
                tenant: "gdx".to_owned(),
                language: "fr".to_owned(),
            },
        ],
        engagements: vec![engagement(42, "test-engagement")],
        widgets: vec![
            widget(1, 42, WidgetType::Map),
            widget(2, 42, WidgetType::Subscribe),
        ],
        api_version: "1.2.3".to_owned(),
        ..StaticBackendConfig::default()
    }
}

/// Static backend that records every call and can hold or fail some of them.
pub struct RecordingBackend {
    inner: StaticBackend,
    calls: Mutex<Vec<String>>,
    /// `get_engagement` waits for a permit before answering.
    pub engagement_gate: Option<Arc<Notify>>,
    /// Signalled when `get_engagement` has been entered.
    pub engagement_entered: Arc<Notify>,
    pub fail_widgets: bool,
    pub fail_tenants: bool,
}

impl RecordingBackend {
    pub fn new(config: StaticBackendConfig) -> Self {
        Self {
            inner: StaticBackend::new(config),
            calls: Mutex::new(Vec::new()),
            engagement_gate: None,
            engagement_entered: Arc::new(Notify::new()),
            fail_widgets: false,
            fail_tenants: false,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.lock().iter().any(|c| c.starts_with(prefix))
    }

    pub fn position(&self, call: &str) -> Option<usize> {
        self.calls.lock().iter().position(|c| c == call)
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl TenantApi for RecordingBackend {
    async fn get_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, AccessError> {
        self.record(format!("get_tenant:{short_name}"));
        self.inner.get_tenant(ctx, short_name).await
    }

    async fn list_tenants(&self, ctx: &RequestContext) -> Result<Vec<Tenant>, AccessError> {
        self.record("list_tenants".to_owned());
        if self.fail_tenants {
            return Err(AccessError::BackendFailure("tenants: HTTP 500".to_owned()));
        }
        self.inner.list_tenants(ctx).await
    }

    async fn create_tenant(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
    ) -> Result<Tenant, AccessError> {
        self.record(format!("create_tenant:{}", tenant.short_name));
        self.inner.create_tenant(ctx, tenant).await
    }

    async fn update_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
        patch: &TenantPatch,
    ) -> Result<Tenant, AccessError> {
        self.record(format!("update_tenant:{short_name}"));
        self.inner.update_tenant(ctx, short_name, patch).await
    }

    async fn delete_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<(), AccessError> {
        self.record(format!("delete_tenant:{short_name}"));
        self.inner.delete_tenant(ctx, short_name).await
    }
}

#[async_trait]
impl LanguageApi for RecordingBackend {
    async fn list_languages(&self, ctx: &RequestContext) -> Result<Vec<Language>, AccessError> {
        self.record("list_languages".to_owned());
        self.inner.list_languages(ctx).await
    }

    async fn list_tenant_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError> {
        self.record(format!("list_tenant_languages:{tenant}"));
        self.inner.list_tenant_languages(ctx, tenant).await
    }

    async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<TenantLanguage, AccessError> {
        self.record(format!("add_tenant_language:{tenant}:{language}"));
        self.inner.add_tenant_language(ctx, tenant, language).await
    }

    async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<(), AccessError> {
        self.record(format!("remove_tenant_language:{tenant}:{language}"));
        self.inner.remove_tenant_language(ctx, tenant, language).await
    }
}

#[async_trait]
impl EngagementApi for RecordingBackend {
    async fn get_engagement(
        &self,
        ctx: &RequestContext,
        id: EngagementId,
    ) -> Result<Engagement, AccessError> {
        self.record(format!("get_engagement:{id}"));
        self.engagement_entered.notify_one();
        if let Some(gate) = &self.engagement_gate {
            gate.notified().await;
        }
        let result = self.inner.get_engagement(ctx, id).await;
        self.record(format!("get_engagement_done:{id}"));
        result
    }

    async fn engagement_id_by_slug(
        &self,
        ctx: &RequestContext,
        slug: &str,
    ) -> Result<EngagementId, AccessError> {
        self.record(format!("engagement_id_by_slug:{slug}"));
        self.inner.engagement_id_by_slug(ctx, slug).await
    }
}

#[async_trait]
impl WidgetApi for RecordingBackend {
    async fn list_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
    ) -> Result<Vec<Widget>, AccessError> {
        self.record(format!("list_widgets:{engagement_id}"));
        if self.fail_widgets {
            return Err(AccessError::BackendFailure(
                "widgets of engagement 42: HTTP 502".to_owned(),
            ));
        }
        self.inner.list_widgets(ctx, engagement_id).await
    }

    async fn sort_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        order: &[WidgetSortEntry],
    ) -> Result<(), AccessError> {
        self.record(format!("sort_widgets:{engagement_id}"));
        self.inner.sort_widgets(ctx, engagement_id, order).await
    }
}

#[async_trait]
impl DocumentApi for RecordingBackend {
    async fn list_documents(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<Document>, AccessError> {
        self.record(format!("list_documents:{widget_id}"));
        self.inner.list_documents(ctx, widget_id).await
    }
}

#[async_trait]
impl UserApi for RecordingBackend {
    async fn list_users(
        &self,
        ctx: &RequestContext,
        query: &UserQuery,
    ) -> Result<Page<User>, AccessError> {
        self.record("list_users".to_owned());
        self.inner.list_users(ctx, query).await
    }

    async fn get_user(&self, ctx: &RequestContext, id: &str) -> Result<User, AccessError> {
        self.record(format!("get_user:{id}"));
        self.inner.get_user(ctx, id).await
    }
}

#[async_trait]
impl MetaApi for RecordingBackend {
    async fn api_version(&self, ctx: &RequestContext) -> Result<String, AccessError> {
        self.record("api_version".to_owned());
        self.inner.api_version(ctx).await
    }
}
