//! Per-route data bags.
//!
//! Every loader returns immediately with one [`Deferred`] per key. Fetches
//! that do not depend on each other are issued concurrently; a dependent
//! fetch is issued only after its parent succeeded. All of them observe the
//! navigation's cancellation token.

use std::sync::Arc;

use engage_security::RequestContext;
use engagement_access_sdk::{
    AccessError, Backend, DocumentApi, DocumentNode, Engagement, EngagementApi, EngagementId,
    Language, LoadError, MetaApi, Page, Tenant, TenantApi, User, UserApi, UserQuery, Widget,
    WidgetApi, WidgetType,
};

use super::deferred::Deferred;
use super::documents::build_document_tree;
use super::language_resolver::LanguageResolver;
use super::navigation::NavigationGuard;
use super::tenant_resolver::TenantResolver;

/// Public engagement page.
#[derive(Debug, Clone)]
pub struct EngagementViewData {
    pub tenant: Deferred<Tenant>,
    pub languages: Deferred<Vec<Language>>,
    pub engagement: Deferred<Engagement>,
    /// Chained on `engagement`.
    pub widgets: Deferred<Vec<Widget>>,
}

#[derive(Debug, Clone)]
pub struct EngagementView {
    pub tenant: Result<Tenant, LoadError>,
    pub languages: Result<Vec<Language>, LoadError>,
    pub engagement: Result<Engagement, LoadError>,
    pub widgets: Result<Vec<Widget>, LoadError>,
}

impl EngagementViewData {
    /// Wait for every key.
    pub async fn settle(&self) -> EngagementView {
        let (tenant, languages, engagement, widgets) = tokio::join!(
            self.tenant.get(),
            self.languages.get(),
            self.engagement.get(),
            self.widgets.get()
        );
        EngagementView {
            tenant,
            languages,
            engagement,
            widgets,
        }
    }
}

/// Platform admin landing page.
#[derive(Debug, Clone)]
pub struct AdminHomeData {
    pub tenants: Deferred<Vec<Tenant>>,
    pub api_version: Deferred<String>,
}

#[derive(Debug, Clone)]
pub struct AdminHome {
    pub tenants: Result<Vec<Tenant>, LoadError>,
    pub api_version: Result<String, LoadError>,
}

impl AdminHomeData {
    pub async fn settle(&self) -> AdminHome {
        let (tenants, api_version) = tokio::join!(self.tenants.get(), self.api_version.get());
        AdminHome {
            tenants,
            api_version,
        }
    }
}

/// Tenant detail screen with its language settings.
#[derive(Debug, Clone)]
pub struct TenantAdminData {
    pub tenant: Deferred<Tenant>,
    pub languages: Deferred<Vec<Language>>,
    pub catalog: Deferred<Vec<Language>>,
}

#[derive(Debug, Clone)]
pub struct TenantAdmin {
    pub tenant: Result<Tenant, LoadError>,
    pub languages: Result<Vec<Language>, LoadError>,
    pub catalog: Result<Vec<Language>, LoadError>,
}

impl TenantAdminData {
    pub async fn settle(&self) -> TenantAdmin {
        let (tenant, languages, catalog) =
            tokio::join!(self.tenant.get(), self.languages.get(), self.catalog.get());
        TenantAdmin {
            tenant,
            languages,
            catalog,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UserListData {
    pub users: Deferred<Page<User>>,
}

/// Documents widget of an engagement, as a folder tree.
#[derive(Debug, Clone)]
pub struct EngagementDocumentsData {
    pub engagement: Deferred<Engagement>,
    /// Chained on `engagement`.
    pub widgets: Deferred<Vec<Widget>>,
    /// Chained on `widgets`; empty when the engagement has no documents widget.
    pub documents: Deferred<Vec<DocumentNode>>,
}

/// Builds the data bags.
#[derive(Clone)]
pub struct RouteLoaders {
    backend: Arc<dyn Backend>,
    tenants: Arc<TenantResolver>,
    languages: Arc<LanguageResolver>,
}

impl RouteLoaders {
    #[must_use]
    pub fn new(
        backend: Arc<dyn Backend>,
        tenants: Arc<TenantResolver>,
        languages: Arc<LanguageResolver>,
    ) -> Self {
        Self {
            backend,
            tenants,
            languages,
        }
    }

    fn tenant(&self, ctx: &RequestContext, guard: &NavigationGuard, tenant: &str) -> Deferred<Tenant> {
        let (resolver, ctx, tenant) = (Arc::clone(&self.tenants), ctx.clone(), tenant.to_owned());
        Deferred::spawn(guard.token(), async move {
            resolver.resolve(&ctx, &tenant).await.map_err(AccessError::from)
        })
    }

    fn enabled_languages(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        tenant: &str,
    ) -> Deferred<Vec<Language>> {
        let (resolver, ctx, tenant) =
            (Arc::clone(&self.languages), ctx.clone(), tenant.to_owned());
        Deferred::spawn(guard.token(), async move {
            resolver
                .enabled_languages(&ctx, &tenant)
                .await
                .map_err(AccessError::from)
        })
    }

    fn engagement_by_slug(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        slug: &str,
    ) -> Deferred<Engagement> {
        let (backend, ctx, slug) = (Arc::clone(&self.backend), ctx.clone(), slug.to_owned());
        Deferred::spawn(guard.token(), async move {
            let id = backend.engagement_id_by_slug(&ctx, &slug).await?;
            backend.get_engagement(&ctx, id).await
        })
    }

    fn widgets_of(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        engagement: &Deferred<Engagement>,
    ) -> Deferred<Vec<Widget>> {
        let (backend, ctx) = (Arc::clone(&self.backend), ctx.clone());
        engagement.then(guard.token(), move |engagement| async move {
            backend.list_widgets(&ctx, engagement.id).await
        })
    }

    /// `/{tenant}/{lang}/{slug}`
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[tracing::instrument(skip_all, fields(tenant = %tenant, slug = %slug, generation = guard.generation()))]
    pub fn engagement_view(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        tenant: &str,
        slug: &str,
    ) -> EngagementViewData {
        let engagement = self.engagement_by_slug(ctx, guard, slug);
        EngagementViewData {
            tenant: self.tenant(ctx, guard, tenant),
            languages: self.enabled_languages(ctx, guard, tenant),
            widgets: self.widgets_of(ctx, guard, &engagement),
            engagement,
        }
    }

    /// `/{tenant}/engagements/{engagement_id}/view`
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn engagement_preview(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        tenant: &str,
        engagement_id: EngagementId,
    ) -> EngagementViewData {
        let (backend, task_ctx) = (Arc::clone(&self.backend), ctx.clone());
        let engagement = Deferred::spawn(guard.token(), async move {
            backend.get_engagement(&task_ctx, engagement_id).await
        });
        EngagementViewData {
            tenant: self.tenant(ctx, guard, tenant),
            languages: self.enabled_languages(ctx, guard, tenant),
            widgets: self.widgets_of(ctx, guard, &engagement),
            engagement,
        }
    }

    /// `/{tenant}/admin`
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn admin_home(&self, ctx: &RequestContext, guard: &NavigationGuard) -> AdminHomeData {
        let (backend, task_ctx) = (Arc::clone(&self.backend), ctx.clone());
        let tenants =
            Deferred::spawn(guard.token(), async move { backend.list_tenants(&task_ctx).await });

        let (backend, task_ctx) = (Arc::clone(&self.backend), ctx.clone());
        let api_version =
            Deferred::spawn(guard.token(), async move { backend.api_version(&task_ctx).await });

        AdminHomeData {
            tenants,
            api_version,
        }
    }

    /// `/{tenant}/admin/tenants/{short_name}`
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn tenant_admin(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        short_name: &str,
    ) -> TenantAdminData {
        let (resolver, task_ctx) = (Arc::clone(&self.languages), ctx.clone());
        let catalog = Deferred::spawn(guard.token(), async move {
            resolver
                .list_catalog(&task_ctx)
                .await
                .map_err(AccessError::from)
        });
        TenantAdminData {
            tenant: self.tenant(ctx, guard, short_name),
            languages: self.enabled_languages(ctx, guard, short_name),
            catalog,
        }
    }

    /// `/{tenant}/admin/users`
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn user_list(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        query: &UserQuery,
    ) -> UserListData {
        let (backend, ctx, query) = (Arc::clone(&self.backend), ctx.clone(), query.clone());
        UserListData {
            users: Deferred::spawn(guard.token(), async move {
                backend.list_users(&ctx, &query).await
            }),
        }
    }

    /// Engagement by slug, then its widgets, then the documents widget's tree.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn engagement_documents(
        &self,
        ctx: &RequestContext,
        guard: &NavigationGuard,
        slug: &str,
    ) -> EngagementDocumentsData {
        let engagement = self.engagement_by_slug(ctx, guard, slug);
        let widgets = self.widgets_of(ctx, guard, &engagement);

        let (backend, task_ctx) = (Arc::clone(&self.backend), ctx.clone());
        let documents = widgets.then(guard.token(), move |widgets| async move {
            let Some(widget) = widgets
                .iter()
                .find(|w| w.widget_type == WidgetType::Documents)
            else {
                return Ok(Vec::new());
            };
            let documents = backend.list_documents(&task_ctx, widget.id).await?;
            Ok(build_document_tree(documents))
        });

        EngagementDocumentsData {
            engagement,
            widgets,
            documents,
        }
    }
}
