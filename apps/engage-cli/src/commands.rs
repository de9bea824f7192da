//! Subcommand handlers. Each returns the JSON document printed on stdout.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use engage_security::{RequestContext, RoleSet, Session};
use engagement_access::Service;
use engagement_access::domain::{Navigator, RouteKind, RouteMatch, RouteTable};
use engagement_access::infra::rest::RestBackend;
use engagement_access::infra::static_backend::StaticBackend;
use engagement_access_sdk::{Backend, EngagementId, LoadError, TenantResolution, UserQuery};
use secrecy::SecretString;
use serde::Serialize;
use serde_json::{Value, json};

use crate::config::AppConfig;

/// Who the session belongs to, from the command line.
pub struct Identity {
    pub token: Option<SecretString>,
    pub user_id: String,
    pub roles: Vec<String>,
    pub language: Option<String>,
}

pub struct Runtime {
    service: Service,
    session: Session,
    routes: RouteTable,
    navigator: Navigator,
}

impl Runtime {
    /// # Errors
    ///
    /// The REST backend cannot be built from the configuration.
    pub fn new(config: &AppConfig, mock: bool, identity: Identity) -> Result<Self> {
        let backend: Arc<dyn Backend> = if mock {
            tracing::info!("mock mode: serving the static_backend section");
            Arc::new(StaticBackend::new(config.static_backend.clone()))
        } else {
            tracing::info!(base_url = %config.backend.base_url, "using REST backend");
            Arc::new(RestBackend::new(&config.backend)?)
        };

        let session = Session::new();
        if let Some(language) = &identity.language {
            session.set_language(language);
        }
        if let Some(token) = identity.token {
            let roles: RoleSet = identity.roles.iter().map(String::as_str).collect();
            session.login(token, &identity.user_id, roles);
        } else if !identity.roles.is_empty() {
            tracing::warn!("--role ignored without --token");
        }

        Ok(Self {
            service: Service::new(backend, &config.access),
            session,
            routes: RouteTable::new()?,
            navigator: Navigator::new(),
        })
    }

    fn ctx(&self) -> RequestContext {
        self.session.context()
    }

    pub async fn resolve(&self, tenant: &str, fallback: bool) -> Result<Value> {
        let ctx = self.ctx();
        if !fallback {
            let tenant = self.service.resolve_tenant(&ctx, tenant).await?;
            self.session.set_tenant(&tenant.short_name);
            return Ok(json!({ "resolved": tenant }));
        }
        let resolution = self.service.resolve_tenant_or_fallback(&ctx, tenant).await?;
        self.session.set_tenant(&resolution.tenant().short_name);
        Ok(match resolution {
            TenantResolution::Resolved(tenant) => json!({ "resolved": tenant }),
            TenantResolution::Redirect { from, to } => {
                json!({ "redirect": { "from": from, "to": to } })
            }
        })
    }

    pub async fn languages(&self, tenant: &str) -> Result<Value> {
        let ctx = self.ctx();
        let tenant = self.service.resolve_tenant(&ctx, tenant).await?;
        let active = self
            .service
            .resolve_active_language(&ctx, &self.session, &tenant)
            .await?;
        Ok(json!({
            "tenant": tenant.short_name,
            "active": active.active,
            "enabled": active.enabled,
            "reset": active.reset,
        }))
    }

    pub async fn select_language(&self, tenant: &str, code: &str) -> Result<Value> {
        let ctx = self.ctx();
        let tenant = self.service.resolve_tenant(&ctx, tenant).await?;
        let language = self
            .service
            .select_language(&ctx, &self.session, &tenant, code)
            .await?;
        Ok(json!({ "selected": language }))
    }

    pub async fn catalog(&self) -> Result<Value> {
        let languages = self.service.language_catalog(&self.ctx()).await?;
        Ok(json!({ "languages": languages }))
    }

    pub async fn add_language(&self, tenant: &str, code: &str) -> Result<Value> {
        let ctx = self.ctx();
        let tenant = self.service.resolve_tenant(&ctx, tenant).await?;
        let change = self.service.add_tenant_language(&ctx, &tenant, code).await?;
        Ok(json!({ "tenant": tenant.short_name, "language": code, "change": format!("{change:?}") }))
    }

    pub async fn remove_language(&self, tenant: &str, code: &str) -> Result<Value> {
        let ctx = self.ctx();
        let tenant = self.service.resolve_tenant(&ctx, tenant).await?;
        let change = self.service.remove_tenant_language(&ctx, &tenant, code).await?;
        Ok(json!({ "tenant": tenant.short_name, "language": code, "change": format!("{change:?}") }))
    }

    fn authorized(&self, route: &RouteMatch) -> bool {
        route.kind.is_public() || self.service.authorize(&self.ctx(), &route.scopes()).is_ok()
    }

    /// # Errors
    ///
    /// The path matches no route.
    pub fn route(&self, path: &str, basename: Option<&str>) -> Result<Value> {
        let route = self.routes.match_path(path, basename)?;
        Ok(describe(&route, self.authorized(&route)))
    }

    /// Full navigation: tenant, then active language, then the route's
    /// permission gate, then the route's loaders.
    ///
    /// # Errors
    ///
    /// - the path matches no route or the tenant cannot be resolved
    /// - the user holds none of the route's scopes
    /// - a newer navigation superseded this one
    pub async fn load(&self, path: &str, basename: Option<&str>) -> Result<Value> {
        let route = self.routes.match_path(path, basename)?;
        let requested = route.tenant().context("route without tenant")?;

        let resolution = self
            .service
            .resolve_tenant_or_fallback(&self.ctx(), requested)
            .await?;
        let (tenant, redirected_from) = match resolution {
            TenantResolution::Resolved(tenant) => (tenant, None),
            TenantResolution::Redirect { from, to } => (to, Some(from)),
        };
        self.session.set_tenant(&tenant.short_name);

        if let Some(lang) = route.language() {
            self.session.set_language(lang);
        }
        let active = self
            .service
            .resolve_active_language(&self.ctx(), &self.session, &tenant)
            .await?;

        if !self.authorized(&route) {
            bail!("unauthorized: {path} requires one of {:?}", route.kind.required_scopes());
        }

        let ctx = self.ctx();
        let guard = self.navigator.begin();
        let loaders = self.service.loaders();
        let short_name = tenant.short_name.as_str();

        let mut page = match route.kind {
            RouteKind::TenantHome | RouteKind::LanguageHome => json!({ "tenant": tenant }),
            RouteKind::EngagementView => {
                let slug = route.slug().context("route without slug")?;
                let view = loaders.engagement_view(&ctx, &guard, short_name, slug).settle().await;
                json!({
                    "tenant": section(&view.tenant),
                    "languages": section(&view.languages),
                    "engagement": section(&view.engagement),
                    "widgets": section(&view.widgets),
                })
            }
            RouteKind::EngagementPreview => {
                let id: EngagementId = route
                    .engagement_id()
                    .context("engagement id is not a number")?;
                let view = loaders.engagement_preview(&ctx, &guard, short_name, id).settle().await;
                json!({
                    "tenant": section(&view.tenant),
                    "languages": section(&view.languages),
                    "engagement": section(&view.engagement),
                    "widgets": section(&view.widgets),
                })
            }
            RouteKind::AdminHome => {
                let home = loaders.admin_home(&ctx, &guard).settle().await;
                json!({
                    "tenants": section(&home.tenants),
                    "api_version": section(&home.api_version),
                })
            }
            RouteKind::TenantAdmin | RouteKind::LanguageAdmin => {
                let target = route.param("short_name").unwrap_or(short_name);
                let admin = loaders.tenant_admin(&ctx, &guard, target).settle().await;
                json!({
                    "tenant": section(&admin.tenant),
                    "languages": section(&admin.languages),
                    "catalog": section(&admin.catalog),
                })
            }
            RouteKind::UserAdmin => {
                let users = loaders.user_list(&ctx, &guard, &UserQuery::default());
                json!({ "users": section(&users.users.get().await) })
            }
        };

        if let Value::Object(fields) = &mut page {
            fields.insert(
                "language".to_owned(),
                json!({ "active": active.active, "reset": active.reset }),
            );
            if let Some(from) = redirected_from {
                fields.insert(
                    "redirect".to_owned(),
                    json!({ "from": from, "to": tenant.short_name }),
                );
            }
        }

        self.navigator
            .commit(&guard, page)
            .context("navigation superseded")
    }

    pub async fn reorder(&self, engagement_id: EngagementId, from: usize, to: usize) -> Result<Value> {
        let widgets = self
            .service
            .reorder_widgets(&self.ctx(), engagement_id, from, to)
            .await?;
        Ok(json!({ "widgets": widgets }))
    }

    pub async fn documents(&self, slug: &str) -> Result<Value> {
        let guard = self.navigator.begin();
        let data = self
            .service
            .loaders()
            .engagement_documents(&self.ctx(), &guard, slug);
        let tree = data.documents.get().await?;
        Ok(json!({ "documents": tree }))
    }
}

fn describe(route: &RouteMatch, allowed: bool) -> Value {
    json!({
        "route": format!("{:?}", route.kind),
        "pattern": route.kind.pattern(),
        "tenant": route.tenant(),
        "language": route.language(),
        "slug": route.slug(),
        "engagement_id": route.engagement_id(),
        "required_scopes": route.kind.required_scopes(),
        "allowed": allowed,
    })
}

fn section<T: Serialize>(result: &Result<T, LoadError>) -> Value {
    match result {
        Ok(value) => json!({ "ok": value }),
        Err(e) => json!({ "error": e.to_string() }),
    }
}
