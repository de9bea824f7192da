use std::time::Duration;

use async_trait::async_trait;
use engage_http::{HttpClient, HttpClientBuilder, HttpError, RequestBuilder, TransportSecurity};
use engage_security::RequestContext;
use engagement_access_sdk::{
    AccessError, Document, DocumentApi, Engagement, EngagementApi, EngagementId, Language,
    LanguageApi, MetaApi, Page, Tenant, TenantApi, TenantLanguage, TenantPatch, User, UserApi,
    UserQuery, Widget, WidgetApi, WidgetId, WidgetSortEntry,
};
use http::{Method, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use super::endpoints;
use crate::config::BackendConfig;
use crate::domain::templates::fill_template;

#[derive(Debug, thiserror::Error)]
pub enum RestSetupError {
    #[error("invalid backend base URL '{url}': {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Http(#[from] HttpError),
}

/// JSON-over-HTTP backend.
///
/// Each trait method is exactly one request. The context's token, tenant
/// and language travel as `Authorization`, `tenant-id` and
/// `accept-language` headers.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: HttpClient,
    base_url: String,
}

#[derive(serde::Deserialize)]
struct SlugResponse {
    engagement_id: EngagementId,
}

#[derive(serde::Deserialize)]
struct VersionResponse {
    version: String,
}

impl RestBackend {
    /// # Errors
    ///
    /// - `InvalidBaseUrl` if `base_url` does not parse
    /// - `Http` if the HTTP client cannot be built
    pub fn new(config: &BackendConfig) -> Result<Self, RestSetupError> {
        parse_base_url(&config.base_url)?;
        let transport = if config.allow_insecure_http {
            TransportSecurity::AllowInsecureHttp
        } else {
            TransportSecurity::TlsOnly
        };
        let mut builder = HttpClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .max_body_size(config.max_body_size)
            .transport(transport);
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Self::with_client(builder.build()?, &config.base_url)
    }

    /// # Errors
    ///
    /// `InvalidBaseUrl` if `base_url` does not parse.
    pub fn with_client(client: HttpClient, base_url: &str) -> Result<Self, RestSetupError> {
        parse_base_url(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    fn url(&self, template: &str, params: &[(&str, &str)]) -> Result<String, AccessError> {
        let path = fill_template(template, params)
            .map_err(|e| AccessError::BackendFailure(e.to_string()))?;
        Ok(format!("{}{path}", self.base_url))
    }

    fn request(&self, ctx: &RequestContext, method: Method, url: &str) -> RequestBuilder {
        tracing::debug!(%method, url, "backend request");
        let mut request = self.client.request(method, url);
        if let Some(token) = ctx.auth_token() {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(tenant) = ctx.tenant_id() {
            request = request.header(endpoints::TENANT_ID_HEADER, tenant);
        }
        if let Some(language) = ctx.language_id() {
            request = request.header(http::header::ACCEPT_LANGUAGE.as_str(), language);
        }
        request
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        ctx: &RequestContext,
        what: &str,
        url: &str,
    ) -> Result<T, AccessError> {
        let response = self
            .request(ctx, Method::GET, url)
            .send()
            .await
            .map_err(|e| map_http_error(what, &e))?;
        response.json().await.map_err(|e| map_http_error(what, &e))
    }

    async fn send_json<B, T>(
        &self,
        ctx: &RequestContext,
        method: Method,
        what: &str,
        url: &str,
        body: &B,
    ) -> Result<T, AccessError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .request(ctx, method, url)
            .json(body)
            .map_err(|e| map_http_error(what, &e))?
            .send()
            .await
            .map_err(|e| map_http_error(what, &e))?;
        response.json().await.map_err(|e| map_http_error(what, &e))
    }

    /// Request whose response body is ignored.
    async fn send_empty<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        what: &str,
        url: &str,
        body: Option<&B>,
    ) -> Result<(), AccessError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let mut request = self.request(ctx, method, url);
        if let Some(body) = body {
            request = request.json(body).map_err(|e| map_http_error(what, &e))?;
        }
        let response = request.send().await.map_err(|e| map_http_error(what, &e))?;
        response
            .checked_bytes()
            .await
            .map_err(|e| map_http_error(what, &e))?;
        Ok(())
    }
}

fn parse_base_url(base_url: &str) -> Result<Url, RestSetupError> {
    Url::parse(base_url).map_err(|source| RestSetupError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })
}

fn map_http_error(what: &str, e: &HttpError) -> AccessError {
    match e.status() {
        Some(StatusCode::NOT_FOUND) => AccessError::not_found(what),
        Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => AccessError::Unauthorized,
        Some(StatusCode::CONFLICT) => AccessError::conflict(what),
        _ => {
            tracing::debug!(what, error = %e, "backend call failed");
            AccessError::BackendFailure(format!("{what}: {e}"))
        }
    }
}

#[async_trait]
impl TenantApi for RestBackend {
    async fn get_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, AccessError> {
        let url = self.url(endpoints::TENANT, &[("short_name", short_name)])?;
        self.get_json(ctx, &format!("tenant '{short_name}'"), &url)
            .await
    }

    async fn list_tenants(&self, ctx: &RequestContext) -> Result<Vec<Tenant>, AccessError> {
        let url = self.url(endpoints::TENANTS, &[])?;
        self.get_json(ctx, "tenants", &url).await
    }

    async fn create_tenant(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
    ) -> Result<Tenant, AccessError> {
        let url = self.url(endpoints::TENANTS, &[])?;
        self.send_json(
            ctx,
            Method::POST,
            &format!("tenant '{}'", tenant.short_name),
            &url,
            tenant,
        )
        .await
    }

    async fn update_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
        patch: &TenantPatch,
    ) -> Result<Tenant, AccessError> {
        let url = self.url(endpoints::TENANT, &[("short_name", short_name)])?;
        self.send_json(
            ctx,
            Method::PATCH,
            &format!("tenant '{short_name}'"),
            &url,
            patch,
        )
        .await
    }

    async fn delete_tenant(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<(), AccessError> {
        let url = self.url(endpoints::TENANT, &[("short_name", short_name)])?;
        self.send_empty::<()>(
            ctx,
            Method::DELETE,
            &format!("tenant '{short_name}'"),
            &url,
            None,
        )
        .await
    }
}

#[async_trait]
impl LanguageApi for RestBackend {
    async fn list_languages(&self, ctx: &RequestContext) -> Result<Vec<Language>, AccessError> {
        let url = self.url(endpoints::LANGUAGES, &[])?;
        self.get_json(ctx, "languages", &url).await
    }

    async fn list_tenant_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError> {
        let url = self.url(endpoints::TENANT_LANGUAGES, &[("short_name", tenant)])?;
        self.get_json(ctx, &format!("languages of tenant '{tenant}'"), &url)
            .await
    }

    async fn add_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<TenantLanguage, AccessError> {
        let url = self.url(
            endpoints::TENANT_LANGUAGE,
            &[("short_name", tenant), ("code", language)],
        )?;
        let body = TenantLanguage {
            tenant: tenant.to_owned(),
            language: language.to_owned(),
        };
        self.send_json(
            ctx,
            Method::POST,
            &format!("language '{language}' of tenant '{tenant}'"),
            &url,
            &body,
        )
        .await
    }

    async fn remove_tenant_language(
        &self,
        ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<(), AccessError> {
        let url = self.url(
            endpoints::TENANT_LANGUAGE,
            &[("short_name", tenant), ("code", language)],
        )?;
        self.send_empty::<()>(
            ctx,
            Method::DELETE,
            &format!("language '{language}' of tenant '{tenant}'"),
            &url,
            None,
        )
        .await
    }
}

#[async_trait]
impl EngagementApi for RestBackend {
    async fn get_engagement(
        &self,
        ctx: &RequestContext,
        id: EngagementId,
    ) -> Result<Engagement, AccessError> {
        let id = id.to_string();
        let url = self.url(endpoints::ENGAGEMENT, &[("engagement_id", &id)])?;
        self.get_json(ctx, &format!("engagement {id}"), &url).await
    }

    async fn engagement_id_by_slug(
        &self,
        ctx: &RequestContext,
        slug: &str,
    ) -> Result<EngagementId, AccessError> {
        let url = self.url(endpoints::SLUG, &[("slug", slug)])?;
        let response: SlugResponse = self
            .get_json(ctx, &format!("engagement slug '{slug}'"), &url)
            .await?;
        Ok(response.engagement_id)
    }
}

#[async_trait]
impl WidgetApi for RestBackend {
    async fn list_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
    ) -> Result<Vec<Widget>, AccessError> {
        let id = engagement_id.to_string();
        let url = self.url(endpoints::WIDGETS, &[("engagement_id", &id)])?;
        self.get_json(ctx, &format!("widgets of engagement {id}"), &url)
            .await
    }

    async fn sort_widgets(
        &self,
        ctx: &RequestContext,
        engagement_id: EngagementId,
        order: &[WidgetSortEntry],
    ) -> Result<(), AccessError> {
        let id = engagement_id.to_string();
        let url = self.url(endpoints::WIDGETS_SORT, &[("engagement_id", &id)])?;
        self.send_empty(
            ctx,
            Method::PATCH,
            &format!("widgets of engagement {id}"),
            &url,
            Some(order),
        )
        .await
    }
}

#[async_trait]
impl DocumentApi for RestBackend {
    async fn list_documents(
        &self,
        ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<Document>, AccessError> {
        let id = widget_id.to_string();
        let url = self.url(endpoints::DOCUMENTS, &[("widget_id", &id)])?;
        self.get_json(ctx, &format!("documents of widget {id}"), &url)
            .await
    }
}

#[async_trait]
impl UserApi for RestBackend {
    async fn list_users(
        &self,
        ctx: &RequestContext,
        query: &UserQuery,
    ) -> Result<Page<User>, AccessError> {
        let base = self.url(endpoints::USERS, &[])?;
        let mut url = Url::parse(&base).map_err(|e| AccessError::BackendFailure(e.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.to_string())
                .append_pair("size", &query.size.to_string());
            if let Some(search) = query.search.as_deref().filter(|s| !s.is_empty()) {
                pairs.append_pair("search_text", search);
            }
        }
        self.get_json(ctx, "users", url.as_str()).await
    }

    async fn get_user(&self, ctx: &RequestContext, id: &str) -> Result<User, AccessError> {
        let url = self.url(endpoints::USER, &[("user_id", id)])?;
        self.get_json(ctx, &format!("user '{id}'"), &url).await
    }
}

#[async_trait]
impl MetaApi for RestBackend {
    async fn api_version(&self, ctx: &RequestContext) -> Result<String, AccessError> {
        let url = self.url(endpoints::VERSION, &[])?;
        let response: VersionResponse = self.get_json(ctx, "api version", &url).await?;
        Ok(response.version)
    }
}
