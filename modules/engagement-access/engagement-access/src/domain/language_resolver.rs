//! Enabled languages per tenant and the session's active language.

use std::sync::Arc;

use engage_security::{RequestContext, Session};
use engagement_access_sdk::{
    ActiveLanguage, Backend, Language, LanguageApi, LanguageChange, Tenant,
};
use tracing::{debug, info};

use super::error::DomainError;

pub struct LanguageResolver {
    backend: Arc<dyn Backend>,
}

impl LanguageResolver {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Languages enabled for `tenant`, in backend order.
    ///
    /// A blank short-name means "no tenant" and yields an empty list without
    /// a backend call.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn enabled_languages(
        &self,
        ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, DomainError> {
        let tenant = tenant.trim();
        if tenant.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.backend.list_tenant_languages(ctx, tenant).await?)
    }

    /// Fetch the enabled set and make the session's language a member of it.
    ///
    /// A missing or stale session language is replaced by the tenant default,
    /// or by the first enabled language when the default itself is not
    /// enabled. With no enabled language at all the session language is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Backend failures. The session is left untouched in that case.
    #[tracing::instrument(skip_all, fields(tenant = %tenant.short_name))]
    pub async fn resolve_active(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
    ) -> Result<ActiveLanguage, DomainError> {
        let enabled = self.enabled_languages(ctx, &tenant.short_name).await?;
        let current = session.language_id();

        if let Some(code) = current.as_deref()
            && let Some(language) = find(&enabled, code)
        {
            return Ok(ActiveLanguage {
                active: Some(language.clone()),
                enabled,
                reset: false,
            });
        }

        let active = find(&enabled, &tenant.default_language)
            .or_else(|| enabled.first())
            .cloned();
        match &active {
            Some(language) => session.set_language(&language.code),
            None => session.clear_language(),
        }

        let reset = current.is_some();
        if reset {
            info!(
                stale = current.as_deref().unwrap_or_default(),
                active = active.as_ref().map_or("", |l| l.code.as_str()),
                "session language not enabled for tenant, reset"
            );
        }

        Ok(ActiveLanguage {
            active,
            enabled,
            reset,
        })
    }

    /// Switch the session to `code`.
    ///
    /// # Errors
    ///
    /// `LanguageNotEnabled` if `code` is not enabled for `tenant`.
    pub async fn select(
        &self,
        ctx: &RequestContext,
        session: &Session,
        tenant: &Tenant,
        code: &str,
    ) -> Result<Language, DomainError> {
        let enabled = self.enabled_languages(ctx, &tenant.short_name).await?;
        let language = find(&enabled, code.trim())
            .cloned()
            .ok_or_else(|| DomainError::LanguageNotEnabled {
                tenant: tenant.short_name.clone(),
                code: code.to_owned(),
            })?;
        session.set_language(&language.code);
        Ok(language)
    }

    /// Global language catalog.
    ///
    /// # Errors
    ///
    /// Backend failures.
    pub async fn list_catalog(&self, ctx: &RequestContext) -> Result<Vec<Language>, DomainError> {
        Ok(self.backend.list_languages(ctx).await?)
    }

    /// Enable `code` for `tenant`.
    ///
    /// Re-adding an enabled language is a no-op, including when the backend
    /// answers with a conflict.
    ///
    /// # Errors
    ///
    /// - `EmptyLanguageCode` before any backend call
    /// - `Backend` for an unknown language or other failures
    #[tracing::instrument(skip_all, fields(tenant = %tenant.short_name, language = %code))]
    pub async fn add_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, DomainError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::EmptyLanguageCode);
        }

        let enabled = self.enabled_languages(ctx, &tenant.short_name).await?;
        if find(&enabled, code).is_some() {
            debug!("language already enabled");
            return Ok(LanguageChange::Unchanged);
        }

        match self
            .backend
            .add_tenant_language(ctx, &tenant.short_name, code)
            .await
        {
            Ok(_) => {
                info!("language enabled");
                Ok(LanguageChange::Added)
            }
            Err(e) if e.is_conflict() => {
                debug!("backend reports mapping exists");
                Ok(LanguageChange::Unchanged)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Disable `code` for `tenant`.
    ///
    /// # Errors
    ///
    /// - `DefaultLanguageRemoval` when `code` is the tenant default; checked
    ///   before any backend call
    /// - `EmptyLanguageCode` before any backend call
    /// - `Backend` for other failures
    #[tracing::instrument(skip_all, fields(tenant = %tenant.short_name, language = %code))]
    pub async fn remove_language(
        &self,
        ctx: &RequestContext,
        tenant: &Tenant,
        code: &str,
    ) -> Result<LanguageChange, DomainError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(DomainError::EmptyLanguageCode);
        }
        if code == tenant.default_language {
            return Err(DomainError::DefaultLanguageRemoval {
                tenant: tenant.short_name.clone(),
                code: code.to_owned(),
            });
        }

        let enabled = self.enabled_languages(ctx, &tenant.short_name).await?;
        if find(&enabled, code).is_none() {
            debug!("language not enabled");
            return Ok(LanguageChange::Unchanged);
        }

        match self
            .backend
            .remove_tenant_language(ctx, &tenant.short_name, code)
            .await
        {
            Ok(()) => {
                info!("language disabled");
                Ok(LanguageChange::Removed)
            }
            Err(e) if e.is_not_found() => Ok(LanguageChange::Unchanged),
            Err(e) => Err(e.into()),
        }
    }
}

fn find<'a>(languages: &'a [Language], code: &str) -> Option<&'a Language> {
    languages.iter().find(|l| l.code == code)
}
