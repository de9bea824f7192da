//! Tenant short-name to tenant configuration.

use std::sync::Arc;

use engage_security::RequestContext;
use engagement_access_sdk::{Backend, Tenant, TenantApi, TenantResolution};
use tracing::info;

use super::error::DomainError;

/// Fetches tenant configuration for the short-name found in a URL.
///
/// Nothing is cached; every navigation re-fetches.
pub struct TenantResolver {
    backend: Arc<dyn Backend>,
    default_tenant: Option<String>,
}

impl TenantResolver {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, default_tenant: Option<String>) -> Self {
        Self {
            backend,
            default_tenant: default_tenant.filter(|t| !t.trim().is_empty()),
        }
    }

    /// # Errors
    ///
    /// - `EmptyTenant` for a blank short-name, without a backend call
    /// - `TenantNotFound` when the backend reports no match
    /// - `Backend` for any other backend failure
    #[tracing::instrument(skip_all, fields(tenant = %short_name))]
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, DomainError> {
        let short_name = short_name.trim();
        if short_name.is_empty() {
            return Err(DomainError::EmptyTenant);
        }

        match self.backend.get_tenant(ctx, short_name).await {
            Ok(tenant) => Ok(tenant),
            Err(e) if e.is_not_found() => Err(DomainError::TenantNotFound(short_name.to_owned())),
            Err(e) => Err(e.into()),
        }
    }

    /// Resolve, redirecting unknown tenants onto the configured default.
    ///
    /// # Errors
    ///
    /// - `NoFallbackTenant` if the tenant is unknown and no usable default exists
    /// - `Backend` for any other backend failure
    pub async fn resolve_or_fallback(
        &self,
        ctx: &RequestContext,
        short_name: &str,
    ) -> Result<TenantResolution, DomainError> {
        match self.resolve(ctx, short_name).await {
            Ok(tenant) => Ok(TenantResolution::Resolved(tenant)),
            Err(DomainError::EmptyTenant | DomainError::TenantNotFound(_)) => {
                let requested = short_name.trim().to_owned();
                let Some(default) = self
                    .default_tenant
                    .as_deref()
                    .filter(|default| *default != requested)
                else {
                    return Err(DomainError::NoFallbackTenant { requested });
                };

                let to = match self.resolve(ctx, default).await {
                    Ok(tenant) => tenant,
                    Err(DomainError::TenantNotFound(_)) => {
                        return Err(DomainError::NoFallbackTenant { requested });
                    }
                    Err(e) => return Err(e),
                };
                info!(from = %requested, to = %to.short_name, "unknown tenant, redirecting to default");
                Ok(TenantResolution::Redirect {
                    from: requested,
                    to,
                })
            }
            Err(e) => Err(e),
        }
    }
}
