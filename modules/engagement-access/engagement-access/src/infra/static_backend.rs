//! In-process backend seeded from configuration.
//!
//! Serves development setups, the CLI's mock mode and tests. Mutations are
//! applied to in-memory state only.

use std::collections::BTreeMap;

use async_trait::async_trait;
use engage_security::RequestContext;
use engagement_access_sdk::{
    AccessError, Document, DocumentApi, Engagement, EngagementApi, EngagementId, Language,
    LanguageApi, MetaApi, Page, Tenant, TenantApi, TenantLanguage, TenantPatch, User, UserApi,
    UserQuery, Widget, WidgetApi, WidgetId, WidgetSortEntry,
};
use parking_lot::RwLock;

use crate::config::StaticBackendConfig;

struct State {
    tenants: BTreeMap<String, Tenant>,
    languages: Vec<Language>,
    /// Enabled language codes per tenant, in display order.
    tenant_languages: BTreeMap<String, Vec<String>>,
    engagements: Vec<Engagement>,
    widgets: Vec<Widget>,
    documents: BTreeMap<WidgetId, Vec<Document>>,
    users: Vec<User>,
    api_version: String,
}

pub struct StaticBackend {
    state: RwLock<State>,
}

impl StaticBackend {
    #[must_use]
    pub fn new(config: StaticBackendConfig) -> Self {
        let mut tenant_languages: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for mapping in config.tenant_languages {
            let codes = tenant_languages.entry(mapping.tenant).or_default();
            if !codes.contains(&mapping.language) {
                codes.push(mapping.language);
            }
        }

        let state = State {
            tenants: config
                .tenants
                .into_iter()
                .map(|t| (t.short_name.clone(), t))
                .collect(),
            languages: config.languages,
            tenant_languages,
            engagements: config.engagements,
            widgets: config.widgets,
            documents: config
                .documents
                .into_iter()
                .map(|d| (d.widget_id, d.documents))
                .collect(),
            users: config.users,
            api_version: config.api_version,
        };
        tracing::debug!(
            tenants = state.tenants.len(),
            engagements = state.engagements.len(),
            "static backend seeded"
        );
        Self {
            state: RwLock::new(state),
        }
    }
}

fn tenant_not_found(short_name: &str) -> AccessError {
    AccessError::not_found(format!("tenant '{short_name}'"))
}

#[async_trait]
impl TenantApi for StaticBackend {
    async fn get_tenant(
        &self,
        _ctx: &RequestContext,
        short_name: &str,
    ) -> Result<Tenant, AccessError> {
        self.state
            .read()
            .tenants
            .get(short_name)
            .cloned()
            .ok_or_else(|| tenant_not_found(short_name))
    }

    async fn list_tenants(&self, _ctx: &RequestContext) -> Result<Vec<Tenant>, AccessError> {
        Ok(self.state.read().tenants.values().cloned().collect())
    }

    async fn create_tenant(
        &self,
        _ctx: &RequestContext,
        tenant: &Tenant,
    ) -> Result<Tenant, AccessError> {
        let mut state = self.state.write();
        if state.tenants.contains_key(&tenant.short_name) {
            return Err(AccessError::conflict(format!(
                "tenant '{}'",
                tenant.short_name
            )));
        }
        state
            .tenants
            .insert(tenant.short_name.clone(), tenant.clone());
        Ok(tenant.clone())
    }

    async fn update_tenant(
        &self,
        _ctx: &RequestContext,
        short_name: &str,
        patch: &TenantPatch,
    ) -> Result<Tenant, AccessError> {
        let mut state = self.state.write();
        let tenant = state
            .tenants
            .get_mut(short_name)
            .ok_or_else(|| tenant_not_found(short_name))?;
        tenant.apply(patch.clone());
        Ok(tenant.clone())
    }

    async fn delete_tenant(
        &self,
        _ctx: &RequestContext,
        short_name: &str,
    ) -> Result<(), AccessError> {
        let mut state = self.state.write();
        state
            .tenants
            .remove(short_name)
            .ok_or_else(|| tenant_not_found(short_name))?;
        state.tenant_languages.remove(short_name);
        Ok(())
    }
}

#[async_trait]
impl LanguageApi for StaticBackend {
    async fn list_languages(&self, _ctx: &RequestContext) -> Result<Vec<Language>, AccessError> {
        Ok(self.state.read().languages.clone())
    }

    async fn list_tenant_languages(
        &self,
        _ctx: &RequestContext,
        tenant: &str,
    ) -> Result<Vec<Language>, AccessError> {
        let state = self.state.read();
        if !state.tenants.contains_key(tenant) {
            return Err(tenant_not_found(tenant));
        }
        let codes = state.tenant_languages.get(tenant);
        Ok(codes
            .into_iter()
            .flatten()
            .filter_map(|code| state.languages.iter().find(|l| &l.code == code).cloned())
            .collect())
    }

    async fn add_tenant_language(
        &self,
        _ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<TenantLanguage, AccessError> {
        let mut state = self.state.write();
        if !state.tenants.contains_key(tenant) {
            return Err(tenant_not_found(tenant));
        }
        if !state.languages.iter().any(|l| l.code == language) {
            return Err(AccessError::not_found(format!("language '{language}'")));
        }
        let codes = state.tenant_languages.entry(tenant.to_owned()).or_default();
        if codes.iter().any(|c| c == language) {
            return Err(AccessError::conflict(format!(
                "language '{language}' of tenant '{tenant}'"
            )));
        }
        codes.push(language.to_owned());
        Ok(TenantLanguage {
            tenant: tenant.to_owned(),
            language: language.to_owned(),
        })
    }

    async fn remove_tenant_language(
        &self,
        _ctx: &RequestContext,
        tenant: &str,
        language: &str,
    ) -> Result<(), AccessError> {
        let mut state = self.state.write();
        if !state.tenants.contains_key(tenant) {
            return Err(tenant_not_found(tenant));
        }
        let codes = state.tenant_languages.entry(tenant.to_owned()).or_default();
        let before = codes.len();
        codes.retain(|c| c != language);
        if codes.len() == before {
            return Err(AccessError::not_found(format!(
                "language '{language}' of tenant '{tenant}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl EngagementApi for StaticBackend {
    async fn get_engagement(
        &self,
        _ctx: &RequestContext,
        id: EngagementId,
    ) -> Result<Engagement, AccessError> {
        self.state
            .read()
            .engagements
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or_else(|| AccessError::not_found(format!("engagement {id}")))
    }

    async fn engagement_id_by_slug(
        &self,
        _ctx: &RequestContext,
        slug: &str,
    ) -> Result<EngagementId, AccessError> {
        self.state
            .read()
            .engagements
            .iter()
            .find(|e| e.slug == slug)
            .map(|e| e.id)
            .ok_or_else(|| AccessError::not_found(format!("engagement slug '{slug}'")))
    }
}

#[async_trait]
impl WidgetApi for StaticBackend {
    async fn list_widgets(
        &self,
        _ctx: &RequestContext,
        engagement_id: EngagementId,
    ) -> Result<Vec<Widget>, AccessError> {
        let state = self.state.read();
        if !state.engagements.iter().any(|e| e.id == engagement_id) {
            return Err(AccessError::not_found(format!("engagement {engagement_id}")));
        }
        let mut widgets: Vec<Widget> = state
            .widgets
            .iter()
            .filter(|w| w.engagement_id == engagement_id)
            .cloned()
            .collect();
        widgets.sort_by_key(|w| (w.sort_index, w.id));
        Ok(widgets)
    }

    async fn sort_widgets(
        &self,
        _ctx: &RequestContext,
        engagement_id: EngagementId,
        order: &[WidgetSortEntry],
    ) -> Result<(), AccessError> {
        let mut state = self.state.write();
        if !state.engagements.iter().any(|e| e.id == engagement_id) {
            return Err(AccessError::not_found(format!("engagement {engagement_id}")));
        }
        for entry in order {
            if let Some(widget) = state
                .widgets
                .iter_mut()
                .find(|w| w.id == entry.id && w.engagement_id == engagement_id)
            {
                widget.sort_index = entry.sort_index;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentApi for StaticBackend {
    async fn list_documents(
        &self,
        _ctx: &RequestContext,
        widget_id: WidgetId,
    ) -> Result<Vec<Document>, AccessError> {
        let state = self.state.read();
        if !state.widgets.iter().any(|w| w.id == widget_id) {
            return Err(AccessError::not_found(format!("widget {widget_id}")));
        }
        Ok(state.documents.get(&widget_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl UserApi for StaticBackend {
    async fn list_users(
        &self,
        _ctx: &RequestContext,
        query: &UserQuery,
    ) -> Result<Page<User>, AccessError> {
        let state = self.state.read();
        let needle = query
            .search
            .as_deref()
            .map(str::to_lowercase)
            .filter(|s| !s.is_empty());
        let matching: Vec<&User> = state
            .users
            .iter()
            .filter(|u| {
                needle.as_deref().is_none_or(|n| {
                    u.full_name().to_lowercase().contains(n)
                        || u.email.as_deref().is_some_and(|e| e.to_lowercase().contains(n))
                })
            })
            .collect();

        let size = usize::try_from(query.size.max(1)).unwrap_or(usize::MAX);
        let page = usize::try_from(query.page.max(1)).unwrap_or(usize::MAX);
        let skip = (page - 1).saturating_mul(size);
        Ok(Page {
            total: u64::try_from(matching.len()).unwrap_or(u64::MAX),
            items: matching.into_iter().skip(skip).take(size).cloned().collect(),
        })
    }

    async fn get_user(&self, _ctx: &RequestContext, id: &str) -> Result<User, AccessError> {
        self.state
            .read()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| AccessError::not_found(format!("user '{id}'")))
    }
}

#[async_trait]
impl MetaApi for StaticBackend {
    async fn api_version(&self, _ctx: &RequestContext) -> Result<String, AccessError> {
        Ok(self.state.read().api_version.clone())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use engagement_access_sdk::UserStatus;

    fn user(id: &str, first: &str) -> User {
        User {
            id: id.to_owned(),
            first_name: first.to_owned(),
            last_name: "Tester".to_owned(),
            email: Some(format!("{id}@example.com")),
            roles: vec![],
            status: UserStatus::Active,
        }
    }

    fn backend() -> StaticBackend {
        StaticBackend::new(StaticBackendConfig {
            tenants: vec![Tenant {
                short_name: "gdx".to_owned(),
                title: "GDX".to_owned(),
                description: None,
                logo_url: None,
                contact_name: None,
                contact_email: None,
                basename: None,
                default_language: "en".to_owned(),
            }],
            languages: vec![
                Language {
                    code: "en".to_owned(),
                    name: "English".to_owned(),
                    right_to_left: false,
                },
                Language {
                    code: "fr".to_owned(),
                    name: "French".to_owned(),
                    right_to_left: false,
                },
            ],
            tenant_languages: vec![TenantLanguage {
                tenant: "gdx".to_owned(),
                language: "en".to_owned(),
            }],
            users: vec![user("u1", "Ada"), user("u2", "Grace"), user("u3", "Alan")],
            ..StaticBackendConfig::default()
        })
    }

    #[tokio::test]
    async fn duplicate_language_mapping_conflicts() {
        let backend = backend();
        let ctx = RequestContext::anonymous();

        backend.add_tenant_language(&ctx, "gdx", "fr").await.unwrap();
        let err = backend
            .add_tenant_language(&ctx, "gdx", "fr")
            .await
            .unwrap_err();
        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn unknown_language_is_not_found() {
        let backend = backend();
        let err = backend
            .add_tenant_language(&RequestContext::anonymous(), "gdx", "xx")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn users_are_paged_and_searched() {
        let backend = backend();
        let ctx = RequestContext::anonymous();

        let page = backend
            .list_users(&ctx, &UserQuery { page: 2, size: 2, search: None })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 1);

        let found = backend
            .list_users(
                &ctx,
                &UserQuery {
                    search: Some("GRACE".to_owned()),
                    ..UserQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].id, "u2");
    }
}
