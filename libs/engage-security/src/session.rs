//! Browser-session scoped state shared by resolvers.
//!
//! The session holds exactly three keys (`tenantId`, `languageId`,
//! `authToken`) plus the identity established at login. Writes are
//! last-write-wins; the store is meant for a single user in a single tab.

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::constants::{SESSION_AUTH_TOKEN_KEY, SESSION_LANGUAGE_KEY, SESSION_TENANT_KEY};
use crate::context::RequestContext;
use crate::role::RoleSet;

/// Persisted session keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKey {
    TenantId,
    LanguageId,
    AuthToken,
}

impl SessionKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TenantId => SESSION_TENANT_KEY,
            Self::LanguageId => SESSION_LANGUAGE_KEY,
            Self::AuthToken => SESSION_AUTH_TOKEN_KEY,
        }
    }

    #[must_use]
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            SESSION_TENANT_KEY => Some(Self::TenantId),
            SESSION_LANGUAGE_KEY => Some(Self::LanguageId),
            SESSION_AUTH_TOKEN_KEY => Some(Self::AuthToken),
            _ => None,
        }
    }
}

#[derive(Default)]
struct SessionState {
    tenant_id: Option<String>,
    language_id: Option<String>,
    auth_token: Option<SecretString>,
    user_id: Option<String>,
    roles: RoleSet,
}

/// Session store with an explicit login/logout lifecycle.
#[derive(Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tenant(&self, tenant_id: &str) {
        self.state.write().tenant_id = Some(tenant_id.to_owned()).filter(|t| !t.is_empty());
    }

    pub fn set_language(&self, language_id: &str) {
        self.state.write().language_id = Some(language_id.to_owned()).filter(|l| !l.is_empty());
    }

    pub fn clear_language(&self) {
        self.state.write().language_id = None;
    }

    #[must_use]
    pub fn tenant_id(&self) -> Option<String> {
        self.state.read().tenant_id.clone()
    }

    #[must_use]
    pub fn language_id(&self) -> Option<String> {
        self.state.read().language_id.clone()
    }

    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.state.read().auth_token.is_some()
    }

    /// Raw string value of a session key, as a storage backend would hold it.
    #[must_use]
    pub fn get(&self, key: SessionKey) -> Option<String> {
        let state = self.state.read();
        match key {
            SessionKey::TenantId => state.tenant_id.clone(),
            SessionKey::LanguageId => state.language_id.clone(),
            SessionKey::AuthToken => state
                .auth_token
                .as_ref()
                .map(|t| t.expose_secret().to_owned()),
        }
    }

    /// Establish the authenticated identity.
    pub fn login(&self, token: SecretString, user_id: &str, roles: RoleSet) {
        let mut state = self.state.write();
        state.auth_token = Some(token);
        state.user_id = Some(user_id.to_owned());
        state.roles = roles;
        tracing::debug!(user_id, "session login");
    }

    /// Drop the identity. Tenant and language survive: they are browsing state.
    pub fn logout(&self) {
        let mut state = self.state.write();
        state.auth_token = None;
        state.roles = RoleSet::new();
        if let Some(user_id) = state.user_id.take() {
            tracing::debug!(user_id = %user_id, "session logout");
        }
    }

    /// End of the browsing session: every key is removed.
    pub fn clear(&self) {
        *self.state.write() = SessionState::default();
    }

    /// Snapshot the session into a context for one request.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        let state = self.state.read();
        let mut builder = RequestContext::builder().roles(state.roles.clone());
        if let Some(tenant_id) = &state.tenant_id {
            builder = builder.tenant_id(tenant_id);
        }
        if let Some(language_id) = &state.language_id {
            builder = builder.language_id(language_id);
        }
        if let Some(token) = &state.auth_token {
            builder = builder.auth_token(SecretString::from(token.expose_secret()));
        }
        if let Some(user_id) = &state.user_id {
            builder = builder.user_id(user_id);
        }
        builder.build()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Session")
            .field("tenant_id", &state.tenant_id)
            .field("language_id", &state.language_id)
            .field("logged_in", &state.auth_token.is_some())
            .field("user_id", &state.user_id)
            .field("roles", &state.roles)
            .finish()
    }
}
