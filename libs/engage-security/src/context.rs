use secrecy::{ExposeSecret, SecretString};

use crate::role::RoleSet;

/// `RequestContext` carries who is asking, for which tenant and in which
/// language. It is passed explicitly to every resolver and backend call.
#[derive(Debug)]
pub struct RequestContext {
    tenant_id: Option<String>,
    language_id: Option<String>,
    auth_token: Option<SecretString>,
    user_id: Option<String>,
    roles: RoleSet,
}

impl Clone for RequestContext {
    fn clone(&self) -> Self {
        Self {
            tenant_id: self.tenant_id.clone(),
            language_id: self.language_id.clone(),
            auth_token: self
                .auth_token
                .as_ref()
                .map(|t| SecretString::from(t.expose_secret())),
            user_id: self.user_id.clone(),
            roles: self.roles.clone(),
        }
    }
}

impl RequestContext {
    /// Create a new `RequestContext` builder
    #[must_use]
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Context with no tenant, language, token or roles
    #[must_use]
    pub fn anonymous() -> Self {
        RequestContextBuilder::default().build()
    }

    /// Tenant short-name the request is scoped to
    #[must_use]
    pub fn tenant_id(&self) -> Option<&str> {
        self.tenant_id.as_deref()
    }

    /// Active language code
    #[must_use]
    pub fn language_id(&self) -> Option<&str> {
        self.language_id.as_deref()
    }

    #[must_use]
    pub fn auth_token(&self) -> Option<&SecretString> {
        self.auth_token.as_ref()
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    #[must_use]
    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.auth_token.is_some()
    }

    /// Same context re-targeted at another tenant.
    #[must_use]
    pub fn with_tenant(&self, tenant_id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.tenant_id = Some(tenant_id.to_owned());
        ctx
    }

    /// Same context with another active language.
    #[must_use]
    pub fn with_language(&self, language_id: &str) -> Self {
        let mut ctx = self.clone();
        ctx.language_id = Some(language_id.to_owned());
        ctx
    }
}

#[derive(Default)]
pub struct RequestContextBuilder {
    tenant_id: Option<String>,
    language_id: Option<String>,
    auth_token: Option<SecretString>,
    user_id: Option<String>,
    roles: RoleSet,
}

impl RequestContextBuilder {
    #[must_use]
    pub fn tenant_id(mut self, tenant_id: &str) -> Self {
        self.tenant_id = Some(tenant_id.to_owned());
        self
    }

    #[must_use]
    pub fn language_id(mut self, language_id: &str) -> Self {
        self.language_id = Some(language_id.to_owned());
        self
    }

    #[must_use]
    pub fn auth_token(mut self, token: SecretString) -> Self {
        self.auth_token = Some(token);
        self
    }

    #[must_use]
    pub fn user_id(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_owned());
        self
    }

    #[must_use]
    pub fn add_role(mut self, role: &str) -> Self {
        self.roles.insert(role);
        self
    }

    #[must_use]
    pub fn roles(mut self, roles: RoleSet) -> Self {
        self.roles = roles;
        self
    }

    #[must_use]
    pub fn build(self) -> RequestContext {
        RequestContext {
            tenant_id: self.tenant_id.filter(|t| !t.is_empty()),
            language_id: self.language_id.filter(|l| !l.is_empty()),
            auth_token: self.auth_token,
            user_id: self.user_id,
            roles: self.roles,
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn builder_full() {
        let ctx = RequestContext::builder()
            .tenant_id("gdx")
            .language_id("fr")
            .auth_token(SecretString::from("t0ken"))
            .user_id("u-1")
            .add_role("ADMIN")
            .build();

        assert_eq!(ctx.tenant_id(), Some("gdx"));
        assert_eq!(ctx.language_id(), Some("fr"));
        assert_eq!(ctx.user_id(), Some("u-1"));
        assert!(ctx.is_authenticated());
        assert!(ctx.roles().contains("ADMIN"));
        assert_eq!(
            ctx.auth_token().map(|t| t.expose_secret()),
            Some("t0ken")
        );
    }

    #[test]
    fn anonymous_is_empty() {
        let ctx = RequestContext::anonymous();
        assert!(ctx.tenant_id().is_none());
        assert!(ctx.language_id().is_none());
        assert!(!ctx.is_authenticated());
        assert!(ctx.roles().is_empty());
    }

    #[test]
    fn empty_tenant_is_treated_as_none() {
        let ctx = RequestContext::builder().tenant_id("").build();
        assert!(ctx.tenant_id().is_none());
    }

    #[test]
    fn debug_does_not_leak_token() {
        let ctx = RequestContext::builder()
            .auth_token(SecretString::from("super-secret"))
            .build();
        let printed = format!("{ctx:?}");
        assert!(!printed.contains("super-secret"));
    }

    #[test]
    fn clone_keeps_token() {
        let ctx = RequestContext::builder()
            .auth_token(SecretString::from("abc"))
            .build();
        let copy = ctx.with_tenant("other");
        assert_eq!(copy.tenant_id(), Some("other"));
        assert_eq!(
            copy.auth_token().map(|t| t.expose_secret()),
            Some("abc")
        );
    }
}
