//! Configuration for the engagement access module.

use engagement_access_sdk::{
    Document, Engagement, Language, Tenant, TenantLanguage, User, Widget, WidgetId,
};
use serde::{Deserialize, Serialize};

/// Resolution policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessConfig {
    /// Tenant to redirect to when the requested one does not exist.
    pub default_tenant: Option<String>,

    /// Grant gated content to holders of the team-member role regardless
    /// of the required scopes.
    pub team_member_override: bool,
}

/// Connection settings for the backend REST API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to.
    pub base_url: String,

    /// Per-request timeout, body included.
    pub timeout_secs: u64,

    /// Permit plain `http://` base URLs. Local development only.
    pub allow_insecure_http: bool,

    /// Overrides the HTTP client's default User-Agent.
    pub user_agent: Option<String>,

    /// Maximum accepted response body size in bytes.
    pub max_body_size: usize,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:5000/api".to_owned(),
            timeout_secs: 30,
            allow_insecure_http: false,
            user_agent: None,
            max_body_size: 10 * 1024 * 1024,
        }
    }
}

/// Seed data for the in-process backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticBackendConfig {
    pub tenants: Vec<Tenant>,

    /// Global language catalog.
    pub languages: Vec<Language>,

    /// Enabled languages per tenant, in display order.
    pub tenant_languages: Vec<TenantLanguage>,

    pub engagements: Vec<Engagement>,
    pub widgets: Vec<Widget>,
    pub documents: Vec<WidgetDocuments>,
    pub users: Vec<User>,

    /// Reported by the version endpoint.
    pub api_version: String,
}

impl Default for StaticBackendConfig {
    fn default() -> Self {
        Self {
            tenants: Vec::new(),
            languages: Vec::new(),
            tenant_languages: Vec::new(),
            engagements: Vec::new(),
            widgets: Vec::new(),
            documents: Vec::new(),
            users: Vec::new(),
            api_version: "static".to_owned(),
        }
    }
}

/// Flat document list attached to one documents widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WidgetDocuments {
    pub widget_id: WidgetId,
    #[serde(default)]
    pub documents: Vec<Document>,
}
