//! Public models for the engagement-access module.
//!
//! These mirror the JSON bodies of the backend REST API and are shared by
//! the resolvers, the loaders and every backend implementation.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Engagement identifier as issued by the backend.
pub type EngagementId = i64;

/// Widget identifier as issued by the backend.
pub type WidgetId = i64;

/// Tenant configuration: branding, languages and URL prefix.
///
/// `short_name` is the tenant's identity and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub short_name: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    /// URL prefix the tenant's pages are served under.
    #[serde(default)]
    pub basename: Option<String>,
    /// Language code used when the session has no valid selection.
    pub default_language: String,
}

/// Fields accepted when creating or updating a tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
}

impl Tenant {
    /// Apply a partial update. The short-name is not patchable.
    pub fn apply(&mut self, patch: TenantPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.logo_url.is_some() {
            self.logo_url = patch.logo_url;
        }
        if patch.contact_name.is_some() {
            self.contact_name = patch.contact_name;
        }
        if patch.contact_email.is_some() {
            self.contact_email = patch.contact_email;
        }
        if patch.basename.is_some() {
            self.basename = patch.basename;
        }
        if let Some(default_language) = patch.default_language {
            self.default_language = default_language;
        }
    }
}

/// Entry of the global language catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub right_to_left: bool,
}

/// Association enabling a language for a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantLanguage {
    pub tenant: String,
    pub language: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    #[default]
    Active,
    Deactivated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Opaque role strings, compared literally against scopes.
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub status: UserStatus,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_owned()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementStatus {
    #[default]
    Draft,
    Scheduled,
    Published,
    Closed,
    Unpublished,
}

/// A public consultation campaign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub id: EngagementId,
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: EngagementStatus,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
}

impl Engagement {
    /// Published and `now` falls inside the scheduled window.
    ///
    /// A missing bound leaves that side of the window open.
    #[must_use]
    pub fn is_open(&self, now: OffsetDateTime) -> bool {
        if self.status != EngagementStatus::Published {
            return false;
        }
        let started = self.start_date.is_none_or(|start| start <= now);
        let not_ended = self.end_date.is_none_or(|end| now <= end);
        started && not_ended
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetType {
    WhoIsListening,
    Documents,
    Subscribe,
    Events,
    Map,
    Video,
    Timeline,
    Poll,
    Image,
}

/// A content block attached to an engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: WidgetId,
    pub engagement_id: EngagementId,
    pub widget_type: WidgetType,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sort_index: u32,
}

/// New position of one widget, sent when persisting a reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSortEntry {
    pub id: WidgetId,
    pub sort_index: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Folder,
    File,
}

/// Flat document record as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub title: String,
    pub kind: DocumentKind,
    #[serde(default)]
    pub url: Option<String>,
}

/// Document with its children, as rendered in the folder tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentNode {
    pub document: Document,
    pub children: Vec<DocumentNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

/// Query for a page of users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserQuery {
    pub page: u32,
    pub size: u32,
    #[serde(default)]
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: 10,
            search: None,
        }
    }
}

/// Outcome of resolving a tenant from a URL segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantResolution {
    Resolved(Tenant),
    /// The requested tenant is unknown; the caller should redirect.
    Redirect { from: String, to: Tenant },
}

impl TenantResolution {
    #[must_use]
    pub fn tenant(&self) -> &Tenant {
        match self {
            Self::Resolved(tenant) | Self::Redirect { to: tenant, .. } => tenant,
        }
    }
}

/// Active language after enforcing membership in the tenant's enabled set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveLanguage {
    /// `None` only when the tenant has no enabled language at all.
    pub active: Option<Language>,
    pub enabled: Vec<Language>,
    /// The session held a language that is not enabled and was reset.
    pub reset: bool,
}

impl ActiveLanguage {
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        self.active.as_ref().map(|l| l.code.as_str())
    }
}

/// What an add/remove of a tenant language actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageChange {
    Added,
    Removed,
    /// The mapping was already in the requested state.
    Unchanged,
}
