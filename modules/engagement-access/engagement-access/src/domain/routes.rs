//! URL route table.
//!
//! Path segments carry the tenant short-name, the language code and entity
//! slugs or ids. Each route names the scopes it requires; public routes
//! require none and skip the permission gate.

use std::collections::BTreeMap;

use engage_security::Scope;
use engage_security::constants::SUPER_ADMIN_ROLE;
use engagement_access_sdk::EngagementId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route pattern: {0}")]
    Insert(#[from] matchit::InsertError),

    #[error("no route matches '{0}'")]
    NoMatch(String),

    #[error("path '{path}' is outside basename '{basename}'")]
    OutsideBasename { path: String, basename: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    TenantHome,
    LanguageHome,
    EngagementView,
    EngagementPreview,
    AdminHome,
    TenantAdmin,
    UserAdmin,
    LanguageAdmin,
}

impl RouteKind {
    pub const ALL: [Self; 8] = [
        Self::TenantHome,
        Self::LanguageHome,
        Self::EngagementView,
        Self::EngagementPreview,
        Self::AdminHome,
        Self::TenantAdmin,
        Self::UserAdmin,
        Self::LanguageAdmin,
    ];

    #[must_use]
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::TenantHome => "/{tenant}",
            Self::LanguageHome => "/{tenant}/{lang}",
            Self::EngagementView => "/{tenant}/{lang}/{slug}",
            Self::EngagementPreview => "/{tenant}/engagements/{engagement_id}/view",
            Self::AdminHome => "/{tenant}/admin",
            Self::TenantAdmin => "/{tenant}/admin/tenants/{short_name}",
            Self::UserAdmin => "/{tenant}/admin/users",
            Self::LanguageAdmin => "/{tenant}/admin/languages",
        }
    }

    /// Scopes of which the user must hold at least one.
    #[must_use]
    pub const fn required_scopes(self) -> &'static [&'static str] {
        match self {
            Self::TenantHome | Self::LanguageHome | Self::EngagementView => &[],
            Self::EngagementPreview => &[SUPER_ADMIN_ROLE, "view_engagement", "create_engagement"],
            Self::AdminHome | Self::TenantAdmin => &[SUPER_ADMIN_ROLE, "view_tenants"],
            Self::UserAdmin => &[SUPER_ADMIN_ROLE, "view_users"],
            Self::LanguageAdmin => &[SUPER_ADMIN_ROLE, "view_languages"],
        }
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        self.required_scopes().is_empty()
    }
}

/// A matched path with its decoded parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub kind: RouteKind,
    params: BTreeMap<String, String>,
}

impl RouteMatch {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn tenant(&self) -> Option<&str> {
        self.param("tenant")
    }

    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.param("lang")
    }

    #[must_use]
    pub fn slug(&self) -> Option<&str> {
        self.param("slug")
    }

    /// `None` if absent or not an integer.
    #[must_use]
    pub fn engagement_id(&self) -> Option<EngagementId> {
        self.param("engagement_id")?.parse().ok()
    }

    #[must_use]
    pub fn scopes(&self) -> Vec<Scope> {
        self.kind
            .required_scopes()
            .iter()
            .copied()
            .map(Scope::from)
            .collect()
    }
}

pub struct RouteTable {
    router: matchit::Router<RouteKind>,
}

impl RouteTable {
    /// # Errors
    ///
    /// `Insert` if two patterns conflict.
    pub fn new() -> Result<Self, RouteError> {
        let mut router = matchit::Router::new();
        for kind in RouteKind::ALL {
            router.insert(kind.pattern(), kind)?;
        }
        Ok(Self { router })
    }

    /// Match `path` after removing the tenant's `basename` prefix.
    ///
    /// Query string and fragment are ignored; a trailing slash is not
    /// significant.
    ///
    /// # Errors
    ///
    /// - `OutsideBasename` if `path` does not start with the basename
    /// - `NoMatch` if no route matches
    pub fn match_path(&self, path: &str, basename: Option<&str>) -> Result<RouteMatch, RouteError> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        let relative =
            strip_basename(path, basename).ok_or_else(|| RouteError::OutsideBasename {
                path: path.to_owned(),
                basename: basename.unwrap_or_default().to_owned(),
            })?;
        let relative = match relative.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };

        let matched = self
            .router
            .at(relative)
            .map_err(|_| RouteError::NoMatch(relative.to_owned()))?;
        let params = matched
            .params
            .iter()
            .map(|(name, value)| {
                let decoded = urlencoding::decode(value)
                    .map_or_else(|_| value.to_owned(), std::borrow::Cow::into_owned);
                (name.to_owned(), decoded)
            })
            .collect();

        Ok(RouteMatch {
            kind: *matched.value,
            params,
        })
    }
}

/// Path relative to `basename`, or `None` when the path lies outside it.
#[must_use]
pub fn strip_basename<'a>(path: &'a str, basename: Option<&str>) -> Option<&'a str> {
    let base = basename.map(|b| b.trim_matches('/')).unwrap_or_default();
    if base.is_empty() {
        return Some(path);
    }

    let rest = path.strip_prefix('/')?.strip_prefix(base)?;
    if rest.is_empty() {
        Some("/")
    } else if rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn table() -> RouteTable {
        RouteTable::new().unwrap()
    }

    #[test]
    fn engagement_view_extracts_segments() {
        let m = table().match_path("/gdx/en/test-engagement", None).unwrap();
        assert_eq!(m.kind, RouteKind::EngagementView);
        assert_eq!(m.tenant(), Some("gdx"));
        assert_eq!(m.language(), Some("en"));
        assert_eq!(m.slug(), Some("test-engagement"));
        assert!(m.kind.is_public());
    }

    #[test]
    fn static_admin_segment_wins_over_language() {
        let m = table().match_path("/gdx/admin", None).unwrap();
        assert_eq!(m.kind, RouteKind::AdminHome);
        assert!(m.scopes().contains(&Scope::new(SUPER_ADMIN_ROLE)));
    }

    #[test]
    fn preview_parses_numeric_id() {
        let m = table().match_path("/gdx/engagements/42/view", None).unwrap();
        assert_eq!(m.kind, RouteKind::EngagementPreview);
        assert_eq!(m.engagement_id(), Some(42));
    }

    #[test]
    fn basename_is_stripped_first() {
        let m = table()
            .match_path("/portal/gdx/fr/?tab=map", Some("/portal/"))
            .unwrap();
        assert_eq!(m.kind, RouteKind::LanguageHome);
        assert_eq!(m.language(), Some("fr"));
    }

    #[test]
    fn path_outside_basename_is_rejected() {
        assert!(matches!(
            table().match_path("/portals/gdx", Some("portal")),
            Err(RouteError::OutsideBasename { .. })
        ));
    }

    #[test]
    fn params_are_percent_decoded() {
        let m = table().match_path("/gdx/en/caf%C3%A9", None).unwrap();
        assert_eq!(m.slug(), Some("café"));
    }

    #[test]
    fn unknown_path_is_no_match() {
        assert!(matches!(
            table().match_path("/", None),
            Err(RouteError::NoMatch(_))
        ));
    }

    #[test]
    fn strip_basename_variants() {
        assert_eq!(strip_basename("/a/b", None), Some("/a/b"));
        assert_eq!(strip_basename("/base", Some("base")), Some("/"));
        assert_eq!(strip_basename("/base/x", Some("/base")), Some("/x"));
        assert_eq!(strip_basename("/basex", Some("base")), None);
    }
}
