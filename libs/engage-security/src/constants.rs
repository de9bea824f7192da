/// Marker role granting access at call sites that enable the team-member override.
pub const TEAM_MEMBER_ROLE: &str = "TEAM_MEMBER";

/// Platform-wide administrator role.
pub const SUPER_ADMIN_ROLE: &str = "super_admin";

/// Session storage key holding the active tenant short-name.
pub const SESSION_TENANT_KEY: &str = "tenantId";

/// Session storage key holding the active language code.
pub const SESSION_LANGUAGE_KEY: &str = "languageId";

/// Session storage key holding the bearer token.
pub const SESSION_AUTH_TOKEN_KEY: &str = "authToken";
