//! Path templates of the backend REST API, relative to the base URL.

pub const TENANTS: &str = "/tenants/";
pub const TENANT: &str = "/tenants/{short_name}";
pub const LANGUAGES: &str = "/languages/";
pub const TENANT_LANGUAGES: &str = "/tenants/{short_name}/languages";
pub const TENANT_LANGUAGE: &str = "/tenants/{short_name}/languages/{code}";
pub const ENGAGEMENT: &str = "/engagements/{engagement_id}";
pub const SLUG: &str = "/slugs/{slug}";
pub const WIDGETS: &str = "/engagements/{engagement_id}/widgets";
pub const WIDGETS_SORT: &str = "/engagements/{engagement_id}/widgets/sort_index";
pub const DOCUMENTS: &str = "/widgets/{widget_id}/documents";
pub const USERS: &str = "/users/";
pub const USER: &str = "/users/{user_id}";
pub const VERSION: &str = "/version";

/// Header carrying the tenant short-name.
pub const TENANT_ID_HEADER: &str = "tenant-id";
