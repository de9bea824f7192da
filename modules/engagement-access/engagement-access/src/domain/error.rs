use engagement_access_sdk::AccessError;

/// Domain error for the engagement access module.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("tenant short-name is empty")]
    EmptyTenant,

    #[error("tenant '{0}' not found")]
    TenantNotFound(String),

    #[error("no fallback tenant for unknown tenant '{requested}'")]
    NoFallbackTenant { requested: String },

    #[error("language code is empty")]
    EmptyLanguageCode,

    #[error("language '{code}' is not enabled for tenant '{tenant}'")]
    LanguageNotEnabled { tenant: String, code: String },

    #[error("language '{code}' is the default language of tenant '{tenant}'")]
    DefaultLanguageRemoval { tenant: String, code: String },

    #[error("widget position {position} is out of range for {len} widgets")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("none of the required scopes is held")]
    MissingScope,

    #[error(transparent)]
    Backend(#[from] AccessError),
}

impl From<DomainError> for AccessError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyTenant => Self::not_found("tenant ''"),
            DomainError::TenantNotFound(short_name) => {
                Self::not_found(format!("tenant '{short_name}'"))
            }
            DomainError::NoFallbackTenant { requested } => {
                Self::not_found(format!("tenant '{requested}'"))
            }
            DomainError::EmptyLanguageCode => Self::validation("language", "code is empty"),
            DomainError::LanguageNotEnabled { tenant, code } => Self::validation(
                "language",
                format!("'{code}' is not enabled for tenant '{tenant}'"),
            ),
            DomainError::DefaultLanguageRemoval { tenant, code } => Self::validation(
                "language",
                format!("'{code}' is the default language of tenant '{tenant}' and cannot be removed"),
            ),
            DomainError::PositionOutOfRange { position, len } => Self::validation(
                "position",
                format!("{position} is out of range for {len} widgets"),
            ),
            DomainError::MissingScope => Self::Unauthorized,
            DomainError::Backend(e) => e,
        }
    }
}
