use async_trait::async_trait;
use thiserror::Error;

use crate::domain::passport::Passport;

/// Placeholder used for every attribute the identity lookup could not provide.
pub const UNKNOWN: &str = "Unknown";

/// Personal attributes resolved from a passport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
}

impl IdentityProfile {
    pub fn placeholder() -> Self {
        Self {
            surname: UNKNOWN.to_owned(),
            name: UNKNOWN.to_owned(),
            patronymic: Some(UNKNOWN.to_owned()),
            address: UNKNOWN.to_owned(),
        }
    }
}

#[derive(Debug, Error)]
pub enum IdentityLookupError {
    #[error("identity service unreachable: {0}")]
    Transport(String),

    #[error("identity service answered with status {0}")]
    Status(u16),

    #[error("identity service returned an unexpected body: {0}")]
    Malformed(String),
}

/// Transport-agnostic lookup of personal data by passport.
#[async_trait]
pub trait IdentityPort: Send + Sync {
    async fn lookup(&self, passport: &Passport) -> Result<IdentityProfile, IdentityLookupError>;
}
