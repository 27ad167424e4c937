use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::passport::Passport;
use crate::domain::ports::{IdentityPort, IdentityProfile};

/// Resolves personal attributes for a passport, degrading to placeholders
/// whenever the identity lookup fails.
#[derive(Clone)]
pub struct IdentityEnrichment {
    identity: Arc<dyn IdentityPort>,
}

impl IdentityEnrichment {
    pub fn new(identity: Arc<dyn IdentityPort>) -> Self {
        Self { identity }
    }

    /// Never fails: any lookup error yields [`IdentityProfile::placeholder`].
    pub async fn resolve(&self, passport: &Passport) -> IdentityProfile {
        match self.identity.lookup(passport).await {
            Ok(profile) => {
                debug!(passport_serie = passport.serie(), "identity resolved");
                profile
            }
            Err(e) => {
                warn!(
                    passport_serie = passport.serie(),
                    error = %e,
                    "identity lookup failed, storing placeholder attributes"
                );
                IdentityProfile::placeholder()
            }
        }
    }
}
