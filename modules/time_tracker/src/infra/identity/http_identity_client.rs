use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::domain::passport::Passport;
use crate::domain::ports::{IdentityLookupError, IdentityPort, IdentityProfile};
use modkit::TracedClient;

/// HTTP adapter implementing the IdentityPort.
///
/// Issues `GET {base_url}?passportSerie=SSSS&passportNumber=NNNNNN` and expects a
/// JSON profile. The request timeout lives in the `TracedClient`.
pub struct HttpIdentityClient {
    client: TracedClient,
    base_url: Url,
}

impl HttpIdentityClient {
    pub fn new(client: TracedClient, base_url: Url) -> Self {
        Self { client, base_url }
    }
}

/// Response body of the identity service
#[derive(Debug, Deserialize)]
struct PeopleInfo {
    surname: String,
    name: String,
    #[serde(default)]
    patronymic: Option<String>,
    address: String,
}

impl From<PeopleInfo> for IdentityProfile {
    fn from(p: PeopleInfo) -> Self {
        Self {
            surname: p.surname,
            name: p.name,
            patronymic: p.patronymic,
            address: p.address,
        }
    }
}

#[async_trait]
impl IdentityPort for HttpIdentityClient {
    #[instrument(
        name = "time_tracker.http.identity.lookup",
        skip_all,
        fields(base_url = %self.base_url, passport_serie = passport.serie())
    )]
    async fn lookup(&self, passport: &Passport) -> Result<IdentityProfile, IdentityLookupError> {
        let response = self
            .client
            .get_with_query(
                self.base_url.as_str(),
                &[
                    ("passportSerie", passport.serie()),
                    ("passportNumber", passport.number()),
                ],
            )
            .await
            .map_err(|e| IdentityLookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(IdentityLookupError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| IdentityLookupError::Transport(e.to_string()))?;
        let info: PeopleInfo = serde_json::from_slice(&body)
            .map_err(|e| IdentityLookupError::Malformed(e.to_string()))?;

        Ok(info.into())
    }
}
