use crate::auth::{AuthError, IdTokenVerifier, VerifiedUser};
use crate::configuration::FirebaseSettings;
use crate::domain::UserId;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(serde::Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
}

/// Verifies Firebase ID tokens through the Identity Toolkit `accounts:lookup` API.
pub struct FirebaseTokenVerifier {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
}

impl FirebaseTokenVerifier {
    pub fn new(
        endpoint: String,
        api_key: Secret<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
            api_key,
        })
    }

    pub fn from_settings(settings: &FirebaseSettings) -> Result<Self, reqwest::Error> {
        Self::new(
            settings.identity_endpoint.clone(),
            settings.api_key.clone(),
            settings.timeout(),
        )
    }
}

#[async_trait]
impl IdTokenVerifier for FirebaseTokenVerifier {
    #[tracing::instrument(name = "Verifying an ID token", skip(self, id_token))]
    async fn verify(&self, id_token: &str) -> Result<VerifiedUser, AuthError> {
        let url = format!("{}/v1/accounts:lookup", self.endpoint);
        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(&LookupRequest { id_token })
            .send()
            .await
            .context("Failed to reach the identity provider.")?;

        match response.status() {
            StatusCode::OK => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED => {
                return Err(AuthError::InvalidToken)
            }
            status => {
                return Err(anyhow::anyhow!("The identity provider answered {}", status).into())
            }
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .context("Failed to parse the identity provider response.")?;
        let user = lookup
            .users
            .into_iter()
            .next()
            .ok_or(AuthError::InvalidToken)?;
        let user_id = UserId::parse(user.local_id).map_err(|_| AuthError::InvalidToken)?;
        Ok(VerifiedUser {
            user_id,
            email: user.email,
        })
    }
}
