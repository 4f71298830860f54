use crate::configuration::FcmSettings;
use crate::domain::PushMessage;
use crate::push::{MessageId, PushError, PushProvider};
use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;
use tokio::sync::Mutex;

const FCM_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Refresh the cached access token this many seconds before it expires.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// The fields of a Google service account key file that the client needs.
#[derive(serde::Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: Secret<String>,
    pub token_uri: String,
}

#[derive(serde::Serialize)]
struct Claims<'a> {
    iss: &'a str,
    sub: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(serde::Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(serde::Deserialize)]
struct SendResponse {
    name: String,
}

#[derive(serde::Serialize)]
struct SendRequest<'a> {
    message: &'a PushMessage,
}

struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Firebase Cloud Messaging HTTP v1 client.
///
/// Access tokens come from the OAuth2 JWT-bearer grant signed with the
/// service account key and are reused until shortly before they expire.
pub struct FcmClient {
    http_client: reqwest::Client,
    endpoint: String,
    project_id: String,
    credentials: ServiceAccountKey,
    token_cache: Mutex<Option<CachedToken>>,
}

impl FcmClient {
    pub fn new(
        endpoint: String,
        project_id: String,
        credentials: ServiceAccountKey,
        timeout: Duration,
    ) -> Result<Self, PushError> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            endpoint,
            project_id,
            credentials,
            token_cache: Mutex::new(None),
        })
    }

    pub fn from_settings(settings: &FcmSettings) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(&settings.service_account_key_path).with_context(|| {
            format!(
                "Failed to read the service account key at {}",
                settings.service_account_key_path
            )
        })?;
        let credentials: ServiceAccountKey =
            serde_json::from_str(&raw).context("Failed to parse the service account key.")?;
        let client = Self::new(
            settings.endpoint.clone(),
            settings.project_id.clone(),
            credentials,
            settings.timeout(),
        )?;
        Ok(client)
    }

    async fn access_token(&self) -> Result<String, PushError> {
        let mut cache = self.token_cache.lock().await;
        let now = Utc::now().timestamp();
        if let Some(cached) = cache.as_ref() {
            if cached.expires_at > now + EXPIRY_MARGIN_SECS {
                return Ok(cached.access_token.clone());
            }
        }

        let assertion = self.signed_assertion(now)?;
        let response = self
            .http_client
            .post(&self.credentials.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(PushError::Auth(format!(
                "token endpoint answered {}",
                response.status()
            )));
        }
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| PushError::Auth(e.to_string()))?;

        *cache = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: now + token.expires_in,
        });
        Ok(token.access_token)
    }

    fn signed_assertion(&self, now: i64) -> Result<String, PushError> {
        let claims = Claims {
            iss: &self.credentials.client_email,
            sub: &self.credentials.client_email,
            scope: FCM_SCOPE,
            aud: &self.credentials.token_uri,
            iat: now,
            exp: now + 3600,
        };
        let key = EncodingKey::from_rsa_pem(self.credentials.private_key.expose_secret().as_bytes())
            .map_err(|e| PushError::InvalidCredentials(e.to_string()))?;
        encode(&Header::new(Algorithm::RS256), &claims, &key)
            .map_err(|e| PushError::InvalidCredentials(e.to_string()))
    }
}

#[async_trait]
impl PushProvider for FcmClient {
    #[tracing::instrument(name = "Sending a push message through FCM", skip(self, message))]
    async fn send(&self, message: &PushMessage) -> Result<MessageId, PushError> {
        let access_token = self.access_token().await?;
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            self.endpoint, self.project_id
        );
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(access_token)
            .json(&SendRequest { message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        let sent: SendResponse = response.json().await?;
        Ok(MessageId(sent.name))
    }
}
