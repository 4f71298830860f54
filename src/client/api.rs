use crate::client::LocalPrefs;
use crate::domain::{NotificationPreferences, PushToken};
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("The backend could not be reached")]
    Network(#[source] reqwest::Error),
    #[error("The backend failed with status {0}")]
    Server(u16),
    #[error("The backend rejected the request with status {0}")]
    Client(u16),
    #[error("The backend did not accept the session credentials")]
    Unauthorized,
    #[error("The backend response could not be decoded")]
    InvalidResponse(#[source] reqwest::Error),
}

impl ApiError {
    /// Transport failures and 5xx answers may succeed if tried again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server(status) | ApiError::Client(status) => Some(*status),
            ApiError::Unauthorized => Some(401),
            ApiError::Network(_) | ApiError::InvalidResponse(_) => None,
        }
    }
}

/// The backend operations the device relies on.
#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn update_fcm_token(&self, token: &PushToken) -> Result<(), ApiError>;

    async fn notification_preferences(&self) -> Result<NotificationPreferences, ApiError>;
}

#[derive(serde::Serialize)]
struct UpdateFcmTokenRequest<'a> {
    token: &'a PushToken,
}

#[derive(serde::Deserialize)]
struct Envelope<T> {
    #[allow(dead_code)]
    success: bool,
    data: Option<T>,
}

/// `BackendApi` over HTTP. The signed-in user's ID token is read from the
/// local prefs on every request.
pub struct HttpBackendClient {
    http_client: reqwest::Client,
    base_url: String,
    prefs: LocalPrefs,
}

impl HttpBackendClient {
    pub fn new(base_url: String, prefs: LocalPrefs, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Network)?;
        Ok(Self {
            http_client,
            base_url,
            prefs,
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.prefs.auth_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

fn classify(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized)
    } else if status.is_server_error() {
        Err(ApiError::Server(status.as_u16()))
    } else {
        Err(ApiError::Client(status.as_u16()))
    }
}

#[async_trait]
impl BackendApi for HttpBackendClient {
    #[tracing::instrument(name = "Uploading the push token", skip(self, token))]
    async fn update_fcm_token(&self, token: &PushToken) -> Result<(), ApiError> {
        let request = self
            .http_client
            .post(format!("{}/api/update-fcm-token", self.base_url))
            .json(&UpdateFcmTokenRequest { token });
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(ApiError::Network)?;
        classify(response).map(|_| ())
    }

    #[tracing::instrument(name = "Fetching notification preferences", skip(self))]
    async fn notification_preferences(&self) -> Result<NotificationPreferences, ApiError> {
        let request = self
            .http_client
            .get(format!("{}/api/notification-preferences", self.base_url));
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(ApiError::Network)?;
        let envelope: Envelope<NotificationPreferences> = classify(response)?
            .json()
            .await
            .map_err(ApiError::InvalidResponse)?;
        Ok(envelope.data.unwrap_or_default())
    }
}
