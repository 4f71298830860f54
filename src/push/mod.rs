mod fcm_client;

use crate::domain::PushMessage;
use async_trait::async_trait;
pub use fcm_client::{FcmClient, ServiceAccountKey};

/// Identifier the provider assigns to an accepted message.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct MessageId(pub String);

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PushError {
    #[error("Failed to obtain a provider access token: {0}")]
    Auth(String),
    #[error("The service account credentials are invalid: {0}")]
    InvalidCredentials(String),
    #[error("The push request could not be delivered")]
    Request(#[from] reqwest::Error),
    #[error("The provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait PushProvider: Send + Sync {
    async fn send(&self, message: &PushMessage) -> Result<MessageId, PushError>;
}
