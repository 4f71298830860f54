mod firebase;

use crate::domain::UserId;
use async_trait::async_trait;
pub use firebase::FirebaseTokenVerifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub user_id: UserId,
    pub email: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("The ID token was rejected")]
    InvalidToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Checks an ID token with the auth provider and tells us who it belongs to.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<VerifiedUser, AuthError>;
}
