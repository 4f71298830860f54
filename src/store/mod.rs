mod memory;
#[cfg(feature = "postgres")]
mod postgres;

use crate::domain::{
    NotificationPreferences, PreferencesUpdate, ProfileUpdate, PushToken, UserId, UserRecord,
};
use async_trait::async_trait;
pub use memory::InMemoryUserStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresUserStore;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("The user store is unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

/// Persistent user documents keyed by the auth-provider uid.
///
/// Token writes are a plain "set": the last registration for a user wins.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Creates the record when missing, then overwrites its push token.
    async fn upsert_push_token(&self, user_id: &UserId, token: &PushToken)
        -> Result<(), StoreError>;

    async fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserRecord, StoreError>;

    async fn update_preferences(
        &self,
        user_id: &UserId,
        update: PreferencesUpdate,
    ) -> Result<NotificationPreferences, StoreError>;

    /// Every record currently holding a non-empty push token.
    async fn users_with_push_token(&self) -> Result<Vec<UserRecord>, StoreError>;
}
