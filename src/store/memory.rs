use crate::domain::{
    NotificationPreferences, PreferencesUpdate, ProfileUpdate, PushToken, UserId, UserRecord,
};
use crate::store::{StoreError, UserStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a record directly, bypassing the merge rules.
    pub async fn insert(&self, record: UserRecord) {
        self.users
            .write()
            .await
            .insert(record.user_id.clone(), record);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn get_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn upsert_push_token(
        &self,
        user_id: &UserId,
        token: &PushToken,
    ) -> Result<(), StoreError> {
        let now = Utc::now();
        let mut users = self.users.write().await;
        let record = users
            .entry(user_id.clone())
            .or_insert_with(|| UserRecord::new(user_id.clone(), now));
        record.fcm_token = Some(token.clone());
        record.updated_at = now;
        Ok(())
    }

    async fn upsert_profile(
        &self,
        user_id: &UserId,
        update: ProfileUpdate,
    ) -> Result<UserRecord, StoreError> {
        let now = Utc::now();
        let mut users = self.users.write().await;
        let record = users
            .entry(user_id.clone())
            .or_insert_with(|| UserRecord::new(user_id.clone(), now));
        record.apply_profile(update);
        record.updated_at = now;
        Ok(record.clone())
    }

    async fn update_preferences(
        &self,
        user_id: &UserId,
        update: PreferencesUpdate,
    ) -> Result<NotificationPreferences, StoreError> {
        let now = Utc::now();
        let mut users = self.users.write().await;
        let record = users
            .entry(user_id.clone())
            .or_insert_with(|| UserRecord::new(user_id.clone(), now));
        record.notification_preferences.apply(&update);
        record.updated_at = now;
        Ok(record.notification_preferences)
    }

    async fn users_with_push_token(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .filter(|u| u.fcm_token.is_some())
            .cloned()
            .collect())
    }
}
