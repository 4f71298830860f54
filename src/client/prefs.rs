use crate::client::{KeyValueStore, StorageError};
use crate::domain::{NotificationPreferences, NotificationType, PushToken};
use std::collections::BTreeMap;
use std::sync::Arc;

const KEY_AUTH_TOKEN: &str = "auth_token";
const KEY_USER_EMAIL: &str = "user_email";
const KEY_USER_ID: &str = "user_id";
const KEY_FCM_TOKEN: &str = "fcm_token";
const KEY_DAILY_REMINDERS: &str = "notifications_daily_reminders";
const KEY_FOOD_UPDATES: &str = "notifications_food_updates";
const KEY_TEST_NOTIFICATIONS: &str = "notifications_test";

/// Typed view over the device key/value store.
#[derive(Clone)]
pub struct LocalPrefs {
    store: Arc<dyn KeyValueStore>,
}

impl LocalPrefs {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save_auth_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(KEY_AUTH_TOKEN, token)
    }

    pub fn auth_token(&self) -> Option<String> {
        self.store.get(KEY_AUTH_TOKEN)
    }

    pub fn save_user_info(&self, email: &str, user_id: &str) -> Result<(), StorageError> {
        self.store.set(KEY_USER_EMAIL, email)?;
        self.store.set(KEY_USER_ID, user_id)
    }

    pub fn user_email(&self) -> Option<String> {
        self.store.get(KEY_USER_EMAIL)
    }

    pub fn user_id(&self) -> Option<String> {
        self.store.get(KEY_USER_ID)
    }

    pub fn is_user_logged_in(&self) -> bool {
        self.auth_token().is_some() && self.user_id().is_some()
    }

    pub fn save_fcm_token(&self, token: &PushToken) -> Result<(), StorageError> {
        self.store.set(KEY_FCM_TOKEN, token.as_ref())
    }

    pub fn fcm_token(&self) -> Option<PushToken> {
        self.store
            .get(KEY_FCM_TOKEN)
            .and_then(|raw| PushToken::parse(raw).ok())
    }

    pub fn save_notification_preferences(
        &self,
        prefs: &NotificationPreferences,
    ) -> Result<(), StorageError> {
        self.store
            .set(KEY_DAILY_REMINDERS, &prefs.daily_reminders.to_string())?;
        self.store
            .set(KEY_FOOD_UPDATES, &prefs.food_updates.to_string())?;
        self.store
            .set(KEY_TEST_NOTIFICATIONS, &prefs.test_notifications.to_string())
    }

    pub fn notification_preferences(&self) -> NotificationPreferences {
        let flag = |key: &str| {
            self.store
                .get(key)
                .and_then(|v| v.parse::<bool>().ok())
                .unwrap_or(true)
        };
        NotificationPreferences {
            daily_reminders: flag(KEY_DAILY_REMINDERS),
            food_updates: flag(KEY_FOOD_UPDATES),
            test_notifications: flag(KEY_TEST_NOTIFICATIONS),
        }
    }

    /// Whether a received notification should be displayed, judged by its
    /// `type` data field. Missing or unknown types count as `general`.
    pub fn should_show(&self, data: &BTreeMap<String, String>) -> bool {
        let kind = data
            .get("type")
            .and_then(|t| NotificationType::parse(t))
            .unwrap_or_default();
        let shown = self.notification_preferences().allows(kind);
        if !shown {
            tracing::debug!(kind = kind.as_str(), "Suppressing a notification");
        }
        shown
    }

    /// Signs the user out. The push token and notification preferences
    /// belong to the device and are kept.
    pub fn clear_user_data(&self) -> Result<(), StorageError> {
        self.store.remove(KEY_AUTH_TOKEN)?;
        self.store.remove(KEY_USER_EMAIL)?;
        self.store.remove(KEY_USER_ID)
    }
}
