use crate::domain::{NotificationPreferences, PushToken, UserId};
use chrono::{DateTime, Utc};

/// A user's profile document, including their current push token.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: Option<String>,
    pub username: Option<String>,
    pub location: Option<String>,
    pub fcm_token: Option<PushToken>,
    pub notification_preferences: NotificationPreferences,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn new(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email: None,
            username: None,
            location: None,
            fcm_token: None,
            notification_preferences: NotificationPreferences::default(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_profile(&mut self, update: ProfileUpdate) {
        if let Some(email) = update.email {
            self.email = Some(email);
        }
        if let Some(username) = update.username {
            self.username = Some(username);
        }
        if let Some(location) = update.location {
            self.location = Some(location);
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub email: Option<String>,
    pub username: Option<String>,
    pub location: Option<String>,
}
