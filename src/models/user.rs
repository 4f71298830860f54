use crate::domain::{NotificationPreferences, PushToken, UserId, UserRecord};
use crate::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

#[derive(Queryable, Selectable)]
#[diesel(table_name = users)]
pub struct User {
    pub user_id: String,
    pub email: Option<String>,
    pub username: Option<String>,
    pub location: Option<String>,
    pub fcm_token: Option<String>,
    pub daily_reminders: bool,
    pub food_updates: bool,
    pub test_notifications: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
pub struct ProfileChanges<'a> {
    pub email: Option<&'a str>,
    pub username: Option<&'a str>,
    pub location: Option<&'a str>,
}

#[derive(AsChangeset)]
#[diesel(table_name = users)]
pub struct PreferenceChanges {
    pub daily_reminders: Option<bool>,
    pub food_updates: Option<bool>,
    pub test_notifications: Option<bool>,
}

impl TryFrom<User> for UserRecord {
    type Error = anyhow::Error;

    fn try_from(row: User) -> Result<Self, Self::Error> {
        let user_id = UserId::parse(row.user_id).map_err(anyhow::Error::msg)?;
        let fcm_token = match row.fcm_token {
            Some(token) if !token.is_empty() => {
                Some(PushToken::parse(token).map_err(anyhow::Error::msg)?)
            }
            _ => None,
        };
        Ok(UserRecord {
            user_id,
            email: row.email,
            username: row.username,
            location: row.location,
            fcm_token,
            notification_preferences: NotificationPreferences {
                daily_reminders: row.daily_reminders,
                food_updates: row.food_updates,
                test_notifications: row.test_notifications,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
