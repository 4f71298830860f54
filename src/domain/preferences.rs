use crate::domain::NotificationType;

/// Which notification categories a user wants to see on their device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub daily_reminders: bool,
    pub food_updates: bool,
    pub test_notifications: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            daily_reminders: true,
            food_updates: true,
            test_notifications: true,
        }
    }
}

impl NotificationPreferences {
    pub fn allows(&self, kind: NotificationType) -> bool {
        match kind {
            NotificationType::DailyReminder => self.daily_reminders,
            NotificationType::FoodUpdate => self.food_updates,
            NotificationType::Test => self.test_notifications,
            NotificationType::General => true,
        }
    }

    pub fn apply(&mut self, update: &PreferencesUpdate) {
        if let Some(daily_reminders) = update.daily_reminders {
            self.daily_reminders = daily_reminders;
        }
        if let Some(food_updates) = update.food_updates {
            self.food_updates = food_updates;
        }
        if let Some(test_notifications) = update.test_notifications {
            self.test_notifications = test_notifications;
        }
    }
}

/// Partial update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub daily_reminders: Option<bool>,
    pub food_updates: Option<bool>,
    pub test_notifications: Option<bool>,
}
