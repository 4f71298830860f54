use crate::domain::PushToken;
use std::collections::BTreeMap;

/// Category of a notification, carried to the device in the `type` data field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    #[default]
    General,
    DailyReminder,
    FoodUpdate,
    Test,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::General => "general",
            NotificationType::DailyReminder => "daily_reminder",
            NotificationType::FoodUpdate => "food_update",
            NotificationType::Test => "test",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "general" => Some(NotificationType::General),
            "daily_reminder" => Some(NotificationType::DailyReminder),
            "food_update" => Some(NotificationType::FoodUpdate),
            "test" => Some(NotificationType::Test),
            _ => None,
        }
    }
}

/// What a notification says, independent of who receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub title: String,
    pub body: String,
    pub kind: NotificationType,
    pub data: BTreeMap<String, String>,
}

impl NotificationPayload {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            kind: NotificationType::General,
            data: BTreeMap::new(),
        }
    }

    pub fn with_kind(mut self, kind: NotificationType) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Builds a payload from a caller supplied data map. A recognised `type`
    /// entry selects the notification kind; everything else passes through.
    pub fn from_data(
        title: impl Into<String>,
        body: impl Into<String>,
        mut data: BTreeMap<String, String>,
    ) -> Self {
        let kind = data
            .remove("type")
            .and_then(|t| NotificationType::parse(&t))
            .unwrap_or_default();
        Self {
            title: title.into(),
            body: body.into(),
            kind,
            data,
        }
    }

    /// Addresses the payload to a single installation.
    pub fn into_message(self, token: PushToken) -> PushMessage {
        let mut data = self.data;
        data.insert("type".into(), self.kind.as_str().into());
        PushMessage {
            notification: NotificationBlock {
                title: self.title,
                body: self.body,
            },
            data,
            token,
        }
    }
}

/// Provider envelope: `{notification:{title,body}, data:{type, ...}, token}`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct PushMessage {
    pub notification: NotificationBlock,
    pub data: BTreeMap<String, String>,
    pub token: PushToken,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NotificationBlock {
    pub title: String,
    pub body: String,
}
