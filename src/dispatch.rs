use crate::domain::{NotificationPayload, NotificationType, PushToken, UserId};
use crate::push::PushProvider;
use crate::store::{StoreError, UserStore};
use futures::future::join_all;
use std::sync::Arc;

pub const DAILY_REMINDER_TITLE: &str = "Daily Food Check-in!";
pub const DAILY_REMINDER_BODY: &str = "See what food is being shared near you today.";

/// Result of a single dispatch. Failures are values, never panics or errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Sent { message_id: String },
    Failed { error: String },
    UserNotFound,
    NoToken,
}

impl DispatchOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, DispatchOutcome::Sent { .. })
    }
}

impl serde::Serialize for DispatchOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut state = serializer.serialize_struct("DispatchOutcome", 2)?;
        match self {
            DispatchOutcome::Sent { message_id } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("messageId", message_id)?;
            }
            DispatchOutcome::Failed { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
            DispatchOutcome::UserNotFound => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", "User not found")?;
            }
            DispatchOutcome::NoToken => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", "User has no FCM token")?;
            }
        }
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct BroadcastSummary {
    pub sent: usize,
    pub total: usize,
}

/// Composes notifications and hands them to the push provider.
pub struct NotificationService {
    store: Arc<dyn UserStore>,
    provider: Arc<dyn PushProvider>,
}

impl NotificationService {
    pub fn new(store: Arc<dyn UserStore>, provider: Arc<dyn PushProvider>) -> Self {
        Self { store, provider }
    }

    #[tracing::instrument(name = "Send a notification to a token", skip(self, token, payload))]
    pub async fn send_to_token(
        &self,
        token: PushToken,
        payload: NotificationPayload,
    ) -> DispatchOutcome {
        let message = payload.into_message(token);
        match self.provider.send(&message).await {
            Ok(message_id) => {
                tracing::info!(message_id = %message_id.0, "Notification accepted by the provider");
                DispatchOutcome::Sent {
                    message_id: message_id.0,
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "The provider refused a notification");
                DispatchOutcome::Failed {
                    error: error.to_string(),
                }
            }
        }
    }

    #[tracing::instrument(name = "Send a notification to a user", skip(self, payload))]
    pub async fn send_to_user(
        &self,
        user_id: &UserId,
        payload: NotificationPayload,
    ) -> DispatchOutcome {
        let user = match self.store.get_user(user_id).await {
            Ok(Some(user)) => user,
            Ok(None) => return DispatchOutcome::UserNotFound,
            Err(error) => {
                tracing::error!(error.cause_chain = ?error, "Failed to look up the recipient");
                return DispatchOutcome::Failed {
                    error: error.to_string(),
                };
            }
        };
        match user.fcm_token {
            Some(token) => self.send_to_token(token, payload).await,
            None => DispatchOutcome::NoToken,
        }
    }

    /// Sends the daily reminder to every user holding a token.
    ///
    /// All sends are awaited; a failed recipient only lowers `sent`.
    #[tracing::instrument(name = "Broadcast the daily reminder", skip(self))]
    pub async fn broadcast_daily_reminder(&self) -> Result<BroadcastSummary, StoreError> {
        let recipients = self.store.users_with_push_token().await?;
        let sends = recipients
            .into_iter()
            .filter_map(|user| user.fcm_token)
            .map(|token| self.send_to_token(token, daily_reminder()));
        let outcomes = join_all(sends).await;

        let summary = BroadcastSummary {
            sent: outcomes.iter().filter(|o| o.is_sent()).count(),
            total: outcomes.len(),
        };
        tracing::info!(
            sent = summary.sent,
            total = summary.total,
            "Daily reminders dispatched"
        );
        Ok(summary)
    }
}

pub fn daily_reminder() -> NotificationPayload {
    NotificationPayload::new(DAILY_REMINDER_TITLE, DAILY_REMINDER_BODY)
        .with_kind(NotificationType::DailyReminder)
        .with_data("click_action", "FLUTTER_NOTIFICATION_CLICK")
}
