use crate::dispatch::{DispatchOutcome, NotificationService};
use crate::domain::{NotificationPayload, NotificationType};
use crate::guards::{AuthenticatedUser, Operator};
use crate::routes::{error_chain_fmt, failure};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct TestNotificationBody {
    title: Option<String>,
    message: Option<String>,
    #[serde(default)]
    data: BTreeMap<String, String>,
}

#[tracing::instrument(
    name = "Sending a test notification to the caller",
    skip(user, body, service),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[post("/api/notifications/send-test", data = "<body>")]
pub async fn send_test_notification(
    user: AuthenticatedUser,
    body: Json<TestNotificationBody>,
    service: &State<Arc<NotificationService>>,
) -> (Status, Json<DispatchOutcome>) {
    let body = body.into_inner();
    let payload = NotificationPayload::from_data(
        body.title.unwrap_or_else(|| "Skhaftin test notification".into()),
        body.message
            .unwrap_or_else(|| "Notifications are working!".into()),
        body.data,
    )
    .with_kind(NotificationType::Test);

    let outcome = service.send_to_user(&user.user_id, payload).await;
    let status = match outcome {
        DispatchOutcome::Sent { .. } => Status::Ok,
        DispatchOutcome::UserNotFound | DispatchOutcome::NoToken => Status::NotFound,
        DispatchOutcome::Failed { .. } => Status::BadGateway,
    };
    (status, Json(outcome))
}

#[tracing::instrument(
    name = "Broadcasting the daily reminder",
    skip(operator, service),
    fields(request_id = %Uuid::new_v4(), operator = %operator.username)
)]
#[post("/api/notifications/daily-reminders")]
pub async fn broadcast_daily_reminders(
    operator: Operator,
    service: &State<Arc<NotificationService>>,
) -> Result<Json<Value>, BroadcastError> {
    let summary = service
        .broadcast_daily_reminder()
        .await
        .map_err(|e| BroadcastError::UnexpectedError(e.into()))?;

    Ok(Json(json!({
        "success": true,
        "sent": summary.sent,
        "total": summary.total,
    })))
}

#[derive(thiserror::Error)]
pub enum BroadcastError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for BroadcastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for BroadcastError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!("BroadcastError: {:?}", self);
        failure(Status::InternalServerError, "Failed to send daily reminders").respond_to(request)
    }
}
