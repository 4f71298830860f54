use crate::domain::{NotificationPreferences, PreferencesUpdate};
use crate::guards::AuthenticatedUser;
use crate::routes::{error_chain_fmt, failure};
use crate::store::UserStore;
use anyhow::Context;
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

#[tracing::instrument(
    name = "Fetching notification preferences",
    skip(user, store),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[get("/api/notification-preferences")]
pub async fn get_preferences(
    user: AuthenticatedUser,
    store: &State<Arc<dyn UserStore>>,
) -> Result<Json<Value>, PreferencesError> {
    let preferences = store
        .get_user(&user.user_id)
        .await
        .context("Failed to fetch the user record.")?
        .map(|record| record.notification_preferences)
        .unwrap_or_default();

    Ok(respond_with(preferences))
}

#[tracing::instrument(
    name = "Updating notification preferences",
    skip(user, body, store),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[put("/api/notification-preferences", data = "<body>")]
pub async fn update_preferences(
    user: AuthenticatedUser,
    body: Json<PreferencesUpdate>,
    store: &State<Arc<dyn UserStore>>,
) -> Result<Json<Value>, PreferencesError> {
    let preferences = store
        .update_preferences(&user.user_id, body.into_inner())
        .await
        .context("Failed to update notification preferences.")?;

    Ok(respond_with(preferences))
}

fn respond_with(preferences: NotificationPreferences) -> Json<Value> {
    Json(json!({ "success": true, "data": preferences }))
}

#[derive(thiserror::Error)]
pub enum PreferencesError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for PreferencesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for PreferencesError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!("PreferencesError: {:?}", self);
        failure(Status::InternalServerError, "Internal server error").respond_to(request)
    }
}
