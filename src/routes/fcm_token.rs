use crate::domain::PushToken;
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

#[derive(serde::Deserialize)]
pub struct UpdateTokenBody {
    token: Option<String>,
}

impl TryFrom<UpdateTokenBody> for PushToken {
    type Error = UpdateTokenError;

    fn try_from(body: UpdateTokenBody) -> Result<Self, Self::Error> {
        match body.token {
            Some(token) if !token.is_empty() => {
                PushToken::parse(token).map_err(UpdateTokenError::ValidationError)
            }
            _ => Err(UpdateTokenError::MissingToken),
        }
    }
}

#[tracing::instrument(
    name = "Saving the caller's push token",
    skip(user, body, store),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[post("/api/update-fcm-token", data = "<body>")]
pub async fn update_fcm_token(
    user: AuthenticatedUser,
    body: Json<UpdateTokenBody>,
    store: &State<Arc<dyn UserStore>>,
) -> Result<Json<Value>, UpdateTokenError> {
    let token: PushToken = body.into_inner().try_into()?;
    store
        .upsert_push_token(&user.user_id, &token)
        .await
        .context("Failed to store the push token.")?;

    Ok(Json(json!({
        "success": true,
        "message": "FCM token updated successfully",
    })))
}

#[derive(thiserror::Error)]
pub enum UpdateTokenError {
    #[error("FCM token is required")]
    MissingToken,
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UpdateTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for UpdateTokenError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let response = match &self {
            UpdateTokenError::MissingToken | UpdateTokenError::ValidationError(_) => {
                tracing::warn!("UpdateTokenError: {:?}", self);
                failure(Status::BadRequest, &self.to_string())
            }
            UpdateTokenError::UnexpectedError(_) => {
                tracing::error!("UpdateTokenError: {:?}", self);
                failure(Status::InternalServerError, "Failed to update FCM token")
            }
        };
        response.respond_to(request)
    }
}
