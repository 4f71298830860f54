use crate::domain::ProfileUpdate;
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
    name = "Fetching the caller's profile",
    skip(user, store),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[get("/api/profile")]
pub async fn get_profile(
    user: AuthenticatedUser,
    store: &State<Arc<dyn UserStore>>,
) -> Result<(Status, Json<Value>), ProfileError> {
    let record = store
        .get_user(&user.user_id)
        .await
        .context("Failed to fetch the user profile.")?;

    Ok(match record {
        Some(record) => (
            Status::Ok,
            Json(json!({ "success": true, "data": { "user": record } })),
        ),
        None => (
            Status::NotFound,
            Json(json!({ "success": false, "message": "User profile not found" })),
        ),
    })
}

#[tracing::instrument(
    name = "Updating the caller's profile",
    skip(user, body, store),
    fields(request_id = %Uuid::new_v4(), user_id = %user.user_id)
)]
#[put("/api/profile", data = "<body>")]
pub async fn update_profile(
    user: AuthenticatedUser,
    body: Json<ProfileUpdate>,
    store: &State<Arc<dyn UserStore>>,
) -> Result<Json<Value>, ProfileError> {
    let mut update = body.into_inner();
    if update.email.is_none() {
        update.email = user.email.clone();
    }
    let record = store
        .upsert_profile(&user.user_id, update)
        .await
        .context("Failed to update the user profile.")?;

    Ok(Json(json!({
        "success": true,
        "message": "Profile updated successfully",
        "data": { "user": record },
    })))
}

#[derive(thiserror::Error)]
pub enum ProfileError {
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for ProfileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for ProfileError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::error!("ProfileError: {:?}", self);
        failure(Status::InternalServerError, "Internal server error").respond_to(request)
    }
}
