use crate::auth::{AuthError, IdTokenVerifier};
use crate::domain::UserId;
use crate::guards::{managed, AuthFailure, BearerToken};
use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use std::sync::Arc;

pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: Option<String>,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let verifier = match managed::<Arc<dyn IdTokenVerifier>>(request) {
            Ok(verifier) => verifier,
            Err(failure) => return Error(failure),
        };
        let bearer = try_outcome!(request.guard::<BearerToken>().await);

        match verifier.verify(bearer.expose()).await {
            Ok(user) => Success(AuthenticatedUser {
                user_id: user.user_id,
                email: user.email,
                _private: (),
            }),
            Err(AuthError::InvalidToken) => {
                request.local_cache(|| AuthFailure::InvalidToken);
                Error((
                    Status::Unauthorized,
                    anyhow::anyhow!("The ID token was rejected."),
                ))
            }
            Err(AuthError::UnexpectedError(e)) => {
                tracing::error!(error.cause_chain = ?e, "Failed to verify an ID token");
                Error((Status::InternalServerError, e))
            }
        }
    }
}
