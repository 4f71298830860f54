mod authenticated_user;
mod basic_auth;
mod bearer_token;
mod operator;

use anyhow::anyhow;
pub use authenticated_user::*;
pub use basic_auth::*;
pub use bearer_token::*;
pub use operator::*;
use rocket::http::Status;
use rocket::Request;

/// Why a request guard turned a request away with a 401, read back by the catcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    MissingToken,
    InvalidToken,
    OperatorCredentials,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::MissingToken => "No token provided",
            AuthFailure::InvalidToken => "Invalid token",
            AuthFailure::OperatorCredentials => "Operator credentials required",
        }
    }
}

/// Managed state a guard depends on. Missing state is a wiring bug, so it
/// answers 500 rather than 401.
fn managed<'r, T: Send + Sync + 'static>(
    request: &'r Request<'_>,
) -> Result<&'r T, (Status, anyhow::Error)> {
    request.rocket().state::<T>().ok_or_else(|| {
        (
            Status::InternalServerError,
            anyhow!("No {} is managed.", std::any::type_name::<T>()),
        )
    })
}
