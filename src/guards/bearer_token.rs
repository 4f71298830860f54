use crate::guards::AuthFailure;
use anyhow::Context;
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};

/// The raw ID token carried in `Authorization: Bearer <token>`.
pub struct BearerToken(Secret<String>);

impl BearerToken {
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match from_request_result(request) {
            Ok(token) => Success(token),
            Err(e) => {
                request.local_cache(|| AuthFailure::MissingToken);
                Error((Status::Unauthorized, e))
            }
        }
    }
}

fn from_request_result(request: &Request) -> Result<BearerToken, anyhow::Error> {
    let header_value = request
        .headers()
        .get_one("Authorization")
        .context("The 'Authorization' header was missing")?;

    let token = header_value
        .strip_prefix("Bearer ")
        .context("The authorization scheme was not 'Bearer'.")?
        .trim();

    if token.is_empty() {
        anyhow::bail!("The 'Bearer' credentials were empty.");
    }

    Ok(BearerToken(Secret::new(token.to_string())))
}
