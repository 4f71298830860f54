use crate::configuration::OperatorSettings;
use crate::guards::{managed, AuthFailure, BasicAuth};
use anyhow::{anyhow, Context};
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::{ExposeSecret, Secret};

/// A caller holding the operator credentials, allowed to trigger broadcasts.
pub struct Operator {
    pub username: String,
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Operator {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let settings = match managed::<OperatorSettings>(request) {
            Ok(settings) => settings.clone(),
            Err(failure) => return Error(failure),
        };
        let basic_auth = match request.guard::<BasicAuth>().await {
            Success(auth) => auth,
            _ => return reject(request, anyhow!("Operator credentials were not provided.")),
        };

        match validate_credentials(basic_auth, settings).await {
            Ok(username) => Success(Operator {
                username,
                _private: (),
            }),
            Err(e) => reject(request, e),
        }
    }
}

fn reject<'r>(request: &'r Request<'_>, e: anyhow::Error) -> Outcome<Operator, anyhow::Error> {
    request.local_cache(|| AuthFailure::OperatorCredentials);
    Error((Status::Unauthorized, e))
}

#[tracing::instrument(name = "Validate operator credentials", skip(credentials, settings))]
async fn validate_credentials(
    credentials: BasicAuth,
    settings: OperatorSettings,
) -> Result<String, anyhow::Error> {
    if credentials.username != settings.username {
        return Err(anyhow!("Unknown operator username."));
    }
    let password = credentials.password;
    tokio::task::spawn_blocking(move || verify_password_hash(settings.password_hash, password))
        .await
        .context("Failed to spawn a blocking task.")??;
    Ok(credentials.username)
}

fn verify_password_hash(
    expected_password_hash: Secret<String>,
    password_candidate: Secret<String>,
) -> Result<(), anyhow::Error> {
    let expected_password_hash = PasswordHash::new(expected_password_hash.expose_secret())
        .context("Failed to parse hash in PHC string format.")?;
    Argon2::default()
        .verify_password(
            password_candidate.expose_secret().as_bytes(),
            &expected_password_hash,
        )
        .context("Invalid operator password.")
}
