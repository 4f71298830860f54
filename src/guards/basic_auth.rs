use rocket::http::Status;
use rocket::outcome::Outcome::{Error, Success};
use rocket::request::{FromRequest, Outcome};
use rocket::Request;
use secrecy::Secret;

/// Credentials carried in `Authorization: Basic <base64(user:password)>`.
#[derive(Debug)]
pub struct BasicAuth {
    pub username: String,
    pub password: Secret<String>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BasicAuthError {
    #[error("The 'Authorization' header was missing")]
    Missing,
    #[error("The authorization scheme was not 'Basic'")]
    WrongScheme,
    #[error("The 'Basic' credentials were not valid base64 UTF-8")]
    Undecodable,
    #[error("The 'Basic' credentials did not contain a ':' separator")]
    NoSeparator,
}

impl BasicAuth {
    pub fn from_header(header_value: Option<&str>) -> Result<Self, BasicAuthError> {
        let encoded = header_value
            .ok_or(BasicAuthError::Missing)?
            .strip_prefix("Basic ")
            .ok_or(BasicAuthError::WrongScheme)?;
        let decoded = base64::decode_config(encoded.trim(), base64::STANDARD)
            .ok()
            .and_then(|bytes| String::from_utf8(bytes).ok())
            .ok_or(BasicAuthError::Undecodable)?;
        // Passwords may contain ':', usernames may not.
        let (username, password) = decoded
            .split_once(':')
            .ok_or(BasicAuthError::NoSeparator)?;

        Ok(BasicAuth {
            username: username.to_string(),
            password: Secret::new(password.to_string()),
        })
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BasicAuth {
    type Error = BasicAuthError;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match BasicAuth::from_header(request.headers().get_one("Authorization")) {
            Ok(auth) => Success(auth),
            Err(e) => Error((Status::Unauthorized, e)),
        }
    }
}
