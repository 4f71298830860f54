use crate::guards::AuthFailure;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

#[derive(Responder)]
#[response(status = 401)]
pub struct Unauthorized {
    body: Json<Value>,
    challenge: Header<'static>,
}

/// Reports which guard turned the request away, along with the matching
/// `WWW-Authenticate` challenge.
#[catch(401)]
pub fn unauthorized(request: &Request) -> Unauthorized {
    let failure = *request.local_cache(|| AuthFailure::MissingToken);
    let challenge = match failure {
        AuthFailure::OperatorCredentials => r#"Basic realm="operator""#,
        AuthFailure::MissingToken | AuthFailure::InvalidToken => "Bearer",
    };
    Unauthorized {
        body: Json(json!({ "success": false, "error": failure.message() })),
        challenge: Header::new("WWW-Authenticate", challenge),
    }
}
