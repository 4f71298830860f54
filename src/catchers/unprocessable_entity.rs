use crate::routes::failure;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::Value;

/// Rocket answers a body it cannot deserialize with 422; clients of this API
/// expect 400.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(_: &Request) -> (Status, Json<Value>) {
    failure(Status::BadRequest, "Malformed request body")
}

#[catch(400)]
pub fn bad_request(_: &Request) -> (Status, Json<Value>) {
    failure(Status::BadRequest, "Malformed request body")
}
