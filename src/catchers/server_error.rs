use crate::routes::failure;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::Value;

#[catch(500)]
pub fn internal_error(_: &Request) -> (Status, Json<Value>) {
    failure(Status::InternalServerError, "Internal server error")
}
