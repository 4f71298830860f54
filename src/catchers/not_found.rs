use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

#[catch(404)]
pub fn not_found(request: &Request) -> Json<Value> {
    Json(json!({
        "success": false,
        "error": "Route not found",
        "path": request.uri().path().as_str(),
    }))
}
