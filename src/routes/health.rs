use chrono::Utc;
use rocket::serde::json::Json;
use serde_json::{json, Value};

#[get("/")]
pub fn health() -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Skhaftin API is running!",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}
