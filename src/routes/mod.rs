mod fcm_token;
pub mod health;
mod notifications;
mod preferences;
mod profile;

pub use fcm_token::*;
pub use health::*;
pub use notifications::*;
pub use preferences::*;
pub use profile::*;

use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// `{success: false, error}` with the given status.
pub fn failure(status: Status, error: &str) -> (Status, Json<Value>) {
    (status, Json(json!({ "success": false, "error": error })))
}
