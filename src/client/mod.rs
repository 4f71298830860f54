//! Device-side half: keeps the push token locally and relays it to the backend.
mod api;
mod prefs;
mod registration;
mod storage;

pub use api::*;
pub use prefs::LocalPrefs;
pub use registration::*;
pub use storage::*;
