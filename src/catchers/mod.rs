pub mod not_found;
mod server_error;
pub mod unauthorized;
mod unprocessable_entity;

pub use not_found::*;
pub use server_error::*;
pub use unauthorized::*;
pub use unprocessable_entity::*;
