#[macro_use]
extern crate rocket;

pub mod auth;
pub mod catchers;
pub mod client;
pub mod configuration;
pub mod dispatch;
pub mod domain;
pub mod guards;
#[cfg(feature = "postgres")]
pub mod models;
pub mod port_saver;
pub mod push;
pub mod routes;
#[cfg(feature = "postgres")]
pub mod schema;
pub mod startup;
pub mod store;
pub mod telemetry;
