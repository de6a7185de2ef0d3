mod assistant_routes;
mod auth_routes;
mod catalog_routes;
pub mod config;
mod http_layers;
pub mod metrics;
mod mood_routes;
mod responses;
pub mod server;
pub(self) mod session;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use responses::GENERIC_FAILURE;
#[allow(unused_imports)] // Used by main.rs
pub use server::run_server;
