//! HTTP surface of the campus routing engine

pub mod api;
pub mod config;
pub mod error;
pub mod outdoor;
pub mod state;

pub use api::router;
pub use config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;
