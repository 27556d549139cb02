#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod draft;
pub mod entities;
pub mod error;
pub mod errors;
pub mod health;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod ws;

// Re-exports for public API
pub use config::draft::DraftConfig;
pub use error::AppError;
pub use errors::DraftError;
pub use state::app_state::AppState;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    fml_test_support::logging::init();
}
