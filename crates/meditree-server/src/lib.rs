//! HTTP surface for meditree.
//!
//! - `GET /list` returns the JSON listing rendered once at startup
//! - `GET /file/<path>` streams one indexed file with byte-range support
//!
//! Startup is synchronous: load [`AppConfig`], call [`AppState::init`] to
//! build the tree and render the listing, then [`Server::bind`] and
//! [`Server::run`]. The state is never mutated afterwards.

mod config;
mod error;
mod routes;
mod server;
mod state;

pub use config::{AppConfig, CONFIG_FILE_NAME};
pub use error::{ApiError, ApiErrorBody, ApiErrorResponse, ConfigError, InitError};
pub use server::{Server, router};
pub use state::AppState;
