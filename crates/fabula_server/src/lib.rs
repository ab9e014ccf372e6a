//! HTTP API for the Fabula storybook service.
//!
//! [`router`] exposes story generation, scene illustration, and document
//! export over a JSON API, plus raw file routes for cached images and
//! exported documents.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod routes;
mod state;
mod validate;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
