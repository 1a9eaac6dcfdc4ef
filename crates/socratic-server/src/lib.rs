//! socratic-server — HTTP relay between the tutoring front-end and the LLM.
//!
//! Exposes the request router used by the `socratic` binary so it can be
//! mounted in tests without binding a socket.

pub mod error;
pub mod http;
pub mod state;

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use socratic_core::{Relay, StudentLogStore};
use socratic_providers::{create_provider, SocraticConfig};

pub use error::AppError;
pub use http::{create_router, RELAY_STATUS_HEADER};
pub use state::AppState;

/// Build the full application (routes, CORS, tracing) from configuration.
pub fn build_app(config: &SocraticConfig) -> Result<Router> {
    let provider = create_provider(&config.provider)?;
    let relay = Relay::new(provider, config.relay.clone());
    let state = Arc::new(AppState::new(relay, StudentLogStore::new()));
    http::with_layers(create_router(state), &config.server.cors_origins)
}
