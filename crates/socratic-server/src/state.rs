//! Shared handler state.

use std::time::Instant;

use socratic_core::{Relay, StudentLogStore};

/// State owned by the router and shared across handlers.
pub struct AppState {
    pub relay: Relay,
    pub logs: StudentLogStore,
    started_at: Instant,
}

impl AppState {
    pub fn new(relay: Relay, logs: StudentLogStore) -> Self {
        Self {
            relay,
            logs,
            started_at: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
