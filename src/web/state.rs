//! Application state management.

use std::time::Instant;

use super::error::WebResult;
use super::templates::Templates;
use crate::platform::Platform;

/// Shared application state.
pub struct AppState {
    /// Managers every handler works through
    pub platform: Platform,
    /// Compiled page templates
    pub templates: Templates,
    /// Server start time
    pub start_time: Instant,
}

impl AppState {
    /// Create a new application state.
    pub fn new(platform: Platform) -> WebResult<Self> {
        Ok(Self {
            platform,
            templates: Templates::new()?,
            start_time: Instant::now(),
        })
    }

    /// Get server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
