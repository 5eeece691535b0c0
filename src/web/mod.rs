//! Web form for platform-cli.
//!
//! Serves HTML pages for the same operations the CLI offers, grouped into a
//! sidebar with three sections:
//!
//! - **Compute**: launch, start, stop and terminate instances
//! - **Storage**: create buckets (public ones need an explicit confirmation) and upload files
//! - **DNS**: create zones, add and delete A records
//!
//! Each form action runs one manager operation and re-renders its section
//! with a success or error notice. Uploads are read from the multipart body
//! into memory and handed to S3 as a single object.
//!
//! # Example
//!
//! ```rust,ignore
//! use platform_cli::web::{WebConfig, WebServer};
//!
//! let platform = Platform::connect(&config).await;
//! let server = WebServer::new(WebConfig::default(), platform)?;
//! server.run_with_shutdown(async { let _ = tokio::signal::ctrl_c().await; }).await?;
//! ```

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod templates;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::{Notice, WebError, WebResult};
pub use state::AppState;

use crate::platform::Platform;

/// Configuration for the web server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Address to bind the server to
    pub bind_address: SocketAddr,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8501)),
        }
    }
}

impl WebConfig {
    /// Parse a bind address such as `127.0.0.1:8501`.
    pub fn from_bind(bind: &str) -> WebResult<Self> {
        let bind_address = bind
            .parse()
            .map_err(|e| WebError::Config(format!("Invalid bind address '{}': {}", bind, e)))?;
        Ok(Self { bind_address })
    }
}

/// The web form server.
pub struct WebServer {
    config: WebConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new server around a set of managers.
    pub fn new(config: WebConfig, platform: Platform) -> WebResult<Self> {
        let state = Arc::new(AppState::new(platform)?);
        Ok(Self { config, state })
    }

    /// Build the router with all routes.
    pub fn router(&self) -> Router {
        routes::web_routes(self.state.clone()).layer(TraceLayer::new_for_http())
    }

    /// Run the server with graceful shutdown support.
    pub async fn run_with_shutdown(
        self,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = self.config.bind_address;
        let router = self.router();

        info!("Starting platform-cli web form on http://{}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
    }
}
