//! HTTP front end for CMS-hosted sites.
//!
//! Every request path is treated as a page identifier: the page is fetched
//! through a [`PageSource`], rendered to XHTML and returned with the status
//! and content type the page declares.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use cms_client::{ClientConfig, CmsClient};
//! use cms_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = CmsClient::new(ClientConfig::new(
//!         "https://cms.example.org/xmlrpc.php",
//!         "private-key",
//!         "session",
//!         42,
//!     ))
//!     .unwrap();
//!
//!     run_server(ServerConfig::default(), Arc::new(client)).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum server (cms-server)
//!                        │
//!                        └─► spawn_blocking ──► PageSource (cache + XML-RPC)
//!                                │
//!                                └─► PageRenderer ──► XHTML response
//! ```

mod app;
mod error;
mod handlers;
mod middleware;
mod state;

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;

use cms_client::PageSource;
use state::AppState;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Application version (part of every `ETag`).
    pub version: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            version: String::new(),
        }
    }
}

/// Run the server until Ctrl-C.
///
/// # Arguments
///
/// * `config` - Server configuration
/// * `source` - Where pages are fetched from
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails to start.
pub async fn run_server(
    config: ServerConfig,
    source: Arc<dyn PageSource>,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(AppState {
        source,
        version: config.version.clone(),
    });

    let app = app::create_router(state);

    let addr = SocketAddr::from_str(&format!("{}:{}", config.host, config.port))?;
    tracing::info!(address = %addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from the application config.
///
/// # Arguments
///
/// * `config` - Loaded configuration
/// * `version` - Application version
#[must_use]
pub fn server_config_from_config(config: &cms_config::Config, version: String) -> ServerConfig {
    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        version,
    }
}
