// Copyright 2026 S4Core Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Application initialization and runtime.
//!
//! This module handles:
//! - Loading container metadata
//! - HTTP server setup and routing
//! - Graceful shutdown

use crate::config::Config;
use anyhow::{Context, Result};
use axum::ServiceExt;
use ck_api::{create_router, AppState, IdentityConfig, InMemoryMetadataSource};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::normalize_path::NormalizePath;
use tracing::{error, info, warn};

/// Main application.
pub struct App {
    config: Config,
    metadata: InMemoryMetadataSource,
}

impl App {
    /// Creates a new application instance, loading the metadata seed if configured.
    pub async fn new(config: Config) -> Result<Self> {
        info!("Initializing container keys application...");

        let metadata = match &config.metadata.file {
            Some(path) => InMemoryMetadataSource::from_json_file(path)
                .await
                .with_context(|| format!("Failed to load container metadata from {:?}", path))?,
            None => {
                warn!("CK_METADATA_FILE not set, starting with no containers");
                InMemoryMetadataSource::new()
            }
        };

        Ok(Self { config, metadata })
    }

    /// Container metadata served by this application.
    pub fn metadata(&self) -> &InMemoryMetadataSource {
        &self.metadata
    }

    /// Builds the application state from configuration.
    pub fn state(&self) -> AppState {
        let identity = if self.config.identity.disabled {
            warn!("Identity auth disabled, requests without a container key are not checked");
            IdentityConfig::disabled()
        } else {
            IdentityConfig::new(self.config.identity.tokens.iter().cloned())
        };

        AppState::new(self.metadata.clone(), identity)
            .with_max_upload_size(self.config.server.max_upload_size)
    }

    /// Runs the HTTP server until a shutdown signal arrives.
    pub async fn run(self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

        let addr: SocketAddr = self.config.server.bind.parse()?;
        info!(
            "Max upload size: {} bytes ({:.2} GB)",
            self.config.server.max_upload_size,
            self.config.server.max_upload_size as f64 / (1024.0 * 1024.0 * 1024.0)
        );
        info!("Identity tokens configured: {}", self.config.identity.tokens.len());

        let prometheus_handle = if self.config.metrics.prometheus_enabled {
            use metrics_exporter_prometheus::PrometheusBuilder;
            match PrometheusBuilder::new().install_recorder() {
                Ok(handle) => {
                    info!("Prometheus metrics enabled (available at /metrics)");
                    Some(handle)
                }
                Err(e) => {
                    warn!("Failed to install Prometheus recorder: {}. Metrics disabled.", e);
                    None
                }
            }
        } else {
            info!("Prometheus metrics disabled");
            None
        };

        let mut state = self.state();
        if let Some(handle) = prometheus_handle {
            state = state.with_prometheus_handle(handle);
        }

        let router = create_router(state);

        info!("Listening on http://{}", addr);
        run_http_server(addr, router).await
    }
}

/// Runs the HTTP server.
async fn run_http_server(addr: SocketAddr, router: axum::Router) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    // Trailing slashes would otherwise miss the container routes.
    let app = NormalizePath::trim_trailing_slash(router);

    axum::serve(
        listener,
        ServiceExt::<axum::http::Request<axum::body::Body>>::into_make_service(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Handles graceful shutdown signals.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown...");
        }
    }
}
