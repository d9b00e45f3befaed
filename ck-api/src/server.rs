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

//! Axum HTTP server setup and routing.
//!
//! The storage routes sit behind two auth stages: container keys first, then
//! identity auth. `/info` and `/metrics` are public.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::metadata::ContainerMetadataSource;
use crate::middleware::{
    container_keys_middleware, identity_auth_middleware, logging_middleware, metrics_middleware,
    IdentityConfig,
};
use crate::store::ObjectStore;

/// Default maximum upload size (5GB).
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 5 * 1024 * 1024 * 1024;

/// Shared application state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Container metadata, read by the container keys middleware.
    pub metadata: Arc<dyn ContainerMetadataSource>,
    /// Objects served by the reference handlers.
    pub objects: ObjectStore,
    /// Identity auth settings.
    pub identity: Arc<IdentityConfig>,
    /// Maximum upload size in bytes.
    pub max_upload_size: usize,
    /// Prometheus metrics handle for rendering `/metrics` endpoint.
    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(metadata: impl ContainerMetadataSource + 'static, identity: IdentityConfig) -> Self {
        Self {
            metadata: Arc::new(metadata),
            objects: ObjectStore::new(),
            identity: Arc::new(identity),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            prometheus_handle: None,
        }
    }

    /// Sets the maximum upload size.
    pub fn with_max_upload_size(mut self, max_upload_size: usize) -> Self {
        self.max_upload_size = max_upload_size;
        self
    }

    /// Sets the Prometheus handle for rendering metrics.
    pub fn with_prometheus_handle(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus_handle = Some(handle);
        self
    }
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    // Layers run bottom-up: container keys, then identity auth.
    let storage_router = Router::new()
        .route(
            "/:version/:account/:container",
            get(handlers::container::list_objects).head(handlers::container::head_container),
        )
        .route(
            "/:version/:account/:container/*object",
            get(handlers::object::get_object)
                .head(handlers::object::head_object)
                .put(handlers::object::put_object)
                .delete(handlers::object::delete_object),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_auth_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            container_keys_middleware,
        ));

    Router::new()
        // Public endpoints
        .route("/info", get(handlers::info::info))
        .route("/metrics", get(handlers::info::prometheus_metrics))
        .merge(storage_router)
        .layer(DefaultBodyLimit::max(state.max_upload_size))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
