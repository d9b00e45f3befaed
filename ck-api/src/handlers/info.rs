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

//! Public endpoints: capability discovery and Prometheus metrics.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use ck_core::{FULL_KEY_HEADER, READ_KEY_HEADER, READ_ONLY_METHODS};
use serde::Serialize;

use crate::error::ApiError;
use crate::server::AppState;

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Container keys capabilities.
#[derive(Debug, Serialize)]
pub struct ContainerKeysInfo {
    /// Header carrying a full key.
    pub full_key_header: &'static str,
    /// Header carrying a read key.
    pub read_key_header: &'static str,
    /// Methods a read key authorizes.
    pub read_only_methods: Vec<&'static str>,
}

/// Body of `GET /info`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    /// Container keys section.
    pub containerkeys: ContainerKeysInfo,
}

/// Handler for `GET /info`.
pub async fn info() -> Json<InfoResponse> {
    Json(InfoResponse {
        containerkeys: ContainerKeysInfo {
            full_key_header: FULL_KEY_HEADER,
            read_key_header: READ_KEY_HEADER,
            read_only_methods: READ_ONLY_METHODS.to_vec(),
        },
    })
}

/// Handler for `GET /metrics`.
///
/// Renders the installed Prometheus recorder, or 503 when there is none.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    let Some(handle) = &state.prometheus_handle else {
        return ApiError::MetricsDisabled.into_response();
    };
    ([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], handle.render()).into_response()
}
