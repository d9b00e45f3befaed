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

//! Container listing handlers.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::ensure_container;
use crate::server::AppState;

/// Object count header on container HEAD responses.
pub const X_CONTAINER_OBJECT_COUNT: HeaderName =
    HeaderName::from_static("x-container-object-count");

/// Handler for `GET /:version/:account/:container`.
///
/// Lists object names, one per line. An empty container answers 204.
pub async fn list_objects(
    State(state): State<AppState>,
    Path((_version, account, container)): Path<(String, String, String)>,
) -> Response {
    debug!("ListObjects: {}/{}", account, container);

    if let Err(e) = ensure_container(&state, &account, &container).await {
        return e.into_response_for(&Method::GET);
    }

    let names = state.objects.list(&account, &container).await;
    if names.is_empty() {
        return StatusCode::NO_CONTENT.into_response();
    }

    let mut body = names.join("\n");
    body.push('\n');
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Handler for `HEAD /:version/:account/:container`.
pub async fn head_container(
    State(state): State<AppState>,
    Path((_version, account, container)): Path<(String, String, String)>,
) -> Response {
    if let Err(e) = ensure_container(&state, &account, &container).await {
        return e.into_response_for(&Method::HEAD);
    }

    let count = state.objects.list(&account, &container).await.len();
    (
        StatusCode::NO_CONTENT,
        [(X_CONTAINER_OBJECT_COUNT, count.to_string())],
    )
        .into_response()
}
