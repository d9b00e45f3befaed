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

//! Object operation handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::ensure_container;
use crate::error::ApiError;
use crate::server::AppState;
use crate::store::StoredObject;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

type ObjectPath = Path<(String, String, String, String)>;

/// Handler for `PUT /:version/:account/:container/*object`.
pub async fn put_object(
    State(state): State<AppState>,
    Path((_version, account, container, object)): ObjectPath,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    debug!("PutObject: {}/{}/{} ({} bytes)", account, container, object, body.len());

    if let Err(e) = ensure_container(&state, &account, &container).await {
        return e.into_response_for(&Method::PUT);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string();

    state
        .objects
        .put(
            &account,
            &container,
            &object,
            StoredObject {
                data: body,
                content_type,
            },
        )
        .await;

    StatusCode::CREATED.into_response()
}

/// Handler for `GET /:version/:account/:container/*object`.
pub async fn get_object(
    State(state): State<AppState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Response {
    debug!("GetObject: {}/{}/{}", account, container, object);
    read_object(&state, &Method::GET, &account, &container, &object).await
}

/// Handler for `HEAD /:version/:account/:container/*object`.
pub async fn head_object(
    State(state): State<AppState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Response {
    debug!("HeadObject: {}/{}/{}", account, container, object);
    read_object(&state, &Method::HEAD, &account, &container, &object).await
}

async fn read_object(
    state: &AppState,
    method: &Method,
    account: &str,
    container: &str,
    object: &str,
) -> Response {
    if let Err(e) = ensure_container(state, account, container).await {
        return e.into_response_for(method);
    }

    let Some(stored) = state.objects.get(account, container, object).await else {
        return ApiError::NoSuchObject.into_response_for(method);
    };

    let headers = [
        (header::CONTENT_TYPE, stored.content_type),
        (header::CONTENT_LENGTH, stored.data.len().to_string()),
    ];
    if *method == Method::HEAD {
        (StatusCode::OK, headers).into_response()
    } else {
        (StatusCode::OK, headers, stored.data).into_response()
    }
}

/// Handler for `DELETE /:version/:account/:container/*object`.
pub async fn delete_object(
    State(state): State<AppState>,
    Path((_version, account, container, object)): ObjectPath,
) -> Response {
    debug!("DeleteObject: {}/{}/{}", account, container, object);

    if let Err(e) = ensure_container(&state, &account, &container).await {
        return e.into_response_for(&Method::DELETE);
    }

    if state.objects.delete(&account, &container, &object).await {
        StatusCode::NO_CONTENT.into_response()
    } else {
        ApiError::NoSuchObject.into_response_for(&Method::DELETE)
    }
}
