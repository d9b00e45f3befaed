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

//! Request logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;
use ck_core::{FULL_KEY_HEADER, READ_KEY_HEADER};
use tracing::info;

use crate::error::X_TRANS_ID;

/// Logs one line per request: method, path, which key header was sent,
/// status, latency and the transaction id of error responses.
///
/// Only the path is logged; key values never are.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let key = key_header_kind(request.headers());
    let start = Instant::now();

    let response = next.run(request).await;

    let trans_id = response
        .headers()
        .get(X_TRANS_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    info!(
        "{} {} key={} -> {} in {:?} (trans {})",
        method,
        path,
        key,
        response.status(),
        start.elapsed(),
        trans_id
    );

    response
}

/// `full`, `read` or `none`, after the header the key check evaluates.
fn key_header_kind(headers: &HeaderMap) -> &'static str {
    let sent = |name: &str| headers.get(name).is_some_and(|v| !v.is_empty());
    if sent(FULL_KEY_HEADER) {
        "full"
    } else if sent(READ_KEY_HEADER) {
        "read"
    } else {
        "none"
    }
}
