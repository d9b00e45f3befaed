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

//! Metrics middleware for recording HTTP request and verdict metrics.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use ck_core::Verdict;
use std::time::Instant;

/// Middleware that records HTTP request count and latency metrics.
///
/// Records two metrics via the `metrics` crate:
/// - `http_requests_total` (counter): labeled by method, status and path.
/// - `http_request_duration_seconds` (histogram): request latency, labeled by method and path.
///
/// Path labels are normalized to avoid high cardinality (account, container
/// and object names are replaced with placeholders).
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    metrics::counter!("http_requests_total", "method" => method.clone(), "status" => status, "path" => path)
        .increment(1);
    metrics::histogram!("http_request_duration_seconds", "method" => method, "path" => path)
        .record(duration);

    response
}

/// Counts one container keys verdict.
///
/// `container_keys_verdicts_total` is labeled by verdict and by reason: the
/// key class for ALLOW, the refusal reason for DENY, `none` for DEFER.
pub fn record_verdict(verdict: &Verdict) {
    metrics::counter!(
        "container_keys_verdicts_total",
        "verdict" => verdict.label(),
        "reason" => verdict.reason()
    )
    .increment(1);
}

/// Normalizes request paths to avoid label cardinality explosion.
///
/// - `/`, `/info`, `/metrics` → kept as-is
/// - `/{version}/{account}[/{container}[/{object}]]` by depth
/// - anything shallower → `/other`
fn normalize_path(path: &str) -> &'static str {
    match path {
        "/" => return "/",
        "/info" => return "/info",
        "/metrics" => return "/metrics",
        _ => {}
    }

    let depth = path
        .trim_matches('/')
        .splitn(4, '/')
        .filter(|s| !s.is_empty())
        .count();
    match depth {
        2 => "/{version}/{account}",
        3 => "/{version}/{account}/{container}",
        4 => "/{version}/{account}/{container}/{object}",
        _ => "/other",
    }
}
