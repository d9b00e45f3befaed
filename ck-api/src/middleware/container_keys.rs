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

//! Container keys middleware.
//!
//! Grants access to a container based on the static full / read keys stored
//! in its metadata, ahead of identity-based authentication:
//!
//! - `X-Container-Meta-Full-Key` authorizes every method.
//! - `X-Container-Meta-Read-Key` authorizes GET and HEAD only.
//!
//! Whichever header is supplied is checked (the full key wins if both are).
//! A refused key ends the request with `401 Unauthorized: Auth Key invalid`.
//! Without a key header the request continues to the next auth stage.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;
use ck_core::{decide, IncomingRequestKeys, KeyClass, KeySet, RawMetadata, Verdict};
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::metadata::{ContainerMetadataSource, MetadataError};
use crate::middleware::metrics::record_verdict;
use crate::path::ContainerPath;
use crate::server::AppState;

/// Request extension set when a container key authorized the request.
///
/// Downstream auth stages must let such requests through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAuthorization {
    /// Class of the key that matched.
    pub class: KeyClass,
    /// Account of the authorized container.
    pub account: String,
    /// Authorized container.
    pub container: String,
}

/// Result of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvaluation {
    /// The verdict.
    pub verdict: Verdict,
    /// The container the request addressed, if any.
    pub container: Option<ContainerPath>,
}

impl KeyEvaluation {
    fn defer() -> Self {
        Self {
            verdict: Verdict::Defer,
            container: None,
        }
    }

    /// The extension to attach when the verdict is ALLOW.
    pub fn authorization(&self) -> Option<KeyAuthorization> {
        match (&self.verdict, &self.container) {
            (Verdict::Allow(class), Some(path)) => Some(KeyAuthorization {
                class: *class,
                account: path.account.clone(),
                container: path.container.clone(),
            }),
            _ => None,
        }
    }
}

/// Extracts the candidate keys from request headers.
///
/// Values that are not valid UTF-8 are decoded lossily: the header still
/// counts as presented but cannot match a stored key.
pub fn request_keys(headers: &HeaderMap) -> IncomingRequestKeys {
    IncomingRequestKeys::from_lookup(|name| {
        headers
            .get(name)
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
    })
}

/// Evaluates a request against the keys of the container it addresses.
///
/// Metadata is only fetched when the request carries a key header and its
/// path names a container. A missing container or a failing metadata source
/// yields an empty key set, so any presented key is refused.
pub async fn evaluate_request(
    source: &dyn ContainerMetadataSource,
    method: &Method,
    uri_path: &str,
    headers: &HeaderMap,
) -> KeyEvaluation {
    let presented = request_keys(headers);
    if presented.is_empty() {
        return KeyEvaluation::defer();
    }

    let Some(path) = ContainerPath::parse(uri_path) else {
        debug!(target: "containerkeys", path = uri_path, "Key presented outside a container path");
        return KeyEvaluation::defer();
    };

    let metadata = fetch_metadata(source, &path).await;
    let keys = KeySet::from_metadata(&metadata);
    let verdict = decide(method.as_str(), &presented, &keys);

    KeyEvaluation {
        verdict,
        container: Some(path),
    }
}

async fn fetch_metadata(source: &dyn ContainerMetadataSource, path: &ContainerPath) -> RawMetadata {
    match source.container_metadata(&path.account, &path.container).await {
        Ok(metadata) => metadata,
        Err(MetadataError::ContainerNotFound { .. }) => {
            debug!(target: "containerkeys", container = %path, "Container not found");
            RawMetadata::new()
        }
        Err(e) => {
            warn!(target: "containerkeys", container = %path, "Metadata lookup failed: {}", e);
            RawMetadata::new()
        }
    }
}

/// Container keys middleware.
///
/// Runs before the identity auth stage:
/// - ALLOW: attaches [`KeyAuthorization`] and forwards the request.
/// - DENY: responds `401 Unauthorized` (empty body for HEAD).
/// - DEFER: forwards the request unchanged.
pub async fn container_keys_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri_path = request.uri().path().to_string();
    let headers = request.headers().clone();

    let evaluation = evaluate_request(state.metadata.as_ref(), &method, &uri_path, &headers).await;
    record_verdict(&evaluation.verdict);

    match evaluation.verdict {
        Verdict::Allow(class) => {
            debug!(target: "containerkeys", %method, path = %uri_path, key = %class, "Container key accepted");
            if let Some(authorization) = evaluation.authorization() {
                request.extensions_mut().insert(authorization);
            }
            next.run(request).await
        }
        Verdict::Deny(reason) => {
            warn!(target: "containerkeys", %method, path = %uri_path, %reason, "Container key refused");
            ApiError::KeyInvalid.into_response_for(&method)
        }
        Verdict::Defer => {
            debug!(target: "containerkeys", %method, path = %uri_path, "No container key, deferring");
            next.run(request).await
        }
    }
}
