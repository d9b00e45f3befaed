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

//! Identity auth middleware.
//!
//! Stand-in for the token-based auth stage that follows container keys.
//! Requests already authorized by a container key pass straight through.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::middleware::container_keys::KeyAuthorization;
use crate::server::AppState;

/// Header carrying the identity token.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Accepted identity tokens.
#[derive(Clone, Default)]
pub struct IdentityConfig {
    tokens: Vec<String>,
    disabled: bool,
}

impl IdentityConfig {
    /// Accepts any of `tokens`. Empty tokens are ignored.
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        Self {
            tokens: tokens.into_iter().filter(|t| !t.is_empty()).collect(),
            disabled: false,
        }
    }

    /// Lets every request through.
    pub fn disabled() -> Self {
        Self {
            tokens: Vec::new(),
            disabled: true,
        }
    }

    /// Returns true if identity auth is turned off.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Number of configured tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Checks a presented token against every configured token.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate = candidate.as_bytes();
        let matched = self
            .tokens
            .iter()
            .fold(subtle::Choice::from(0), |acc, token| {
                acc | token.as_bytes().ct_eq(candidate)
            });
        bool::from(matched)
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("tokens", &self.tokens.len())
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// Identity auth middleware.
///
/// Skips requests carrying a [`KeyAuthorization`]; otherwise requires a
/// valid `X-Auth-Token`.
pub async fn identity_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let authorization = request.extensions().get::<KeyAuthorization>().cloned();
    if let Some(authorization) = authorization {
        debug!(
            "Authorized by {} key for {}/{}",
            authorization.class, authorization.account, authorization.container
        );
        return next.run(request).await;
    }

    if state.identity.is_disabled() {
        return next.run(request).await;
    }

    let verified = request
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .map(|v| v.to_str().is_ok_and(|token| state.identity.verify(token)));

    match verified {
        Some(true) => next.run(request).await,
        Some(false) => {
            warn!("Invalid auth token for {} {}", request.method(), request.uri().path());
            ApiError::Unauthorized.into_response_for(request.method())
        }
        None => {
            debug!("Missing auth token for {} {}", request.method(), request.uri().path());
            ApiError::Unauthorized.into_response_for(request.method())
        }
    }
}
