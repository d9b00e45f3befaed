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

//! API error types and responses.
//!
//! Errors render as a plain-text status line, e.g.
//! `401 Unauthorized: Auth Key invalid`, with an `x-trans-id` header.

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Transaction id header attached to every error response.
pub const X_TRANS_ID: HeaderName = HeaderName::from_static("x-trans-id");

/// API errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A container key was presented and refused.
    #[error("Auth Key invalid")]
    KeyInvalid,

    /// The identity auth stage refused the request.
    #[error("Authentication required")]
    Unauthorized,

    /// The container does not exist.
    #[error("The specified container does not exist")]
    NoSuchContainer,

    /// The object does not exist.
    #[error("The specified object does not exist")]
    NoSuchObject,

    /// The request path does not address a container or object.
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No metrics recorder is installed.
    #[error("Metrics disabled")]
    MetricsDisabled,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::KeyInvalid => StatusCode::UNAUTHORIZED,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NoSuchContainer => StatusCode::NOT_FOUND,
            ApiError::NoSuchObject => StatusCode::NOT_FOUND,
            ApiError::InvalidPath(_) => StatusCode::BAD_REQUEST,
            ApiError::MetricsDisabled => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Response body: `<code> <reason>: <message>` followed by a newline.
    pub fn body(&self) -> String {
        let status = self.status_code();
        format!(
            "{} {}: {}\n",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error"),
            self
        )
    }

    /// Builds the response for a request made with `method`.
    ///
    /// HEAD responses carry no body.
    pub fn into_response_for(self, method: &Method) -> Response {
        let body = if *method == Method::HEAD {
            String::new()
        } else {
            self.body()
        };

        (
            self.status_code(),
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (X_TRANS_ID, Uuid::new_v4().to_string()),
            ],
            body,
        )
            .into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.into_response_for(&Method::GET)
    }
}
