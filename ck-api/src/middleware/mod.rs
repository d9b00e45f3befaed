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

//! HTTP middleware.

pub mod container_keys;
pub mod identity_auth;
pub mod logging;
pub mod metrics;

pub use self::container_keys::{
    container_keys_middleware, evaluate_request, request_keys, KeyAuthorization, KeyEvaluation,
};
pub use self::identity_auth::{identity_auth_middleware, IdentityConfig, AUTH_TOKEN_HEADER};
pub use self::logging::logging_middleware;
pub use self::metrics::{metrics_middleware, record_verdict};
