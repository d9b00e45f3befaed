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

//! Container Keys API Layer - HTTP integration
//!
//! This crate wires the container keys decision engine into an axum pipeline:
//! - Container metadata sources (trait + in-memory implementation)
//! - Swift-style container path parsing
//! - The container keys middleware and the downstream identity auth stage
//! - Reference object handlers the pipeline forwards to
//! - Middleware for logging and metrics

pub mod error;
pub mod handlers;
pub mod metadata;
pub mod middleware;
pub mod path;
pub mod server;
pub mod store;

pub use error::ApiError;
pub use metadata::{ContainerMetadataSource, InMemoryMetadataSource, MetadataError};
pub use middleware::{evaluate_request, IdentityConfig, KeyAuthorization, KeyEvaluation};
pub use path::ContainerPath;
pub use server::{create_router, AppState, DEFAULT_MAX_UPLOAD_SIZE};
pub use store::ObjectStore;
