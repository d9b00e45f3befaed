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

//! HTTP request handlers.

pub mod container;
pub mod info;
pub mod object;

use crate::error::ApiError;
use crate::metadata::MetadataError;
use crate::server::AppState;

/// Fails with [`ApiError::NoSuchContainer`] unless the container exists.
pub(crate) async fn ensure_container(
    state: &AppState,
    account: &str,
    container: &str,
) -> Result<(), ApiError> {
    match state.metadata.container_metadata(account, container).await {
        Ok(_) => Ok(()),
        Err(MetadataError::ContainerNotFound { .. }) => Err(ApiError::NoSuchContainer),
        Err(e) => {
            tracing::error!("Metadata lookup for {}/{} failed: {}", account, container, e);
            Err(ApiError::Internal(e.to_string()))
        }
    }
}
