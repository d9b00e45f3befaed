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

//! Container metadata sources.
//!
//! The container keys middleware reads a container's raw metadata through
//! [`ContainerMetadataSource`] on every keyed request. Caching, if any, is the
//! source's business.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use ck_core::RawMetadata;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Errors returned by metadata sources.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// The container does not exist.
    #[error("Container not found: {account}/{container}")]
    ContainerNotFound {
        /// Account name.
        account: String,
        /// Container name.
        container: String,
    },

    /// A seed entry does not name `<account>/<container>`.
    #[error("Invalid container name: {0}")]
    InvalidContainerName(String),

    /// The backing service failed.
    #[error("Metadata backend error: {0}")]
    Backend(String),

    /// JSON decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supplies the raw metadata of a container.
#[async_trait]
pub trait ContainerMetadataSource: Send + Sync {
    /// Returns a snapshot of the container's metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::ContainerNotFound`] if the container does not
    /// exist, or another variant if the lookup itself failed.
    async fn container_metadata(
        &self,
        account: &str,
        container: &str,
    ) -> Result<RawMetadata, MetadataError>;
}

type ContainerId = (String, String);

/// In-memory metadata source.
///
/// Cheap to clone; clones share the same containers.
#[derive(Clone, Default)]
pub struct InMemoryMetadataSource {
    containers: Arc<RwLock<HashMap<ContainerId, RawMetadata>>>,
}

impl InMemoryMetadataSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON seed document.
    ///
    /// The document maps `"<account>/<container>"` to the container's metadata:
    ///
    /// ```json
    /// {
    ///   "AUTH_demo/photos": { "Read-Key": "viewer", "Full-Key": "owner" }
    /// }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, MetadataError> {
        let seed: HashMap<String, RawMetadata> = serde_json::from_str(json)?;

        let mut containers = HashMap::with_capacity(seed.len());
        for (name, metadata) in seed {
            let id = split_container_name(&name)?;
            containers.insert(id, metadata);
        }

        Ok(Self {
            containers: Arc::new(RwLock::new(containers)),
        })
    }

    /// Reads a JSON seed document from disk (see [`Self::from_json_str`]).
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MetadataError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let source = Self::from_json_str(&json)?;
        info!(
            "Loaded metadata for {} containers from {:?}",
            source.container_count().await,
            path
        );
        Ok(source)
    }

    /// Replaces the metadata of a container, creating it if needed.
    pub async fn set_container_metadata(
        &self,
        account: impl Into<String>,
        container: impl Into<String>,
        metadata: RawMetadata,
    ) {
        let id = (account.into(), container.into());
        debug!("Setting metadata for {}/{}", id.0, id.1);
        self.containers.write().await.insert(id, metadata);
    }

    /// Removes a container. Returns true if it existed.
    pub async fn remove_container(&self, account: &str, container: &str) -> bool {
        self.containers
            .write()
            .await
            .remove(&(account.to_string(), container.to_string()))
            .is_some()
    }

    /// Number of known containers.
    pub async fn container_count(&self) -> usize {
        self.containers.read().await.len()
    }
}

#[async_trait]
impl ContainerMetadataSource for InMemoryMetadataSource {
    async fn container_metadata(
        &self,
        account: &str,
        container: &str,
    ) -> Result<RawMetadata, MetadataError> {
        self.containers
            .read()
            .await
            .get(&(account.to_string(), container.to_string()))
            .cloned()
            .ok_or_else(|| MetadataError::ContainerNotFound {
                account: account.to_string(),
                container: container.to_string(),
            })
    }
}

fn split_container_name(name: &str) -> Result<ContainerId, MetadataError> {
    match name.split_once('/') {
        Some((account, container))
            if !account.is_empty() && !container.is_empty() && !container.contains('/') =>
        {
            Ok((account.to_string(), container.to_string()))
        }
        _ => Err(MetadataError::InvalidContainerName(name.to_string())),
    }
}
