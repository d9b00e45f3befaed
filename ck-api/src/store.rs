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

//! In-memory object store behind the reference handlers.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::body::Bytes;
use tokio::sync::RwLock;

/// A stored object.
#[derive(Debug, Clone)]
pub struct StoredObject {
    /// Object data.
    pub data: Bytes,
    /// MIME type.
    pub content_type: String,
}

/// Objects keyed by `account/container/object`.
///
/// Cheap to clone; clones share the same objects.
#[derive(Debug, Clone, Default)]
pub struct ObjectStore {
    objects: Arc<RwLock<BTreeMap<String, StoredObject>>>,
}

impl ObjectStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores an object, replacing any previous version.
    pub async fn put(&self, account: &str, container: &str, object: &str, value: StoredObject) {
        self.objects
            .write()
            .await
            .insert(object_key(account, container, object), value);
    }

    /// Fetches an object.
    pub async fn get(&self, account: &str, container: &str, object: &str) -> Option<StoredObject> {
        self.objects
            .read()
            .await
            .get(&object_key(account, container, object))
            .cloned()
    }

    /// Deletes an object. Returns true if it existed.
    pub async fn delete(&self, account: &str, container: &str, object: &str) -> bool {
        self.objects
            .write()
            .await
            .remove(&object_key(account, container, object))
            .is_some()
    }

    /// Lists object names in a container, sorted.
    pub async fn list(&self, account: &str, container: &str) -> Vec<String> {
        let prefix = format!("{}/{}/", account, container);
        self.objects
            .read()
            .await
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, _)| key[prefix.len()..].to_string())
            .collect()
    }
}

fn object_key(account: &str, container: &str, object: &str) -> String {
    format!("{}/{}/{}", account, container, object)
}
