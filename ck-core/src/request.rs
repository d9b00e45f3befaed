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

//! Candidate keys presented by an incoming request.

use std::fmt;

use crate::keys::KeyClass;

/// Header carrying a candidate full key (lowercase, as HTTP header names compare).
pub const FULL_KEY_HEADER: &str = "x-container-meta-full-key";

/// Header carrying a candidate read key.
pub const READ_KEY_HEADER: &str = "x-container-meta-read-key";

/// The key headers found on one request.
///
/// Empty header values count as absent. `Debug` never prints the values.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct IncomingRequestKeys {
    full_key: Option<String>,
    read_key: Option<String>,
}

impl IncomingRequestKeys {
    /// Creates request keys, dropping empty values.
    pub fn new(full_key: Option<String>, read_key: Option<String>) -> Self {
        Self {
            full_key: full_key.filter(|v| !v.is_empty()),
            read_key: read_key.filter(|v| !v.is_empty()),
        }
    }

    /// Extracts request keys through a header lookup function.
    ///
    /// `lookup` receives the lowercase header name.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(lookup(FULL_KEY_HEADER), lookup(READ_KEY_HEADER))
    }

    /// Candidate full key.
    pub fn full_key(&self) -> Option<&str> {
        self.full_key.as_deref()
    }

    /// Candidate read key.
    pub fn read_key(&self) -> Option<&str> {
        self.read_key.as_deref()
    }

    /// Returns true if the request did not attempt key-based auth.
    pub fn is_empty(&self) -> bool {
        self.full_key.is_none() && self.read_key.is_none()
    }

    /// The key that gets evaluated: the full key when present, else the read key.
    pub fn presented(&self) -> Option<(KeyClass, &str)> {
        self.full_key()
            .map(|key| (KeyClass::Full, key))
            .or_else(|| self.read_key().map(|key| (KeyClass::Read, key)))
    }
}

impl fmt::Debug for IncomingRequestKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IncomingRequestKeys")
            .field("full_key", &self.full_key.as_ref().map(|_| "<redacted>"))
            .field("read_key", &self.read_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
