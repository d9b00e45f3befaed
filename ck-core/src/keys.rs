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

//! Container key classes and key sets.
//!
//! A container declares its keys as metadata fields named `Full-Key`,
//! `Full-Key-<suffix>`, `Read-Key` or `Read-Key-<suffix>`. Suffixes only
//! allow several keys of the same class to coexist; they carry no order.

use std::collections::{HashMap, HashSet};
use std::fmt;

use subtle::{Choice, ConstantTimeEq};

/// Raw metadata of one container, as returned by the metadata service.
pub type RawMetadata = HashMap<String, String>;

/// Metadata field name of a full key.
pub const FULL_KEY: &str = "Full-Key";

/// Metadata field name of a read key.
pub const READ_KEY: &str = "Read-Key";

/// Class of a container key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyClass {
    /// Authorizes every HTTP method, including mutating ones.
    Full,
    /// Authorizes read-only methods (GET, HEAD) only.
    Read,
}

impl KeyClass {
    /// Both classes, full first.
    pub const ALL: [KeyClass; 2] = [KeyClass::Full, KeyClass::Read];

    /// Base metadata field name for this class.
    pub fn metadata_field(&self) -> &'static str {
        match self {
            KeyClass::Full => FULL_KEY,
            KeyClass::Read => READ_KEY,
        }
    }

    /// Short lowercase label, used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyClass::Full => "full",
            KeyClass::Read => "read",
        }
    }

    /// Classifies a metadata field name.
    ///
    /// Matching is case-sensitive. `Full-Key` and `Full-Key-<suffix>` are full
    /// keys, `Read-Key` and `Read-Key-<suffix>` are read keys. A trailing dash
    /// with no suffix (`Full-Key-`) is not a key field.
    pub fn from_metadata_field(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|class| is_key_field(name, class.metadata_field()))
    }
}

impl fmt::Display for KeyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_key_field(name: &str, base: &str) -> bool {
    match name.strip_prefix(base) {
        Some("") => true,
        Some(rest) => rest.strip_prefix('-').is_some_and(|suffix| !suffix.is_empty()),
        None => false,
    }
}

/// The full and read keys currently valid for one container.
///
/// Built once per request from a metadata snapshot and never mutated.
/// `Debug` only reports how many keys each class holds.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct KeySet {
    full: HashSet<String>,
    read: HashSet<String>,
}

impl KeySet {
    /// Builds the key set from a container's raw metadata.
    ///
    /// Never fails: fields that are not key fields are ignored and empty values
    /// are skipped, so a cleared key stops authorizing immediately.
    pub fn from_metadata(metadata: &RawMetadata) -> Self {
        Self::from_fields(metadata.iter().map(|(name, value)| (name.as_str(), value.as_str())))
    }

    /// Builds the key set from `(field name, value)` pairs.
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        fields.into_iter().fold(Self::default(), |mut keys, (name, value)| {
            if value.is_empty() {
                return keys;
            }
            match KeyClass::from_metadata_field(name) {
                Some(KeyClass::Full) => {
                    keys.full.insert(value.to_string());
                }
                Some(KeyClass::Read) => {
                    keys.read.insert(value.to_string());
                }
                None => {}
            }
            keys
        })
    }

    /// Full keys.
    pub fn full(&self) -> &HashSet<String> {
        &self.full
    }

    /// Read keys.
    pub fn read(&self) -> &HashSet<String> {
        &self.read
    }

    /// Keys of the given class.
    pub fn keys(&self, class: KeyClass) -> &HashSet<String> {
        match class {
            KeyClass::Full => &self.full,
            KeyClass::Read => &self.read,
        }
    }

    /// Returns true if the container declares no keys at all.
    pub fn is_empty(&self) -> bool {
        self.full.is_empty() && self.read.is_empty()
    }

    /// Checks whether `candidate` is one of the keys of `class`.
    ///
    /// Every stored key is compared in constant time; the scan never stops early.
    pub fn contains(&self, class: KeyClass, candidate: &str) -> bool {
        let candidate = candidate.as_bytes();
        self.keys(class)
            .iter()
            .fold(Choice::from(0), |found, key| found | key.as_bytes().ct_eq(candidate))
            .into()
    }
}

impl fmt::Debug for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("full", &self.full.len())
            .field("read", &self.read.len())
            .finish()
    }
}
