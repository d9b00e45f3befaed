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

//! Authorization verdicts.
//!
//! [`decide`] is a one-shot classification with no state between calls:
//!
//! - no key header → [`Verdict::Defer`]
//! - key header, matching, method allowed → [`Verdict::Allow`]
//! - key header, not matching or method refused → [`Verdict::Deny`]

use std::fmt;

use crate::keys::{KeyClass, KeySet};
use crate::request::IncomingRequestKeys;

/// Methods a read key may authorize.
pub const READ_ONLY_METHODS: [&str; 2] = ["GET", "HEAD"];

/// Returns true for methods a read key may authorize.
///
/// Method names are case-sensitive, as in HTTP.
pub fn is_read_only_method(method: &str) -> bool {
    READ_ONLY_METHODS.contains(&method)
}

/// Why a presented key was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenyReason {
    /// The full key is not one of the container's full keys.
    FullKeyMismatch,
    /// The read key is not one of the container's read keys.
    ReadKeyMismatch,
    /// A read key was used with a mutating method.
    ReadKeyMutatingMethod,
}

impl DenyReason {
    /// Short label, used in logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::FullKeyMismatch => "full_key_mismatch",
            DenyReason::ReadKeyMismatch => "read_key_mismatch",
            DenyReason::ReadKeyMutatingMethod => "read_key_mutating_method",
        }
    }
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one request against a container's key set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// A key of the given class authorized the request; downstream auth is skipped.
    Allow(KeyClass),
    /// A key was presented and refused; the request ends with 401.
    Deny(DenyReason),
    /// No key was presented; the next auth stage decides.
    Defer,
}

impl Verdict {
    /// Returns true for [`Verdict::Allow`].
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow(_))
    }

    /// Returns true for [`Verdict::Deny`].
    pub fn is_deny(&self) -> bool {
        matches!(self, Verdict::Deny(_))
    }

    /// Returns true for [`Verdict::Defer`].
    pub fn is_defer(&self) -> bool {
        matches!(self, Verdict::Defer)
    }

    /// `allow`, `deny` or `defer`.
    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Allow(_) => "allow",
            Verdict::Deny(_) => "deny",
            Verdict::Defer => "defer",
        }
    }

    /// Key class for ALLOW, deny reason for DENY, `none` for DEFER.
    pub fn reason(&self) -> &'static str {
        match self {
            Verdict::Allow(class) => class.as_str(),
            Verdict::Deny(reason) => reason.as_str(),
            Verdict::Defer => "none",
        }
    }
}

/// Decides whether the presented keys authorize `method` on a container.
///
/// A full key short-circuits: the read key header is then never consulted.
/// A read key with a mutating method is refused without looking at its value.
pub fn decide(method: &str, headers: &IncomingRequestKeys, keys: &KeySet) -> Verdict {
    if let Some(full_key) = headers.full_key() {
        return if keys.contains(KeyClass::Full, full_key) {
            Verdict::Allow(KeyClass::Full)
        } else {
            Verdict::Deny(DenyReason::FullKeyMismatch)
        };
    }

    if let Some(read_key) = headers.read_key() {
        if !is_read_only_method(method) {
            return Verdict::Deny(DenyReason::ReadKeyMutatingMethod);
        }
        return if keys.contains(KeyClass::Read, read_key) {
            Verdict::Allow(KeyClass::Read)
        } else {
            Verdict::Deny(DenyReason::ReadKeyMismatch)
        };
    }

    Verdict::Defer
}
