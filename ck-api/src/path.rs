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

//! Container path parsing.
//!
//! Requests address storage as `/<version>/<account>/<container>[/<object>]`.

use std::fmt;

use percent_encoding::percent_decode_str;

/// A request path that names a container, and possibly an object in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerPath {
    /// API version segment (e.g. `v1`).
    pub version: String,
    /// Account name.
    pub account: String,
    /// Container name.
    pub container: String,
    /// Object name, if the path goes past the container.
    pub object: Option<String>,
}

impl ContainerPath {
    /// Parses a URI path.
    ///
    /// Segments are split on raw `/` and then percent-decoded the way axum
    /// decodes path parameters, so the container named here is the one the
    /// router hands to the handlers. Returns `None` for paths that stop
    /// above the container level (e.g. `/v1/AUTH_acct`) or whose segments do
    /// not decode to UTF-8.
    pub fn parse(path: &str) -> Option<Self> {
        let mut segments = path.strip_prefix('/').unwrap_or(path).splitn(4, '/');

        let version = decode_segment(non_empty(segments.next())?)?;
        let account = decode_segment(non_empty(segments.next())?)?;
        let container = decode_segment(non_empty(segments.next())?)?;
        let object = match non_empty(segments.next()) {
            Some(object) => Some(decode_segment(object)?),
            None => None,
        };

        Some(Self {
            version,
            account,
            container,
            object,
        })
    }

    /// Returns true if the path names an object rather than the container itself.
    pub fn is_object(&self) -> bool {
        self.object.is_some()
    }
}

impl fmt::Display for ContainerPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.account, self.container)?;
        if let Some(object) = &self.object {
            write!(f, "/{}", object)?;
        }
        Ok(())
    }
}

fn non_empty(segment: Option<&str>) -> Option<&str> {
    segment.filter(|s| !s.is_empty())
}

/// Decodes `%XX` escapes. Escapes that are not two hex digits stay literal.
fn decode_segment(segment: &str) -> Option<String> {
    percent_decode_str(segment)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}
