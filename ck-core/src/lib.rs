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

//! Container Keys Core - key sets and the authorization verdict engine
//!
//! This crate provides the framework-free part of container keys:
//! - Classification of container metadata fields into full / read keys
//! - Key sets built from a container's raw metadata
//! - Candidate keys presented by an incoming request
//! - The ALLOW / DENY / DEFER decision over method, request keys and key set
//!
//! Nothing here performs I/O or fails. The HTTP integration lives in `ck-api`.

pub mod keys;
pub mod request;
pub mod verdict;

pub use keys::{KeyClass, KeySet, RawMetadata, FULL_KEY, READ_KEY};
pub use request::{IncomingRequestKeys, FULL_KEY_HEADER, READ_KEY_HEADER};
pub use verdict::{decide, is_read_only_method, DenyReason, Verdict, READ_ONLY_METHODS};
