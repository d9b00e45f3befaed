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

//! Configuration management for the container keys server.
//!
//! Every setting comes from a `CK_*` environment variable.

use ck_api::DEFAULT_MAX_UPLOAD_SIZE;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Where container metadata comes from
    pub metadata: MetadataConfig,
    /// Identity auth stage settings
    pub identity: IdentityAuthConfig,
    /// Metrics and monitoring configuration
    pub metrics: MetricsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    /// Can be set via CK_BIND environment variable.
    pub bind: String,
    /// Maximum upload size in bytes.
    /// Can be set via CK_MAX_UPLOAD_SIZE environment variable (e.g., "5GB", "100MB").
    pub max_upload_size: usize,
}

/// Container metadata configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// JSON seed file mapping `account/container` to metadata.
    /// Can be set via CK_METADATA_FILE environment variable.
    pub file: Option<PathBuf>,
}

/// Identity auth configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct IdentityAuthConfig {
    /// Accepted `X-Auth-Token` values.
    /// Can be set via CK_AUTH_TOKENS (comma-separated).
    pub tokens: Vec<String>,
    /// Let every request past identity auth.
    /// Can be set via CK_DISABLE_IDENTITY_AUTH.
    pub disabled: bool,
}

impl std::fmt::Debug for IdentityAuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityAuthConfig")
            .field("tokens", &self.tokens.len())
            .field("disabled", &self.disabled)
            .finish()
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    pub prometheus_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: std::env::var("CK_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
            max_upload_size: std::env::var("CK_MAX_UPLOAD_SIZE")
                .ok()
                .and_then(|s| parse_size(&s).ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_SIZE),
        }
    }
}

impl MetadataConfig {
    fn from_env() -> Self {
        Self {
            file: std::env::var("CK_METADATA_FILE").ok().map(PathBuf::from),
        }
    }
}

impl IdentityAuthConfig {
    fn from_env() -> Self {
        Self {
            tokens: std::env::var("CK_AUTH_TOKENS")
                .map(|s| parse_tokens(&s))
                .unwrap_or_default(),
            disabled: env_flag("CK_DISABLE_IDENTITY_AUTH", false),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            prometheus_enabled: env_flag("CK_METRICS_ENABLED", true),
        }
    }
}

impl Config {
    /// Loads configuration from the environment.
    pub fn load() -> anyhow::Result<Self> {
        let config = Self::default();
        config.validate().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;
        Ok(config)
    }

    /// Checks settings that would only fail later at startup.
    pub fn validate(&self) -> Result<(), String> {
        self.server
            .bind
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid bind address {:?}: {}", self.server.bind, e))?;
        if self.server.max_upload_size == 0 {
            return Err("Maximum upload size must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::from_env(),
            identity: IdentityAuthConfig::from_env(),
            metrics: MetricsConfig::default(),
        }
    }
}

/// Parses a size string like "10GB", "100MB", "1024KB", "5000" into bytes.
///
/// Supported suffixes (case-insensitive):
/// - GB, G: Gigabytes
/// - MB, M: Megabytes
/// - KB, K: Kilobytes
/// - B or no suffix: Bytes
pub fn parse_size(s: &str) -> Result<usize, String> {
    let s = s.trim().to_uppercase();

    if s.is_empty() {
        return Err("Empty size string".to_string());
    }

    let num_end = s.chars().position(|c| !c.is_ascii_digit() && c != '.').unwrap_or(s.len());
    let (num_str, suffix) = s.split_at(num_end);

    let num: f64 = num_str.parse().map_err(|_| format!("Invalid number: {}", num_str))?;

    let multiplier: usize = match suffix.trim() {
        "GB" | "G" => 1024 * 1024 * 1024,
        "MB" | "M" => 1024 * 1024,
        "KB" | "K" => 1024,
        "B" | "" => 1,
        other => return Err(format!("Unknown size suffix: {}", other)),
    };

    Ok((num * multiplier as f64) as usize)
}

/// Splits a comma-separated token list, dropping blanks.
pub fn parse_tokens(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name).map(|s| parse_flag(&s)).unwrap_or(default)
}

fn parse_flag(s: &str) -> bool {
    s.eq_ignore_ascii_case("true") || s == "1"
}
