use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: Defaults,
    pub backends: Vec<BackendConfig>,
}

/// Workspace-wide defaults; per-backend fields override these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Module the UI selects at startup.
    pub default_module: String,
    /// Request timeout in milliseconds (default: 30000).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Retry budget advertised to callers (default: 3).
    ///
    /// The client layer never retries; this is carried for query layers
    /// that own retry policy.
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
}

/// Connection configuration for one remote backend service.
///
/// Immutable after load; one instance per backend key for the process
/// lifetime. A disabled backend gets no client and is unaddressable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Unique identifier (e.g., "weather", "finance").
    pub name: String,
    /// Base URL for the service (e.g., "https://weather.internal:8101").
    pub url: String,
    /// API version tag, sent as `X-API-Version` on every request.
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-backend timeout override in milliseconds.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// Per-backend retry budget override.
    #[serde(default)]
    pub retry_count: Option<u32>,
    /// Path of the service's health endpoint.
    #[serde(default = "default_health_endpoint")]
    pub health_endpoint: String,
    /// Feature flags the UI uses to build module views.
    #[serde(default)]
    pub features: BTreeSet<String>,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_retry_count() -> u32 {
    3
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_enabled() -> bool {
    true
}

fn default_health_endpoint() -> String {
    "/health".to_string()
}

impl BackendConfig {
    /// Effective request timeout for this backend.
    pub fn effective_timeout_ms(&self, defaults: &Defaults) -> u64 {
        self.timeout_ms.unwrap_or(defaults.timeout_ms)
    }

    /// Effective retry budget for this backend.
    pub fn effective_retry_count(&self, defaults: &Defaults) -> u32 {
        self.retry_count.unwrap_or(defaults.retry_count)
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            default_module: "weather".to_string(),
            timeout_ms: default_timeout_ms(),
            retry_count: default_retry_count(),
        }
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            name: "weather".to_string(),
            url: "http://127.0.0.1:8101".to_string(),
            version: default_version(),
            enabled: true,
            timeout_ms: None,
            retry_count: None,
            health_endpoint: default_health_endpoint(),
            features: BTreeSet::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            defaults: Defaults::default(),
            backends: vec![BackendConfig::default()],
        }
    }
}
