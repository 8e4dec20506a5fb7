//! Ownership and mediation of all outbound backend calls.
//!
//! One HTTP client per enabled backend, a per-backend health flag mutated
//! only by health checks, and bearer tokens injected from a caller-supplied
//! [`TokenStore`]. Every failure is normalized into [`ApiError`] before it
//! reaches a caller.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use parking_lot::RwLock;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::client::error::{ApiError, ErrorDetails};
use crate::client::response::{ApiResponse, HealthCheckResponse};
use crate::client::token::TokenStore;
use crate::clock::now_millis;
use crate::config::{BackendConfig, Config};

/// Fixed client identifier sent as `X-Client` on every request.
const CLIENT_TAG: &str = "ui-workspace";

/// One live HTTP client bound to an enabled backend's configuration.
struct ClientEntry {
    config: BackendConfig,
    http: reqwest::Client,
    timeout_ms: u64,
}

impl ClientEntry {
    fn build(config: &BackendConfig, timeout_ms: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .expect("Failed to build backend HTTP client");

        Self {
            config: config.clone(),
            http,
            timeout_ms,
        }
    }
}

/// Owns one HTTP client per enabled backend and mediates all outbound calls.
///
/// Constructed explicitly and shared by reference (or `Arc`); there is no
/// process-wide singleton. The client map and health map are mutated only
/// by `refresh_clients` and `health_check`; everything else is a read.
pub struct ClientManager {
    clients: RwLock<HashMap<String, ClientEntry>>,
    health: RwLock<BTreeMap<String, bool>>,
    tokens: Arc<dyn TokenStore>,
}

impl ClientManager {
    /// Build clients for every enabled backend in `config`.
    ///
    /// Disabled backends get no client and are unaddressable afterwards:
    /// every operation against them fails with [`ApiError::NotConfigured`].
    pub fn new(config: &Config, tokens: Arc<dyn TokenStore>) -> Self {
        let manager = Self {
            clients: RwLock::new(HashMap::new()),
            health: RwLock::new(BTreeMap::new()),
            tokens,
        };
        manager.refresh_clients(config);
        manager
    }

    /// Discard all clients and health state, then re-initialize from `config`.
    ///
    /// Used when configuration changes at runtime (for example after
    /// [`crate::ConfigStore::reload`]).
    pub fn refresh_clients(&self, config: &Config) {
        let mut clients = HashMap::new();
        for backend in config.backends.iter().filter(|b| b.enabled) {
            let timeout_ms = backend.effective_timeout_ms(&config.defaults);
            clients.insert(backend.name.clone(), ClientEntry::build(backend, timeout_ms));
        }

        tracing::info!(backends = clients.len(), "Initialized backend clients");

        *self.clients.write() = clients;
        self.health.write().clear();
    }

    /// Send a request to an enabled backend, returning the JSON body.
    pub async fn request(
        &self,
        backend: &str,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse<Value>, ApiError> {
        self.request_as(backend, method, endpoint, body).await
    }

    /// Send a request to an enabled backend, decoding the body as `T`.
    ///
    /// The pipeline applied to every call: attach the stored bearer token
    /// when one exists for the key; on HTTP 401 evict that token and fail
    /// `Unauthorized` (health state untouched); classify transport errors
    /// into `Timeout` / `ConnectionRefused`; other non-2xx become `Http`.
    pub async fn request_as<T: DeserializeOwned>(
        &self,
        backend: &str,
        method: Method,
        endpoint: &str,
        body: Option<&Value>,
    ) -> Result<ApiResponse<T>, ApiError> {
        let (http, config, timeout_ms) = {
            let clients = self.clients.read();
            let entry = clients.get(backend).ok_or_else(|| ApiError::NotConfigured {
                backend: backend.to_string(),
            })?;
            (entry.http.clone(), entry.config.clone(), entry.timeout_ms)
        };

        let url = join_url(&config.url, endpoint);
        let request_id = Uuid::new_v4().to_string();
        let details = ErrorDetails {
            backend: backend.to_string(),
            url: url.clone(),
            method: method.to_string(),
            request_id: request_id.clone(),
            original: None,
        };

        let mut builder = http
            .request(method, url.as_str())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .header("X-API-Version", &config.version)
            .header("X-Client", CLIENT_TAG)
            .header("X-Request-Id", &request_id);

        if let Some(token) = self.tokens.get(backend) {
            builder = builder.bearer_auth(token.expose());
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(backend, %url, %request_id, "Dispatching backend request");

        let response = match builder.send().await {
            Ok(response) => response,
            Err(source) => {
                let details = ErrorDetails {
                    original: Some(source.to_string()),
                    ..details
                };
                return Err(if source.is_timeout() {
                    ApiError::Timeout {
                        details,
                        timeout_ms,
                    }
                } else {
                    ApiError::ConnectionRefused { details, source }
                });
            }
        };

        let status = response.status();

        if status.as_u16() == 401 {
            self.tokens.remove(backend);
            tracing::warn!(backend, %request_id, "Backend returned 401, evicting stored token");
            return Err(ApiError::Unauthorized { details });
        }

        if !status.is_success() {
            let body = response.text().await.ok().filter(|b| !b.is_empty());
            return Err(ApiError::Http {
                details,
                status: status.as_u16(),
                body,
            });
        }

        let data = response.json::<T>().await.map_err(|source| ApiError::Decode {
            details,
            source,
        })?;

        Ok(ApiResponse {
            data,
            status: status.as_u16(),
            message: None,
            timestamp: now_millis(),
        })
    }

    /// Check one backend's health endpoint.
    ///
    /// Success sets that backend's health flag true; any failure sets it
    /// false and surfaces the normalized error. This is the only place a
    /// single backend's health state mutates.
    pub async fn health_check(&self, backend: &str) -> Result<HealthCheckResponse, ApiError> {
        let endpoint = {
            let clients = self.clients.read();
            let entry = clients.get(backend).ok_or_else(|| ApiError::NotConfigured {
                backend: backend.to_string(),
            })?;
            entry.config.health_endpoint.clone()
        };

        match self
            .request_as::<HealthCheckResponse>(backend, Method::GET, &endpoint, None)
            .await
        {
            Ok(response) => {
                self.health.write().insert(backend.to_string(), true);
                Ok(response.data)
            }
            Err(err) => {
                self.health.write().insert(backend.to_string(), false);
                tracing::warn!(backend, code = err.code(), "Health check failed");
                Err(err)
            }
        }
    }

    /// Check every enabled backend concurrently and independently.
    ///
    /// A settle-all join: one backend's failure or timeout never aborts or
    /// delays another's result, and the aggregate call itself cannot fail.
    pub async fn health_check_all(
        &self,
    ) -> BTreeMap<String, Result<HealthCheckResponse, ApiError>> {
        let keys: Vec<String> = {
            let clients = self.clients.read();
            let mut keys: Vec<String> = clients.keys().cloned().collect();
            keys.sort();
            keys
        };

        let checks = keys.iter().map(|key| self.health_check(key));
        let settled = join_all(checks).await;

        keys.into_iter().zip(settled).collect()
    }

    /// Last-known health of one backend; false until its first check.
    ///
    /// Pure read, possibly stale; callers re-poll via `health_check`.
    pub fn is_backend_healthy(&self, backend: &str) -> bool {
        self.health.read().get(backend).copied().unwrap_or(false)
    }

    /// Backends whose last health check succeeded, sorted by key.
    pub fn healthy_backends(&self) -> Vec<String> {
        self.health
            .read()
            .iter()
            .filter(|(_, healthy)| **healthy)
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Keys with a live client, sorted.
    pub fn known_backends(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.clients.read().keys().cloned().collect();
        keys.sort();
        keys
    }
}

/// Join a base URL and an endpoint path without doubling slashes.
fn join_url(base: &str, endpoint: &str) -> String {
    let base = base.trim_end_matches('/');
    if endpoint.starts_with('/') {
        format!("{}{}", base, endpoint)
    } else {
        format!("{}/{}", base, endpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::token::MemoryTokenStore;
    use crate::config::Defaults;

    fn config_with(backends: Vec<BackendConfig>) -> Config {
        Config {
            defaults: Defaults::default(),
            backends,
        }
    }

    fn backend(name: &str, enabled: bool) -> BackendConfig {
        BackendConfig {
            name: name.to_string(),
            url: format!("http://127.0.0.1:1/{}", name),
            enabled,
            ..BackendConfig::default()
        }
    }

    fn manager(config: &Config) -> ClientManager {
        ClientManager::new(config, Arc::new(MemoryTokenStore::new()))
    }

    #[test]
    fn test_one_client_per_enabled_backend() {
        let config = config_with(vec![
            backend("weather", true),
            backend("finance", true),
            backend("analytics", false),
        ]);
        let manager = manager(&config);

        assert_eq!(manager.known_backends(), vec!["finance", "weather"]);
    }

    #[test]
    fn test_health_is_stale_false_until_first_check() {
        let config = config_with(vec![backend("weather", true)]);
        let manager = manager(&config);

        assert!(!manager.is_backend_healthy("weather"));
        assert!(!manager.is_backend_healthy("nonexistent"));
        assert!(manager.healthy_backends().is_empty());
    }

    #[test]
    fn test_refresh_clients_rebuilds_from_config() {
        let config = config_with(vec![backend("weather", true), backend("finance", true)]);
        let manager = manager(&config);
        assert_eq!(manager.known_backends().len(), 2);

        let narrowed = config_with(vec![backend("weather", true), backend("finance", false)]);
        manager.refresh_clients(&narrowed);

        assert_eq!(manager.known_backends(), vec!["weather"]);
        assert!(manager.healthy_backends().is_empty());
    }

    #[tokio::test]
    async fn test_request_unknown_backend_not_configured() {
        let config = config_with(vec![backend("weather", true)]);
        let manager = manager(&config);

        let err = manager
            .request("nonexistent", Method::GET, "/data", None)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_configured");
    }

    #[tokio::test]
    async fn test_request_disabled_backend_not_configured() {
        let config = config_with(vec![backend("analytics", false)]);
        let manager = manager(&config);

        let err = manager
            .request("analytics", Method::POST, "/reports", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotConfigured { backend } if backend == "analytics"));
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://h:1/", "/health"), "http://h:1/health");
        assert_eq!(join_url("http://h:1", "/health"), "http://h:1/health");
        assert_eq!(join_url("http://h:1", "health"), "http://h:1/health");
    }
}
