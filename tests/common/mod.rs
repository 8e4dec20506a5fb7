//! Shared test utilities and mock infrastructure.

#![allow(dead_code)]

pub mod mock_backend;

use std::net::TcpListener;

use backplane::config::{BackendConfig, Config, Defaults};

/// Find an available port with nothing listening on it.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind to free port");
    listener.local_addr().unwrap().port()
}

/// A backend pointing at `url`, enabled, with default settings.
pub fn backend(name: &str, url: &str) -> BackendConfig {
    BackendConfig {
        name: name.to_string(),
        url: url.to_string(),
        ..BackendConfig::default()
    }
}

/// A backend with a tight request timeout, for timeout-path tests.
pub fn backend_with_timeout(name: &str, url: &str, timeout_ms: u64) -> BackendConfig {
    BackendConfig {
        timeout_ms: Some(timeout_ms),
        ..backend(name, url)
    }
}

/// Config wrapping the given backends with stock defaults.
pub fn config_with(backends: Vec<BackendConfig>) -> Config {
    Config {
        defaults: Defaults::default(),
        backends,
    }
}
