use serde::{Deserialize, Serialize};

/// Successful response envelope returned by [`crate::ClientManager::request`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    /// HTTP status of the backend response.
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Unix milliseconds at which the response was received.
    pub timestamp: u64,
}

/// Health status reported by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Healthy,
    Unhealthy,
}

impl HealthLevel {
    pub fn is_healthy(self) -> bool {
        matches!(self, HealthLevel::Healthy)
    }
}

/// Payload of the backend health contract: `GET <health_endpoint>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: HealthLevel,
    /// Backend-generated timestamp, passed through verbatim.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}
