//! Backend client orchestration.
//!
//! The manager owns one HTTP client per enabled backend, tracks per-backend
//! health flags, and normalizes every failure into [`ApiError`]. Token
//! persistence is abstracted behind [`TokenStore`] so the core never depends
//! on a particular storage technology.

mod error;
mod manager;
mod response;
mod token;

pub use error::{ApiError, ErrorDetails};
pub use manager::ClientManager;
pub use response::{ApiResponse, HealthCheckResponse, HealthLevel};
pub use token::{MemoryTokenStore, SecureToken, TokenStore};
