//! Client-side core for a multi-backend workspace UI.
//!
//! Two subsystems, consumed by a rendering layer that never touches their
//! internals:
//!
//! - [`client`]: one HTTP client per enabled backend, with independent
//!   per-backend health state, bearer-token auth, and errors normalized to a
//!   single [`client::ApiError`] shape.
//! - [`calc`]: a registry of per-module calculation engines behind a single
//!   dispatcher that validates inputs, times every call, and encodes failures
//!   into [`calc::CalculationResult`] instead of raising them.

pub mod calc;
pub mod client;
pub mod config;
pub mod telemetry;

mod clock;

pub use calc::{CalculationDispatcher, CalculationInput, CalculationResult};
pub use client::{ApiError, ClientManager};
pub use config::{BackendConfig, Config, ConfigStore};
