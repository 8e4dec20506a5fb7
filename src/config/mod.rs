//! Configuration loading and storage.
//!
//! Backends are described once, in TOML, and treated as immutable by the
//! rest of the crate. Runtime changes go through [`ConfigStore::reload`]
//! followed by [`crate::ClientManager::refresh_clients`].

mod loader;
mod store;
mod types;

pub use loader::ConfigError;
pub use store::ConfigStore;
pub use types::{BackendConfig, Config, Defaults};
