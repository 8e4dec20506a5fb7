//! Bearer-token storage abstraction.
//!
//! The client manager reads and evicts tokens through [`TokenStore`] and
//! never assumes a particular persistence technology; any key-value
//! backend can be substituted. [`MemoryTokenStore`] is the in-process
//! default.

use std::collections::HashMap;

use parking_lot::RwLock;

/// Wrapper for token values that keeps them out of debug output.
///
/// Use `expose()` only at the point the Authorization header is built.
#[derive(Clone)]
pub struct SecureToken(String);

impl SecureToken {
    pub fn new(value: String) -> Self {
        Self(value)
    }

    /// Expose the inner value.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecureToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SecureToken(***)")
    }
}

/// Per-backend bearer-token storage.
pub trait TokenStore: Send + Sync {
    /// Token stored for a backend key, if any.
    fn get(&self, backend: &str) -> Option<SecureToken>;

    /// Store or replace the token for a backend key.
    fn put(&self, backend: &str, token: SecureToken);

    /// Evict the token for a backend key.
    fn remove(&self, backend: &str);
}

/// In-memory token store, the default when no persistence is wired in.
#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, SecureToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, backend: &str) -> Option<SecureToken> {
        self.tokens.read().get(backend).cloned()
    }

    fn put(&self, backend: &str, token: SecureToken) {
        self.tokens.write().insert(backend.to_string(), token);
    }

    fn remove(&self, backend: &str) {
        self.tokens.write().remove(backend);
    }
}
