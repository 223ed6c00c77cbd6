//! Persistent bearer-token storage
//!
//! The store holds at most one token under a well-known key. Absence of the
//! token is the only representation of "signed out".

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

mod file;
#[cfg(test)]
mod memory;

pub use file::FileTokenStore;
#[cfg(test)]
pub use memory::MemoryTokenStore;

/// Key under which the bearer token is persisted
pub const TOKEN_KEY: &str = "access_token";

/// Opaque bearer credential
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Key-value persistence for the session token.
///
/// Reads never fail: an unreadable store is reported as "no token". Writes are
/// sequentially consistent, so a `set` is visible to the next `get`.
pub trait TokenStore: Send + Sync {
    /// Current token, if any
    fn get(&self) -> Option<Token>;

    /// Persist `token`, replacing any previous value
    fn set(&self, token: &Token) -> Result<(), StoreError>;

    /// Remove the token. Clearing an empty store is a no-op.
    fn clear(&self);
}
