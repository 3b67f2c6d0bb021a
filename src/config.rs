//! Tunables for the authentication core.

use serde::Deserialize;
use std::time::Duration;

/// Default lifetime of an unanswered login challenge, in seconds.
const DEFAULT_SESSION_TTL_SECS: u64 = 120;

/// Default salt length for newly registered credentials, in bytes.
const DEFAULT_SALT_LEN: usize = 16;

/// Configuration for the authentication core.
///
/// Deserializable so a host application can embed it in its own config
/// file; `Default` gives working values for tests and small deployments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a phase-1 challenge stays redeemable before it is treated
    /// as abandoned and evicted.
    pub session_ttl_secs: u64,
    /// Salt length for newly registered credentials. Must be at least 16.
    pub salt_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            salt_len: DEFAULT_SALT_LEN,
        }
    }
}

impl AuthConfig {
    /// Session TTL as a [`Duration`].
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
