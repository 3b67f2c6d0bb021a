//! In-memory store for in-flight authentication attempts.
//!
//! Phase 1 of the protocol parks a [`ServerExchange`] here under an
//! opaque session id; phase 2 redeems it exactly once. The store is the
//! only shared mutable state in the crate: `DashMap` serializes access
//! per shard, and `remove` gives the single-step lookup-and-delete that
//! makes replay of a session id impossible.
//!
//! Session ids are 128-bit random tokens from the OS RNG. They carry no
//! relation to the username, the exchange, or any in-process address.
//!
//! Abandoned phase-1 sessions are evicted by TTL: lazily on redemption,
//! opportunistically every `SWEEP_INTERVAL` inserts, and on demand via
//! [`SessionStore::cleanup_expired`] for hosts that run a periodic task.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use num_bigint::BigUint;

use crate::error::{AuthError, AuthResult};
use crate::srp::codec;
use crate::srp::math;
use crate::srp::{GroupParameters, ServerExchange, SessionProof};

/// Byte length of a session id (128 bits of entropy).
const SESSION_ID_LEN: usize = 16;

/// Run an expiry sweep every this many inserts.
const SWEEP_INTERVAL: u64 = 64;

/// The phase-1 response material: what the caller sends back to the
/// client alongside the opaque session id.
#[derive(Clone)]
pub struct Challenge {
    /// Opaque token the client must present in phase 2.
    pub session_id: String,
    /// The stored credential's salt, passed through unchanged.
    pub salt: Vec<u8>,
    /// Server public value B.
    pub server_public: BigUint,
}

/// Result of redeeming a session in phase 2.
pub struct ProofOutcome {
    /// Username the exchange was created for. Token issuance must use
    /// this, not whatever name the phase-2 request claims.
    pub username: String,
    /// `Some` when the client proof matched, `None` when it did not.
    pub proof: Option<SessionProof>,
}

struct SessionEntry {
    exchange: ServerExchange,
    created_at: Instant,
}

/// Concurrency-safe map of session id to in-flight exchange.
pub struct SessionStore {
    sessions: DashMap<String, SessionEntry>,
    ttl: Duration,
    insert_counter: AtomicU64,
}

impl SessionStore {
    /// Create a store whose entries expire after `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl,
            insert_counter: AtomicU64::new(0),
        }
    }

    /// Phase 1: start an exchange and park it under a fresh session id.
    ///
    /// Propagates [`AuthError::MalformedPublicValue`] from
    /// [`ServerExchange::begin`] without storing anything.
    pub fn create(
        &self,
        group: &GroupParameters,
        username: &str,
        salt: &[u8],
        verifier: &BigUint,
        client_public: &BigUint,
    ) -> AuthResult<Challenge> {
        let count = self.insert_counter.fetch_add(1, Ordering::Relaxed);
        if count % SWEEP_INTERVAL == 0 {
            self.cleanup_expired();
        }

        let exchange = ServerExchange::begin(group, username, salt, verifier, client_public)?;
        let challenge_salt = exchange.salt().to_vec();
        let server_public = exchange.server_public().clone();

        let session_id = self.insert_unique(SessionEntry {
            exchange,
            created_at: Instant::now(),
        });

        Ok(Challenge {
            session_id,
            salt: challenge_salt,
            server_public,
        })
    }

    /// Phase 2: redeem a session id against the client proof.
    ///
    /// The entry is removed before the proof is checked and is never
    /// re-inserted, so a second call with the same id answers
    /// [`AuthError::InvalidSession`] no matter how the first one went.
    /// Unknown, consumed and expired ids are deliberately one error.
    pub fn complete(&self, session_id: &str, client_proof: &[u8]) -> AuthResult<ProofOutcome> {
        let (_, mut entry) = self
            .sessions
            .remove(session_id)
            .ok_or(AuthError::InvalidSession)?;

        if entry.created_at.elapsed() > self.ttl {
            return Err(AuthError::InvalidSession);
        }

        let proof = entry.exchange.verify(client_proof)?;
        Ok(ProofOutcome {
            username: entry.exchange.username().to_string(),
            proof,
        })
    }

    /// Drop entries older than the TTL.
    ///
    /// Not required for correctness (expired entries are rejected on
    /// redemption) but keeps abandoned phase-1 sessions from
    /// accumulating. Hosts may call this from a periodic task.
    pub fn cleanup_expired(&self) {
        let now = Instant::now();
        self.sessions
            .retain(|_, entry| now.duration_since(entry.created_at) <= self.ttl);
    }

    /// Number of in-flight sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are in flight.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Insert under a fresh random id, re-drawing on the (astronomically
    /// unlikely) collision. The entry API keeps the check and the insert
    /// atomic.
    fn insert_unique(&self, entry: SessionEntry) -> String {
        loop {
            let session_id = generate_session_id();
            match self.sessions.entry(session_id.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                    return session_id;
                }
            }
        }
    }
}

/// A fresh 128-bit opaque session token.
fn generate_session_id() -> String {
    codec::encode_token(&math::random_bytes(SESSION_ID_LEN))
}
