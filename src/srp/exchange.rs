//! Server side of one authentication attempt.
//!
//! A [`ServerExchange`] lives for exactly one challenge/proof round trip:
//! it is constructed with the client's public value A, hands back the
//! challenge B, checks a single client proof, and is then discarded by
//! its owning session store. The state tag makes out-of-order calls a
//! representable error instead of an accident.

use num_bigint::BigUint;
use zeroize::Zeroize;

use super::group::GroupParameters;
use super::math;
use crate::error::{AuthError, AuthResult};

/// Protocol position of an exchange.
///
/// `Initialized -> Challenged -> Verified | Failed`; the terminal states
/// have no outgoing transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExchangeState {
    Initialized,
    Challenged,
    Verified,
    Failed,
}

/// Output of a successful proof check.
#[derive(Clone)]
pub struct SessionProof {
    /// M2 = H(PAD(A) | M1 | K), returned to the client so it can confirm
    /// the server also derived K.
    pub server_proof: Vec<u8>,
    /// The shared session key K. Never transmitted; both sides derive it
    /// independently.
    pub session_key: Vec<u8>,
}

/// One in-flight authentication attempt, server side.
pub struct ServerExchange {
    group: GroupParameters,
    username: String,
    salt: Vec<u8>,
    verifier: BigUint,
    client_public: BigUint,
    server_private: BigUint,
    server_public: BigUint,
    state: ExchangeState,
}

impl ServerExchange {
    /// Validate the client's public value and produce the challenge.
    ///
    /// Rejects `A = 0 mod N` with [`AuthError::MalformedPublicValue`]
    /// before any state exists; a forged A of that form would fix the
    /// shared secret to zero regardless of the password. On success the
    /// exchange is in `Challenged`, with a freshly drawn private value b
    /// and `B = (k*v + g^b) mod N`.
    pub fn begin(
        group: &GroupParameters,
        username: &str,
        salt: &[u8],
        verifier: &BigUint,
        client_public: &BigUint,
    ) -> AuthResult<Self> {
        if client_public % group.n() == BigUint::default() {
            return Err(AuthError::MalformedPublicValue);
        }

        let mut exchange = Self {
            group: group.clone(),
            username: username.to_string(),
            salt: salt.to_vec(),
            verifier: verifier.clone(),
            client_public: client_public.clone(),
            server_private: BigUint::default(),
            server_public: BigUint::default(),
            state: ExchangeState::Initialized,
        };
        exchange.challenge();
        Ok(exchange)
    }

    /// Draw b and derive B, moving `Initialized -> Challenged`.
    fn challenge(&mut self) {
        let group = &self.group;
        self.server_private = math::random_below(group.n());
        let g_b = group.g().modpow(&self.server_private, group.n());
        self.server_public = (group.k() * &self.verifier + g_b) % group.n();
        self.state = ExchangeState::Challenged;
    }

    /// Check the client's proof M1. Exactly one attempt is permitted.
    ///
    /// Returns `Ok(Some(proof))` when M1 matches and `Ok(None)` when it
    /// does not; in both cases the exchange reaches a terminal state and
    /// will answer any further call with [`AuthError::InvalidState`].
    /// A scrambling parameter `u = 0` is rejected as
    /// [`AuthError::MalformedPublicValue`]: it is astronomically unlikely
    /// from an honest client, and accepting it would make the protocol
    /// trivially breakable.
    pub fn verify(&mut self, client_proof: &[u8]) -> AuthResult<Option<SessionProof>> {
        match self.state {
            ExchangeState::Challenged => {}
            _ => return Err(AuthError::InvalidState),
        }

        let group = &self.group;
        let a_bytes = group.pad_element(&self.client_public);
        let b_bytes = group.pad_element(&self.server_public);

        // u = H(PAD(A) | PAD(B))
        let u = BigUint::from_bytes_be(&math::sha256_concat(&[&a_bytes, &b_bytes]));
        if u == BigUint::default() {
            self.state = ExchangeState::Failed;
            return Err(AuthError::MalformedPublicValue);
        }

        // S = (A * v^u)^b mod N, K = H(PAD(S))
        let v_u = self.verifier.modpow(&u, group.n());
        let base = (&self.client_public * v_u) % group.n();
        let secret = base.modpow(&self.server_private, group.n());
        let mut secret_bytes = group.pad_element(&secret);
        let mut session_key = math::sha256_concat(&[&secret_bytes]);

        let expected = math::sha256_concat(&[&a_bytes, &b_bytes, &session_key]);
        if !math::constant_time_eq(&expected, client_proof) {
            self.state = ExchangeState::Failed;
            secret_bytes.zeroize();
            session_key.zeroize();
            return Ok(None);
        }

        self.state = ExchangeState::Verified;
        let server_proof = math::sha256_concat(&[&a_bytes, &expected, &session_key]);
        secret_bytes.zeroize();
        Ok(Some(SessionProof {
            server_proof,
            session_key,
        }))
    }

    /// Username this attempt is for.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Salt of the stored credential, passed through for the challenge
    /// response.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    /// Server public value B.
    pub fn server_public(&self) -> &BigUint {
        &self.server_public
    }
}
