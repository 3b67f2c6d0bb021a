//! Client side of the exchange.
//!
//! The backend only runs the server half in production; the client half
//! lives here so integration tests can drive honest (and dishonest)
//! logins, and so command-line tooling can authenticate against a running
//! instance without reimplementing the math.

use num_bigint::BigUint;

use super::group::GroupParameters;
use super::math;
use super::verifier;
use crate::error::{AuthError, AuthResult};

/// Session material the client derives from the server's challenge.
#[derive(Clone)]
pub struct ClientSession {
    /// M1 = H(PAD(A) | PAD(B) | K), sent to the server as proof.
    pub proof: Vec<u8>,
    /// The shared session key K.
    pub key: Vec<u8>,
}

/// One authentication attempt, client side.
pub struct ClientExchange {
    group: GroupParameters,
    username: String,
    private_value: BigUint,
    public_value: BigUint,
}

impl ClientExchange {
    /// Draw a fresh private value a and compute `A = g^a mod N`.
    pub fn new(group: &GroupParameters, username: &str) -> Self {
        let private_value = math::random_below(group.n());
        let public_value = group.g().modpow(&private_value, group.n());
        Self {
            group: group.clone(),
            username: username.to_string(),
            private_value,
            public_value,
        }
    }

    /// Public value A, sent in the init request.
    pub fn public_value(&self) -> &BigUint {
        &self.public_value
    }

    /// Derive the session key and client proof from the server challenge.
    ///
    /// The password is taken here rather than held in the struct, and is
    /// not retained after the call. Rejects `B = 0 mod N`, which a
    /// malicious server could use to cancel the password contribution.
    pub fn process_challenge(
        &self,
        password: &str,
        salt: &[u8],
        server_public: &BigUint,
    ) -> AuthResult<ClientSession> {
        let group = &self.group;
        if server_public % group.n() == BigUint::default() {
            return Err(AuthError::MalformedPublicValue);
        }

        let a_bytes = group.pad_element(&self.public_value);
        let b_bytes = group.pad_element(server_public);

        let u = BigUint::from_bytes_be(&math::sha256_concat(&[&a_bytes, &b_bytes]));
        if u == BigUint::default() {
            return Err(AuthError::MalformedPublicValue);
        }

        let x = verifier::private_key(salt, &self.username, password);

        // S = (B - k*g^x)^(a + u*x) mod N; N is added before the
        // subtraction to keep the intermediate non-negative.
        let g_x = group.g().modpow(&x, group.n());
        let k_g_x = (group.k() * g_x) % group.n();
        let base = ((group.n() + server_public) - k_g_x) % group.n();
        let exponent = &u * &x + &self.private_value;
        let secret = base.modpow(&exponent, group.n());

        let secret_bytes = group.pad_element(&secret);
        let key = math::sha256_concat(&[&secret_bytes]);
        let proof = math::sha256_concat(&[&a_bytes, &b_bytes, &key]);

        Ok(ClientSession { proof, key })
    }

    /// Check the server's proof M2, confirming it derived the same K.
    pub fn verify_server(&self, session: &ClientSession, server_proof: &[u8]) -> bool {
        let a_bytes = self.group.pad_element(&self.public_value);
        let expected = math::sha256_concat(&[&a_bytes, &session.proof, &session.key]);
        math::constant_time_eq(&expected, server_proof)
    }
}
