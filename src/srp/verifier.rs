//! Verifier derivation for registration.
//!
//! The server never stores the password, only `v = g^x mod N` where
//! `x = H(salt | H(username ":" password))`. Recovering the password from
//! v requires solving the discrete log in the group.

use num_bigint::BigUint;

use super::group::GroupParameters;
use super::math;

/// The (salt, verifier) pair produced at registration, to be persisted by
/// the caller's user store.
#[derive(Debug, Clone)]
pub struct SaltedVerifier {
    /// Per-registration random salt. Two registrations never share one,
    /// even for identical passwords.
    pub salt: Vec<u8>,
    /// v = g^x mod N.
    pub verifier: BigUint,
}

/// Derive a fresh (salt, verifier) pair for a registration.
///
/// Pure apart from the salt draw; the password is not retained anywhere
/// after this returns.
pub fn create_verifier(
    group: &GroupParameters,
    username: &str,
    password: &str,
    salt_len: usize,
) -> SaltedVerifier {
    let salt = math::random_bytes(salt_len);
    let x = private_key(&salt, username, password);
    let verifier = group.g().modpow(&x, group.n());
    SaltedVerifier { salt, verifier }
}

/// x = H(salt | H(username ":" password)), as a big integer.
///
/// Shared with the client side, which re-derives x from the password at
/// login time.
pub(crate) fn private_key(salt: &[u8], username: &str, password: &str) -> BigUint {
    let identity = math::sha256_concat(&[username.as_bytes(), b":", password.as_bytes()]);
    let x = math::sha256_concat(&[salt, &identity]);
    BigUint::from_bytes_be(&x)
}
