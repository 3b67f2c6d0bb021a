//! Numeric and byte-level primitives shared by the SRP modules.
//!
//! All integers cross the byte boundary as big-endian unsigned byte
//! strings. Secret material is drawn from the operating system RNG, and
//! comparisons of secret-derived values go through [`constant_time_eq`].

use digest::Digest;
use num_bigint::BigUint;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Left-pad a big-endian byte string with zeros to `target_len`.
///
/// Byte strings longer than `target_len` are returned unchanged; the
/// caller is expected to pass values already reduced mod N.
pub fn left_pad(bytes: Vec<u8>, target_len: usize) -> Vec<u8> {
    if bytes.len() >= target_len {
        return bytes;
    }
    let mut padded = vec![0u8; target_len - bytes.len()];
    padded.extend(bytes);
    padded
}

/// Fill a fresh buffer with `len` bytes from the OS RNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Draw a uniform random integer in `[1, bound)`.
///
/// Samples full-width byte strings and rejects out-of-range candidates,
/// so the result carries no modulo bias. For a 2048-bit prime with the
/// high bit set the expected number of draws is below two.
pub fn random_below(bound: &BigUint) -> BigUint {
    let len = ((bound.bits() + 7) / 8) as usize;
    loop {
        let candidate = BigUint::from_bytes_be(&random_bytes(len));
        if candidate != BigUint::default() && &candidate < bound {
            return candidate;
        }
    }
}

/// SHA-256 over the concatenation of `parts`.
pub fn sha256_concat(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

/// Constant-time byte equality.
///
/// Never use `==` on proof or key material: a short-circuiting compare
/// leaks how long a forged prefix matched.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
