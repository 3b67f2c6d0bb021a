//! Fixed group parameters for the SRP exchange.
//!
//! The group is the RFC 5054 2048-bit prime/generator pair. It is chosen
//! once per deployment and never mutated after construction; every modular
//! exponentiation in the crate happens in this group.

use digest::Digest;
use num_bigint::BigUint;
use sha2::Sha256;
use srp::groups::G_2048;

use super::math;

/// The (N, g) pair the protocol operates in, plus derived constants.
///
/// `k = H(N | PAD(g))` is computed once here rather than on every
/// exchange. `n_len` is the byte width of N; all group elements are
/// left-padded to this width before they enter a hash.
#[derive(Debug, Clone)]
pub struct GroupParameters {
    n: BigUint,
    g: BigUint,
    k: BigUint,
    n_len: usize,
}

impl GroupParameters {
    /// The RFC 5054 2048-bit group with SHA-256, the deployment default.
    pub fn rfc5054_2048() -> Self {
        Self::from_parts(G_2048.n.clone(), G_2048.g.clone())
    }

    fn from_parts(n: BigUint, g: BigUint) -> Self {
        let n_len = ((n.bits() + 7) / 8) as usize;

        // k = H(N | PAD(g))
        let mut hasher = Sha256::new();
        hasher.update(n.to_bytes_be());
        hasher.update(math::left_pad(g.to_bytes_be(), n_len));
        let k = BigUint::from_bytes_be(&hasher.finalize());

        Self { n, g, k, n_len }
    }

    /// Prime modulus N.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Generator g.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Multiplier k = H(N | PAD(g)).
    pub fn k(&self) -> &BigUint {
        &self.k
    }

    /// Byte width of N (256 for the 2048-bit group).
    pub fn n_len(&self) -> usize {
        self.n_len
    }

    /// Left-pad a group element to the width of N for hashing.
    pub fn pad_element(&self, value: &BigUint) -> Vec<u8> {
        math::left_pad(value.to_bytes_be(), self.n_len)
    }
}
