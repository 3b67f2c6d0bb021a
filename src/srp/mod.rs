//! SRP (Secure Remote Password) protocol engine.
//!
//! # Protocol Parameters
//! - Group: RFC 5054 2048-bit
//! - Hash: SHA-256
//! - Multiplier k: computed as `k = H(N | PAD(g))`
//! - Private key x: `H(salt | H(username ":" password))`
//! - Proofs: `M1 = H(PAD(A) | PAD(B) | K)`, `M2 = H(PAD(A) | M1 | K)`
//!
//! Group elements are left-padded to the byte width of N whenever they
//! enter a hash, and cross every serialization boundary as big-endian
//! unsigned byte strings (base64 on the wire, see [`codec`]).
//!
//! The server half is [`ServerExchange`]; the matching client half is
//! [`ClientExchange`]. Registration-time verifier derivation is
//! [`create_verifier`].

pub mod codec;
mod group;
pub(crate) mod math;

mod client;
mod exchange;
mod verifier;

pub use client::{ClientExchange, ClientSession};
pub use exchange::{ServerExchange, SessionProof};
pub use group::GroupParameters;
pub use verifier::{create_verifier, SaltedVerifier};
