//! Wire encoding for protocol values.
//!
//! Big integers and byte strings travel as standard base64 of their
//! big-endian byte representation; session tokens use the URL-safe
//! alphabet without padding. Both ends of the exchange must agree on
//! this encoding, so it lives in one place.

use base64::prelude::*;
use num_bigint::BigUint;

use crate::error::{AuthError, AuthResult};

/// Encode a byte string for the wire.
pub fn encode_bytes(bytes: &[u8]) -> String {
    BASE64_STANDARD.encode(bytes)
}

/// Decode a wire byte string, naming the offending field on failure.
pub fn decode_bytes(field: &str, encoded: &str) -> AuthResult<Vec<u8>> {
    BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| AuthError::InvalidEncoding(format!("{field}: {e}")))
}

/// Encode a big integer as base64 of its big-endian bytes.
pub fn encode_biguint(value: &BigUint) -> String {
    BASE64_STANDARD.encode(value.to_bytes_be())
}

/// Decode a base64 big-endian byte string into a big integer.
pub fn decode_biguint(field: &str, encoded: &str) -> AuthResult<BigUint> {
    Ok(BigUint::from_bytes_be(&decode_bytes(field, encoded)?))
}

/// Encode an opaque session token (URL-safe, no padding).
pub fn encode_token(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biguint_round_trip() {
        let value = BigUint::from(0x0102_0304u32);
        let encoded = encode_biguint(&value);
        assert_eq!(decode_biguint("v", &encoded).unwrap(), value);
    }

    #[test]
    fn decode_rejects_garbage_and_names_the_field() {
        let err = decode_bytes("A", "not base64!!!").unwrap_err();
        match err {
            AuthError::InvalidEncoding(msg) => assert!(msg.starts_with("A:")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn token_encoding_is_url_safe() {
        let token = encode_token(&[0xFBu8; 16]);
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }
}
