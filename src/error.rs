//! Error types for the authentication core.

use thiserror::Error;

/// Errors that can occur during registration or an authentication attempt.
///
/// Every variant is per-attempt and recoverable: the caller retries the
/// protocol from the init phase. `UnknownUser` and `ProofMismatch` are kept
/// as distinct variants so operators can tell them apart in logs, but both
/// collapse to the same externally visible message (see
/// [`AuthError::public_message`]) so a caller probing the login endpoint
/// cannot enumerate usernames from response content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No credential is registered under the given username.
    #[error("unknown user")]
    UnknownUser,

    /// A client public value (or the scrambling parameter derived from it)
    /// was congruent to zero mod N, which would let an attacker fix the
    /// shared secret.
    #[error("malformed public value")]
    MalformedPublicValue,

    /// The session id is unknown, already consumed, or expired. One
    /// category on purpose: callers must not be able to tell which.
    #[error("invalid or expired session")]
    InvalidSession,

    /// The client proof did not match. The challenge is consumed; a fresh
    /// init is required for another attempt.
    #[error("client proof did not match")]
    ProofMismatch,

    /// A protocol phase was invoked out of order.
    #[error("authentication phase called out of order")]
    InvalidState,

    /// A wire value could not be decoded before reaching the engine.
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
}

impl AuthError {
    /// Message suitable for returning to an external caller.
    ///
    /// `UnknownUser` and `ProofMismatch` intentionally share a message.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::UnknownUser | AuthError::ProofMismatch => "authentication failed",
            AuthError::MalformedPublicValue => "malformed public value",
            AuthError::InvalidSession => "invalid or expired session",
            AuthError::InvalidState => "authentication phase called out of order",
            AuthError::InvalidEncoding(_) => "invalid encoding",
        }
    }
}

/// Result type alias for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;
