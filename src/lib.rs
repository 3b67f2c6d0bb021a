//! Waypoint Authentication Core
//!
//! Server-side SRP (Secure Remote Password) engine for the Waypoint
//! backend, including:
//! - **srp**: verifier derivation, the challenge/proof exchange state
//!   machine, and the numeric primitives underneath
//! - **session**: the in-memory store bridging the two login round-trips
//! - **auth**: the facade wiring lookup and token issuance collaborators
//!   to the wire DTOs
//!
//! The server proves the client knows its password without the password
//! (or anything derived from it alone) ever crossing the wire. HTTP
//! routing, credential persistence and token formats are the host
//! application's concern; this crate exposes the protocol engine behind
//! two calls, one per round trip.
//!
//! # Example (conceptual)
//! ```ignore
//! let auth = AuthFacade::new(&AuthConfig::default(), user_store, jwt_issuer);
//!
//! // Registration: persist the returned (salt, verifier) record.
//! let record = auth.register("alice", "hunter2");
//!
//! // Login, phase 1: client sends A, gets (salt, B, session_id).
//! let challenge = auth.begin_login(&init_request)?;
//!
//! // Login, phase 2: client sends M1, gets (M2, bearer token).
//! let proven = auth.complete_login(&proof_request)?;
//! ```

pub mod auth;
pub mod config;
pub mod error;
pub mod session;
pub mod srp;

pub use auth::{
    AuthFacade, CredentialStore, LoginInitRequest, LoginInitResponse, LoginProofRequest,
    LoginProofResponse, RegistrationRecord, StoredCredential, TokenIssuer,
};
pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use session::{Challenge, ProofOutcome, SessionStore};
pub use srp::{
    create_verifier, ClientExchange, ClientSession, GroupParameters, SaltedVerifier,
    ServerExchange, SessionProof,
};
