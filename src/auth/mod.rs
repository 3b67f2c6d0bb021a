//! Login orchestration over the SRP engine.
//!
//! [`AuthFacade`] wires the two wire round-trips to the session store and
//! to two collaborators owned by the host application: a
//! [`CredentialStore`] that persists (salt, verifier) records, and a
//! [`TokenIssuer`] that mints a bearer credential for a proven username.
//! This module owns the wire boundary: every big integer and byte string
//! in the DTOs is base64 of big-endian bytes (see [`crate::srp::codec`]).

use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::session::SessionStore;
use crate::srp::{codec, create_verifier, GroupParameters};

/// A stored credential as the external user store hands it back.
#[derive(Debug, Clone)]
pub struct StoredCredential {
    /// Registration salt.
    pub salt: Vec<u8>,
    /// v = g^x mod N.
    pub verifier: BigUint,
}

/// External lookup of registered credentials.
///
/// Registration writes the record, authentication only reads it; no
/// transaction spans the two.
pub trait CredentialStore: Send + Sync {
    /// Fetch the credential registered under `username`, if any.
    fn lookup(&self, username: &str) -> AuthResult<Option<StoredCredential>>;
}

/// External bearer-credential minting for a proven username.
pub trait TokenIssuer: Send + Sync {
    /// Mint an opaque token for `username`. Only ever called after the
    /// client proof verified.
    fn issue(&self, username: &str) -> String;
}

/// Registration output, in wire form for the caller to persist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub username: String,
    /// Base64 salt.
    pub salt: String,
    /// Base64 big-endian verifier.
    pub verifier: String,
}

/// Phase-1 request: the client opens an attempt with its public value A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInitRequest {
    pub username: String,
    #[serde(rename = "A")]
    pub client_public: String,
}

/// Phase-1 response: salt and challenge B, plus the session id the
/// client must present in phase 2.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInitResponse {
    pub username: String,
    pub salt: String,
    #[serde(rename = "B")]
    pub server_public: String,
    pub session_id: String,
}

/// Phase-2 request: the client proof for a parked session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginProofRequest {
    pub username: String,
    #[serde(rename = "M1")]
    pub client_proof: String,
    pub session_id: String,
}

/// Phase-2 response: the server proof and, on success, the bearer token
/// minted by the issuance collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginProofResponse {
    pub username: String,
    #[serde(rename = "M2")]
    pub server_proof: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Orchestrates registration and the two-phase login exchange.
pub struct AuthFacade<C, T> {
    group: GroupParameters,
    sessions: SessionStore,
    credentials: C,
    issuer: T,
    salt_len: usize,
}

impl<C: CredentialStore, T: TokenIssuer> AuthFacade<C, T> {
    /// Build a facade over the deployment group and the host's
    /// collaborators.
    pub fn new(config: &AuthConfig, credentials: C, issuer: T) -> Self {
        Self {
            group: GroupParameters::rfc5054_2048(),
            sessions: SessionStore::new(config.session_ttl()),
            credentials,
            issuer,
            salt_len: config.salt_len,
        }
    }

    /// Derive a (salt, verifier) record for a new registration.
    ///
    /// The record is returned in wire form for the caller to persist;
    /// the password is gone once this returns.
    pub fn register(&self, username: &str, password: &str) -> RegistrationRecord {
        let record = create_verifier(&self.group, username, password, self.salt_len);
        tracing::info!(username, "registered SRP credential");
        RegistrationRecord {
            username: username.to_string(),
            salt: codec::encode_bytes(&record.salt),
            verifier: codec::encode_biguint(&record.verifier),
        }
    }

    /// Phase 1: look up the credential and issue a challenge.
    pub fn begin_login(&self, request: &LoginInitRequest) -> AuthResult<LoginInitResponse> {
        let client_public = codec::decode_biguint("A", &request.client_public)?;

        let credential = match self.credentials.lookup(&request.username)? {
            Some(credential) => credential,
            None => {
                tracing::warn!(username = %request.username, "login init for unknown user");
                return Err(AuthError::UnknownUser);
            }
        };

        let challenge = self.sessions.create(
            &self.group,
            &request.username,
            &credential.salt,
            &credential.verifier,
            &client_public,
        )?;
        tracing::info!(username = %request.username, "login challenge issued");

        Ok(LoginInitResponse {
            username: request.username.clone(),
            salt: codec::encode_bytes(&challenge.salt),
            server_public: codec::encode_biguint(&challenge.server_public),
            session_id: challenge.session_id,
        })
    }

    /// Phase 2: redeem the session against the client proof.
    ///
    /// On success the issuance collaborator mints a token for the
    /// username the exchange was created for - not the name the request
    /// claims, which merely has to agree.
    pub fn complete_login(&self, request: &LoginProofRequest) -> AuthResult<LoginProofResponse> {
        let client_proof = codec::decode_bytes("M1", &request.client_proof)?;
        let outcome = self.sessions.complete(&request.session_id, &client_proof)?;

        if outcome.username != request.username {
            tracing::warn!(
                claimed = %request.username,
                proven = %outcome.username,
                "proof request username does not match its session"
            );
            return Err(AuthError::InvalidSession);
        }

        match outcome.proof {
            Some(proof) => {
                let access_token = self.issuer.issue(&outcome.username);
                tracing::info!(username = %outcome.username, "login verified");
                Ok(LoginProofResponse {
                    username: outcome.username,
                    server_proof: codec::encode_bytes(&proof.server_proof),
                    success: true,
                    access_token: Some(access_token),
                })
            }
            None => {
                tracing::warn!(username = %outcome.username, "client proof mismatch");
                Err(AuthError::ProofMismatch)
            }
        }
    }

    /// The underlying session store, for hosts that drive a periodic
    /// expiry sweep.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::srp::ClientExchange;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryCredentials {
        records: Mutex<HashMap<String, StoredCredential>>,
    }

    impl MemoryCredentials {
        fn new() -> Self {
            Self {
                records: Mutex::new(HashMap::new()),
            }
        }

        fn save(&self, record: &RegistrationRecord) {
            let credential = StoredCredential {
                salt: codec::decode_bytes("salt", &record.salt).unwrap(),
                verifier: codec::decode_biguint("verifier", &record.verifier).unwrap(),
            };
            self.records
                .lock()
                .unwrap()
                .insert(record.username.clone(), credential);
        }
    }

    impl CredentialStore for &MemoryCredentials {
        fn lookup(&self, username: &str) -> AuthResult<Option<StoredCredential>> {
            Ok(self.records.lock().unwrap().get(username).cloned())
        }
    }

    struct StaticIssuer;

    impl TokenIssuer for StaticIssuer {
        fn issue(&self, username: &str) -> String {
            format!("token-for-{username}")
        }
    }

    fn facade(credentials: &MemoryCredentials) -> AuthFacade<&MemoryCredentials, StaticIssuer> {
        AuthFacade::new(&AuthConfig::default(), credentials, StaticIssuer)
    }

    fn init_request(client: &ClientExchange, username: &str) -> LoginInitRequest {
        LoginInitRequest {
            username: username.to_string(),
            client_public: codec::encode_biguint(client.public_value()),
        }
    }

    #[test]
    fn register_then_login_round_trip() {
        let credentials = MemoryCredentials::new();
        let auth = facade(&credentials);
        credentials.save(&auth.register("alice", "hunter2"));

        let group = GroupParameters::rfc5054_2048();
        let client = ClientExchange::new(&group, "alice");
        let challenge = auth
            .begin_login(&init_request(&client, "alice"))
            .unwrap();

        let salt = codec::decode_bytes("salt", &challenge.salt).unwrap();
        let server_public = codec::decode_biguint("B", &challenge.server_public).unwrap();
        let session = client
            .process_challenge("hunter2", &salt, &server_public)
            .unwrap();

        let response = auth
            .complete_login(&LoginProofRequest {
                username: "alice".to_string(),
                client_proof: codec::encode_bytes(&session.proof),
                session_id: challenge.session_id,
            })
            .unwrap();

        assert!(response.success);
        assert_eq!(response.access_token.as_deref(), Some("token-for-alice"));

        let server_proof = codec::decode_bytes("M2", &response.server_proof).unwrap();
        assert!(client.verify_server(&session, &server_proof));
    }

    #[test]
    fn unknown_user_is_reported_as_such_internally() {
        let credentials = MemoryCredentials::new();
        let auth = facade(&credentials);

        let group = GroupParameters::rfc5054_2048();
        let client = ClientExchange::new(&group, "nobody");
        let result = auth.begin_login(&init_request(&client, "nobody"));

        let err = result.unwrap_err();
        assert_eq!(err, AuthError::UnknownUser);
        // Externally it reads the same as a failed proof.
        assert_eq!(err.public_message(), AuthError::ProofMismatch.public_message());
    }

    #[test]
    fn wrong_password_fails_and_consumes_the_session() {
        let credentials = MemoryCredentials::new();
        let auth = facade(&credentials);
        credentials.save(&auth.register("alice", "hunter2"));

        let group = GroupParameters::rfc5054_2048();
        let client = ClientExchange::new(&group, "alice");
        let challenge = auth
            .begin_login(&init_request(&client, "alice"))
            .unwrap();

        let salt = codec::decode_bytes("salt", &challenge.salt).unwrap();
        let server_public = codec::decode_biguint("B", &challenge.server_public).unwrap();
        let session = client
            .process_challenge("letmein", &salt, &server_public)
            .unwrap();

        let proof_request = LoginProofRequest {
            username: "alice".to_string(),
            client_proof: codec::encode_bytes(&session.proof),
            session_id: challenge.session_id,
        };
        assert_eq!(
            auth.complete_login(&proof_request).err(),
            Some(AuthError::ProofMismatch)
        );
        // Guessing again against the same challenge is not possible.
        assert_eq!(
            auth.complete_login(&proof_request).err(),
            Some(AuthError::InvalidSession)
        );
    }

    #[test]
    fn username_must_match_the_session() {
        let credentials = MemoryCredentials::new();
        let auth = facade(&credentials);
        credentials.save(&auth.register("alice", "hunter2"));
        credentials.save(&auth.register("bob", "sekrit"));

        let group = GroupParameters::rfc5054_2048();
        let client = ClientExchange::new(&group, "alice");
        let challenge = auth
            .begin_login(&init_request(&client, "alice"))
            .unwrap();

        let salt = codec::decode_bytes("salt", &challenge.salt).unwrap();
        let server_public = codec::decode_biguint("B", &challenge.server_public).unwrap();
        let session = client
            .process_challenge("hunter2", &salt, &server_public)
            .unwrap();

        let result = auth.complete_login(&LoginProofRequest {
            username: "bob".to_string(),
            client_proof: codec::encode_bytes(&session.proof),
            session_id: challenge.session_id,
        });
        assert_eq!(result.err(), Some(AuthError::InvalidSession));
    }

    #[test]
    fn undecodable_public_value_is_an_encoding_error() {
        let credentials = MemoryCredentials::new();
        let auth = facade(&credentials);
        credentials.save(&auth.register("alice", "hunter2"));

        let result = auth.begin_login(&LoginInitRequest {
            username: "alice".to_string(),
            client_public: "///not-base64///".to_string(),
        });
        assert!(matches!(result, Err(AuthError::InvalidEncoding(_))));
    }

    #[test]
    fn wire_field_names_match_the_protocol() {
        let request = LoginInitRequest {
            username: "alice".to_string(),
            client_public: "QQ==".to_string(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("A").is_some());

        let response = LoginProofResponse {
            username: "alice".to_string(),
            server_proof: "TTI=".to_string(),
            success: true,
            access_token: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("M2").is_some());
        assert!(json.get("access_token").is_none());

        let proof: LoginProofRequest = serde_json::from_str(
            r#"{"username":"alice","M1":"TTE=","session_id":"s"}"#,
        )
        .unwrap();
        assert_eq!(proof.client_proof, "TTE=");
    }
}
