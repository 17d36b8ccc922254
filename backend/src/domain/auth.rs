//! Operator authentication: credentials, password digests, and the login
//! service guarding the administrative console.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use zeroize::Zeroizing;

use super::error::DomainError;
use super::ports::{OperatorPersistenceError, OperatorRepository};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for operator lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Lowercase hex SHA-256 digest of an operator password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Digest a plaintext password.
    pub fn from_password(password: &str) -> Self {
        Self(hex::encode(Sha256::digest(password.as_bytes())))
    }

    /// Wrap a stored hex digest without re-hashing.
    pub fn from_hex(digest: impl Into<String>) -> Self {
        Self(digest.into())
    }

    /// Whether the supplied plaintext matches this digest.
    pub fn matches(&self, password: &str) -> bool {
        Self::from_password(password) == *self
    }

    /// The hex digest string as stored.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated staff operator, as held in the cookie session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    /// Operator primary key.
    pub id: Uuid,
    /// Login name.
    pub username: String,
    /// Whether this operator may delete records.
    pub is_superuser: bool,
}

/// A stored operator row including the credential digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperatorRecord {
    /// Operator primary key.
    pub id: Uuid,
    /// Login name, unique.
    pub username: String,
    /// Password digest to verify against.
    pub password_digest: PasswordDigest,
    /// Whether this operator may delete records.
    pub is_superuser: bool,
}

impl OperatorRecord {
    /// Drop the credential digest, keeping the session-safe identity.
    pub fn into_operator(self) -> Operator {
        Operator {
            id: self.id,
            username: self.username,
            is_superuser: self.is_superuser,
        }
    }
}

/// Authenticates operators against the operator store.
#[derive(Clone)]
pub struct AuthService {
    operators: Arc<dyn OperatorRepository>,
}

fn map_operator_persistence_error(error: OperatorPersistenceError) -> DomainError {
    match error {
        OperatorPersistenceError::Connection { message } => {
            DomainError::service_unavailable(message)
        }
        OperatorPersistenceError::Query { message } => DomainError::internal(message),
    }
}

impl AuthService {
    /// Create a service backed by the given operator store.
    pub fn new(operators: Arc<dyn OperatorRepository>) -> Self {
        Self { operators }
    }

    /// Verify credentials, returning the session-safe operator identity.
    ///
    /// Unknown usernames and wrong passwords produce the same unauthorized
    /// error so the response does not leak which operators exist.
    pub async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Operator, DomainError> {
        let record = self
            .operators
            .find_by_username(credentials.username())
            .await
            .map_err(map_operator_persistence_error)?;

        match record {
            Some(record) if record.password_digest.matches(credentials.password()) => {
                Ok(record.into_operator())
            }
            _ => Err(DomainError::unauthorized("invalid credentials")),
        }
    }
}
