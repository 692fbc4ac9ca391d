use thiserror::Error;

use crate::domain::authz::decision::DecisionReason;
use crate::user::errors::UserError;
use crate::user::models::UserId;

/// Outcome of a failed login, tagged so callers can tell a bad credential
/// from a degraded credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("No identity with this username")]
    NotFound,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Token issuance failed: {0}")]
    TokenIssue(#[from] auth::TokenError),
}

impl LoginError {
    /// Whether the caller should see an invalid-credential error. Unknown
    /// usernames and wrong passwords are indistinguishable from outside.
    pub fn is_invalid_credential(&self) -> bool {
        matches!(self, LoginError::InvalidCredentials | LoginError::NotFound)
    }
}

impl From<UserError> for LoginError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFoundByUsername(_) | UserError::NotFound(_) => LoginError::NotFound,
            other => LoginError::StoreUnavailable(other.to_string()),
        }
    }
}

/// Rejection raised by the ownership guard before a mutation runs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GuardError {
    #[error("Send token along with request")]
    MissingCredential,

    #[error("Malformed credential, expected `Bearer <token>`")]
    MalformedCredential,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(auth::TokenError),

    #[error("Failed to decode token: {0}")]
    Undecodable(String),

    #[error("Cannot modify another identity's resource")]
    OwnershipMismatch { caller: UserId, target: UserId },
}

impl GuardError {
    pub fn reason(&self) -> DecisionReason {
        match self {
            GuardError::MissingCredential => DecisionReason::MissingCredential,
            GuardError::MalformedCredential => DecisionReason::MalformedCredential,
            GuardError::InvalidToken(_) | GuardError::Undecodable(_) => {
                DecisionReason::InvalidOrExpiredToken
            }
            GuardError::OwnershipMismatch { .. } => DecisionReason::OwnershipMismatch,
        }
    }
}

impl From<auth::CredentialError> for GuardError {
    fn from(err: auth::CredentialError) -> Self {
        match err {
            auth::CredentialError::Missing => GuardError::MissingCredential,
            auth::CredentialError::Malformed => GuardError::MalformedCredential,
        }
    }
}

impl From<auth::TokenError> for GuardError {
    fn from(err: auth::TokenError) -> Self {
        match err {
            // Signed by us but carrying an unusable subject.
            auth::TokenError::InvalidSubject(uid) => GuardError::Undecodable(uid),
            other => GuardError::InvalidToken(other),
        }
    }
}
