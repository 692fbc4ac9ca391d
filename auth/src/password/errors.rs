use thiserror::Error;

/// Error type for password operations.
///
/// A wrong password is not an error; see [`super::PasswordHasher::verify`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is unusable: {0}")]
    CorruptHash(String),
}
