use crate::jwt::TokenError;
use crate::jwt::TokenManager;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::password::PLACEHOLDER_HASH;

/// Bridges password credentials to session tokens.
///
/// Verifies a plaintext password against a stored hash and, on success,
/// mints a token for the identity the hash belongs to.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    tokens: TokenManager,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `tokens` - Token manager used to mint session tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(tokens: TokenManager) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            tokens,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify `password` against `stored_hash` and issue a token for `subject_id`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject_id` - Identity the token is issued for
    ///
    /// # Returns
    /// Signed session token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `TokenError` - Token signing failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject_id: i64,
    ) -> Result<String, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.tokens.issue(subject_id)?)
    }

    /// Reject a login for an identity that does not exist.
    ///
    /// Runs one verification against [`PLACEHOLDER_HASH`] so the rejection
    /// takes as long as a wrong password for an existing identity.
    ///
    /// # Arguments
    /// * `password` - Plaintext password that was presented
    ///
    /// # Returns
    /// Always `InvalidCredentials`
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        match self.password_hasher.verify(password, PLACEHOLDER_HASH) {
            Ok(_) => AuthenticationError::InvalidCredentials,
            Err(e) => AuthenticationError::PasswordError(e),
        }
    }

    /// Validate a token and return its subject identity.
    ///
    /// # Arguments
    /// * `token` - Compact JWT
    ///
    /// # Returns
    /// Subject identity carried by the token
    ///
    /// # Errors
    /// * `TokenError` - Malformed, wrongly signed or expired token
    pub fn validate_token(&self, token: &str) -> Result<i64, TokenError> {
        self.tokens.validate(token)
    }
}
