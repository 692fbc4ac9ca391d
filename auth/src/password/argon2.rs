use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as HashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as _;
use argon2::password_hash::PasswordVerifier as _;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash that no password matches. Verifying against it
/// costs the same as verifying against a real stored hash.
pub const PLACEHOLDER_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$AAECAwQFBgcICQoLDA0ODxAREhMUFRYXGBkaGxwdHh8";

/// Salted one-way password hashing (Argon2id, crate default cost).
///
/// Hashes are stored in PHC string format, so the cost parameters and salt
/// travel with the hash and verification always uses the parameters the
/// hash was produced with.
#[derive(Clone, Default)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Create a hasher with the Argon2id default cost parameters.
    ///
    /// # Returns
    /// Configured PasswordHasher instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// PHC string (`$argon2id$v=19$...`) holding parameters, salt and digest
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 refused the input
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Compare `password` against `stored_hash`.
    ///
    /// The digest comparison is constant time.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to check
    /// * `stored_hash` - PHC string produced by [`PasswordHasher::hash`]
    ///
    /// # Returns
    /// `true` on match, `false` on mismatch
    ///
    /// # Errors
    /// * `CorruptHash` - `stored_hash` is not a PHC string Argon2 can verify
    pub fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| PasswordError::CorruptHash(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::CorruptHash(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("correct-pw").expect("Failed to hash password");

        assert!(hash.starts_with("$argon2id$"));
        assert_eq!(hasher.verify("correct-pw", &hash), Ok(true));
        assert_eq!(hasher.verify("wrong-pw", &hash), Ok(false));
    }

    #[test]
    fn test_same_password_different_salt() {
        let hasher = PasswordHasher::new();

        let first = hasher.hash("password").unwrap();
        let second = hasher.hash("password").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_verify_corrupt_hash() {
        let hasher = PasswordHasher::new();

        assert!(matches!(
            hasher.verify("password", "invalid_hash"),
            Err(PasswordError::CorruptHash(_))
        ));
    }

    #[test]
    fn test_placeholder_hash_never_matches() {
        let hasher = PasswordHasher::new();

        assert_eq!(hasher.verify("", PLACEHOLDER_HASH), Ok(false));
        assert_eq!(hasher.verify("correct-pw", PLACEHOLDER_HASH), Ok(false));
    }

    #[test]
    fn test_verify_unsupported_algorithm() {
        let hasher = PasswordHasher::new();
        // Well-formed PHC string for an algorithm Argon2 cannot verify.
        let foreign = "$pbkdf2-sha256$i=1000$c2FsdHNhbHQ$ZGlnZXN0ZGlnZXN0ZGlnZXN0";

        assert!(matches!(
            hasher.verify("password", foreign),
            Err(PasswordError::CorruptHash(_))
        ));
    }
}
