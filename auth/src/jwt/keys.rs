use std::fmt;

use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;

use super::errors::KeyError;

/// Process-wide HMAC-SHA256 signing key.
///
/// Built once at startup from the configured secret and shared read-only
/// (typically behind an `Arc`) for the lifetime of the process. Rotating the
/// key requires a restart.
#[derive(Clone)]
pub struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SigningKey {
    /// Derive the key pair from a shared secret.
    ///
    /// # Errors
    /// * `EmptySecret` - Secret is empty or whitespace only. An empty HMAC key
    ///   would sign tokens anybody can forge, so it is refused outright.
    pub fn from_secret(secret: &str) -> Result<Self, KeyError> {
        if secret.trim().is_empty() {
            return Err(KeyError::EmptySecret);
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    pub(crate) fn encoding(&self) -> &EncodingKey {
        &self.encoding
    }

    pub(crate) fn decoding(&self) -> &DecodingKey {
        &self.decoding
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}
