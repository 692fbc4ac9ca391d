use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::SessionClaims;
use super::errors::TokenError;
use super::keys::SigningKey;
use crate::clock::Clock;
use crate::clock::SystemClock;

/// Issues and validates HS256 session tokens.
///
/// Tokens are self-contained: there is no server-side session table and no
/// revocation list, a token stays valid until its `exp` passes.
#[derive(Clone)]
pub struct TokenManager {
    key: Arc<SigningKey>,
    clock: Arc<dyn Clock>,
    lifetime: Duration,
}

impl TokenManager {
    /// Lifetime of an issued token.
    pub const DEFAULT_LIFETIME_MINUTES: i64 = 60;

    /// Create a token manager signing with `key`, using the system clock and a
    /// one hour token lifetime.
    pub fn new(key: Arc<SigningKey>) -> Self {
        Self {
            key,
            clock: Arc::new(SystemClock),
            lifetime: Duration::minutes(Self::DEFAULT_LIFETIME_MINUTES),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Override the token lifetime.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Issue a signed token for `subject_id`.
    ///
    /// # Returns
    /// Compact JWT (`header.claims.signature`, base64url segments)
    ///
    /// # Errors
    /// * `SigningFailed` - Claims could not be serialized or signed
    pub fn issue(&self, subject_id: i64) -> Result<String, TokenError> {
        let claims = SessionClaims::for_subject(subject_id, self.clock.timestamp(), self.lifetime);

        encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding())
            .map_err(|e| TokenError::SigningFailed(e.to_string()))
    }

    /// Verify a token and return the subject identity it carries.
    ///
    /// # Errors
    /// * `Malformed` - Not a parsable compact JWT or claims are missing
    /// * `InvalidSignature` - Signature or algorithm does not match the key
    /// * `Expired` - Current time is at or past `exp`
    /// * `InvalidSubject` - Signature is valid but `uid` is not an integer
    pub fn validate(&self, token: &str) -> Result<i64, TokenError> {
        self.decode(token)?.subject_id()
    }

    /// Verify a token and return its claims.
    ///
    /// Same checks as [`TokenManager::validate`] except for the subject parse.
    pub fn decode(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against the injected clock, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        let claims = decode::<SessionClaims>(token, self.key.decoding(), &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    TokenError::InvalidSignature
                }
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed(e.to_string()),
            })?
            .claims;

        if claims.is_expired(self.clock.timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
