use std::sync::Arc;

use auth::TokenManager;

use crate::domain::authz::errors::GuardError;
use crate::user::models::UserId;

/// Checks that a mutation targets the identity the caller's token names.
#[derive(Clone)]
pub struct OwnershipGuard {
    tokens: Arc<TokenManager>,
}

impl OwnershipGuard {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self { tokens }
    }

    /// Resolve the caller from `credential` (a `Bearer <token>` header value)
    /// and require it to equal `target`.
    ///
    /// # Returns
    /// The caller's identity, equal to `target`.
    ///
    /// # Errors
    /// * `MissingCredential` / `MalformedCredential` - No usable header
    /// * `InvalidToken` - Bad signature, malformed or expired token
    /// * `Undecodable` - Token verified but its subject is not an integer id
    /// * `OwnershipMismatch` - Token names a different identity
    pub fn authorize(&self, credential: Option<&str>, target: UserId) -> Result<UserId, GuardError> {
        let token = auth::extract_bearer(credential)?;
        let caller = UserId(self.tokens.validate(token)?);

        if caller != target {
            tracing::info!(caller = %caller, target = %target, "Ownership check failed");
            return Err(GuardError::OwnershipMismatch { caller, target });
        }

        Ok(caller)
    }
}
