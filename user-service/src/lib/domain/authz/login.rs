use std::sync::Arc;
use std::time::Duration;

use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::authz::errors::LoginError;
use crate::domain::user::service::bounded;
use crate::domain::user::service::DEFAULT_STORE_TIMEOUT;
use crate::user::models::Username;
use crate::user::ports::UserRepository;

/// Exchanges a username and password for a session token.
pub struct LoginService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
    store_timeout: Duration,
}

impl<UR> LoginService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }

    /// Look up `username`, verify `password` against its stored hash and
    /// issue a token naming that identity.
    ///
    /// # Errors
    /// * `NotFound` - No identity with this username
    /// * `InvalidCredentials` - Password does not match
    /// * `StoreUnavailable` - Credential store failed or timed out
    /// * `TokenIssue` - Signing failed
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<String, LoginError> {
        // A name that fails validation cannot have been registered.
        let user = match Username::new(username.to_string()) {
            Ok(username) => {
                bounded(self.store_timeout, self.repository.find_by_username(&username)).await?
            }
            Err(_) => None,
        };

        let Some(user) = user else {
            // Same hashing work as a wrong password, so the two take equally long.
            self.authenticator.reject_unknown(password);
            return Err(LoginError::NotFound);
        };

        let token = self
            .authenticator
            .authenticate(password, &user.password_hash, user.id.as_i64())
            .map_err(|err| match err {
                AuthenticationError::InvalidCredentials => LoginError::InvalidCredentials,
                AuthenticationError::PasswordError(err) => {
                    tracing::warn!(user_id = %user.id, error = %err, "Stored password hash is unusable");
                    LoginError::InvalidCredentials
                }
                AuthenticationError::TokenError(err) => LoginError::TokenIssue(err),
            })?;

        tracing::info!(user_id = %user.id, "Token issued");

        Ok(token)
    }
}
