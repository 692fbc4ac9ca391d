use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Upper bound for a single credential store call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Run a credential store call, failing with `StoreTimeout` once `limit` elapses.
pub async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, UserError>
where
    F: Future<Output = Result<T, UserError>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| UserError::StoreTimeout(limit))?
}

/// Domain service implementation for identity operations.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
    store_timeout: Duration,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
            store_timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_store_timeout(mut self, store_timeout: Duration) -> Self {
        self.store_timeout = store_timeout;
        self
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = NewUser {
            username: command.username,
            email: command.email,
            password_hash,
        };

        let created = bounded(self.store_timeout, self.repository.create(user)).await?;
        tracing::info!(user_id = %created.id, username = %created.username, "User created");

        Ok(created)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        bounded(self.store_timeout, self.repository.find_by_id(id))
            .await?
            .ok_or(UserError::NotFound(*id))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        bounded(self.store_timeout, self.repository.find_by_username(username))
            .await?
            .ok_or_else(|| UserError::NotFoundByUsername(username.to_string()))
    }

    async fn update_user(
        &self,
        id: &UserId,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user(id).await?;

        if let Some(new_username) = command.username {
            user.username = new_username;
        }

        if let Some(new_email) = command.email {
            user.email = new_email;
        }

        if let Some(new_password) = command.password {
            user.password_hash = self.password_hasher.hash(&new_password)?;
        }

        let updated = bounded(self.store_timeout, self.repository.update(user)).await?;
        tracing::info!(user_id = %updated.id, "User updated");

        Ok(updated)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), UserError> {
        bounded(self.store_timeout, self.repository.delete(id)).await?;
        tracing::info!(user_id = %id, "User deleted");

        Ok(())
    }
}
