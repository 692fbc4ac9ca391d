use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for identity management operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Hash the password and persist a new identity.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` / `StoreTimeout` - Credential store failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` / `StoreTimeout` - Credential store failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `StoreUnavailable` / `StoreTimeout` - Credential store failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Apply a partial update; a new password is re-hashed.
    ///
    /// Callers must have passed the ownership guard for `id`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - New value is taken
    /// * `StoreUnavailable` / `StoreTimeout` - Credential store failed
    async fn update_user(&self, id: &UserId, command: UpdateUserCommand)
        -> Result<User, UserError>;

    /// Remove an identity.
    ///
    /// Callers must have passed the ownership guard for `id`.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` / `StoreTimeout` - Credential store failed
    async fn delete_user(&self, id: &UserId) -> Result<(), UserError>;
}

/// Credential store: persistence for identity records.
///
/// Implemented by the PostgreSQL backend in production and by an in-memory
/// backend in tests.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new identity and return it with its assigned id.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Overwrite the stored record with the same id.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` / `EmailAlreadyExists` - New value is taken
    /// * `StoreUnavailable` - Store operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn delete(&self, id: &UserId) -> Result<(), UserError>;
}
