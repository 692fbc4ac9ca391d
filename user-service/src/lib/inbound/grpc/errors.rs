use tonic::Status;

use crate::domain::authz::errors::GuardError;
use crate::domain::authz::errors::LoginError;
use crate::user::errors::UserError;

impl From<UserError> for Status {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUsername(e) => Status::invalid_argument(e.to_string()),
            UserError::InvalidEmail(e) => Status::invalid_argument(e.to_string()),
            UserError::Password(e) => {
                tracing::error!(error = %e, "Password hashing failed");
                Status::internal("Failed to process password")
            }
            UserError::NotFound(_) | UserError::NotFoundByUsername(_) => {
                Status::not_found("User not found")
            }
            UserError::UsernameAlreadyExists(_) => {
                Status::already_exists("Username is already taken")
            }
            UserError::EmailAlreadyExists(_) => Status::already_exists("Email is already registered"),
            UserError::StoreUnavailable(e) => {
                tracing::warn!(error = %e, "Credential store unavailable");
                Status::unavailable("Credential store unavailable")
            }
            UserError::StoreTimeout(limit) => {
                tracing::warn!(?limit, "Credential store timed out");
                Status::unavailable("Credential store timed out")
            }
        }
    }
}

impl From<LoginError> for Status {
    fn from(err: LoginError) -> Self {
        match err {
            LoginError::InvalidCredentials | LoginError::NotFound => {
                Status::invalid_argument("Invalid username or password")
            }
            LoginError::StoreUnavailable(e) => {
                tracing::warn!(error = %e, "Login aborted, credential store unavailable");
                Status::unavailable("Credential store unavailable")
            }
            LoginError::TokenIssue(e) => {
                tracing::error!(error = %e, "Token issuance failed");
                Status::internal("Failed to issue token")
            }
        }
    }
}

impl From<GuardError> for Status {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::MissingCredential => {
                Status::unauthenticated("Send token along with request")
            }
            GuardError::MalformedCredential | GuardError::InvalidToken(_) => {
                Status::unauthenticated("Invalid or expired token")
            }
            GuardError::Undecodable(_) => Status::internal("Failed to decode token"),
            GuardError::OwnershipMismatch { .. } => {
                Status::permission_denied("cannot modify another identity's resource")
            }
        }
    }
}
