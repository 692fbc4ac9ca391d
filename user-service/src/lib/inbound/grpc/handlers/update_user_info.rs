use tonic::Status;

use crate::domain::authz::guard::OwnershipGuard;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::UpdateUserInfoRequest;
use crate::proto::users::UpdateUserInfoResponse;
use crate::user::errors::UserError;

/// Partially update the caller's own identity.
pub async fn update_user_info<S>(
    service: &S,
    guard: &OwnershipGuard,
    credential: Option<&str>,
    request: UpdateUserInfoRequest,
) -> Result<UpdateUserInfoResponse, Status>
where
    S: UserServicePort,
{
    let user_id = guard.authorize(credential, UserId(request.user_id))?;

    let command = UpdateUserCommand {
        username: request
            .desired_username
            .map(Username::new)
            .transpose()
            .map_err(UserError::from)?,
        email: request
            .email
            .map(EmailAddress::new)
            .transpose()
            .map_err(UserError::from)?,
        password: match request.desired_password {
            Some(password) if password.is_empty() => {
                return Err(Status::invalid_argument("Password must not be empty"))
            }
            password => password,
        },
    };

    let user = service.update_user(&user_id, command).await?;

    Ok(UpdateUserInfoResponse {
        success: true,
        updated_user: Some(user.into()),
    })
}
