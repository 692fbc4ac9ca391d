use tonic::Status;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::AddUserRequest;
use crate::proto::users::AddUserResponse;
use crate::user::errors::UserError;

pub async fn add_user<S>(service: &S, request: AddUserRequest) -> Result<AddUserResponse, Status>
where
    S: UserServicePort,
{
    let username = Username::new(request.desired_username).map_err(UserError::from)?;
    let email = EmailAddress::new(request.email).map_err(UserError::from)?;

    if request.desired_password.is_empty() {
        return Err(Status::invalid_argument("Password must not be empty"));
    }

    let command = CreateUserCommand::new(username, email, request.desired_password);
    let user = service.create_user(command).await?;

    Ok(AddUserResponse {
        success: true,
        created_user: Some(user.into()),
    })
}
