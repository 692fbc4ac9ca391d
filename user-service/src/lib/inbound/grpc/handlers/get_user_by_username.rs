use tonic::Status;

use crate::domain::user::models::Username;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::GetUserByUsernameRequest;
use crate::proto::users::GetUserByUsernameResponse;

pub async fn get_user_by_username<S>(
    service: &S,
    request: GetUserByUsernameRequest,
) -> Result<GetUserByUsernameResponse, Status>
where
    S: UserServicePort,
{
    // A name that could never be registered is simply not found.
    let username =
        Username::new(request.username).map_err(|_| Status::not_found("User not found"))?;

    let user = service.get_user_by_username(&username).await?;

    Ok(GetUserByUsernameResponse {
        success: true,
        user: Some(user.into()),
    })
}
