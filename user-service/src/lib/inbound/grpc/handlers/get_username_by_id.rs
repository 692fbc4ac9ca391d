use tonic::Status;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::GetUsernameByIdRequest;
use crate::proto::users::GetUsernameByIdResponse;

pub async fn get_username_by_id<S>(
    service: &S,
    request: GetUsernameByIdRequest,
) -> Result<GetUsernameByIdResponse, Status>
where
    S: UserServicePort,
{
    let user = service.get_user(&UserId(request.user_id)).await?;

    Ok(GetUsernameByIdResponse {
        username: user.username.as_str().to_string(),
    })
}
