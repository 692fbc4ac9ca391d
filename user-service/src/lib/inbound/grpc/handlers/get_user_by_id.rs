use tonic::Status;

use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::GetUserByIdRequest;
use crate::proto::users::GetUserByIdResponse;

pub async fn get_user_by_id<S>(
    service: &S,
    request: GetUserByIdRequest,
) -> Result<GetUserByIdResponse, Status>
where
    S: UserServicePort,
{
    let user = service.get_user(&UserId(request.user_id)).await?;

    Ok(GetUserByIdResponse {
        success: true,
        user: Some(user.into()),
    })
}
