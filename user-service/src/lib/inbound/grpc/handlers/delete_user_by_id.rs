use tonic::Status;

use crate::domain::authz::guard::OwnershipGuard;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::proto::users::DeleteUserByIdRequest;
use crate::proto::users::DeleteUserByIdResponse;

/// Delete the caller's own identity. The guard runs before the store is touched.
pub async fn delete_user_by_id<S>(
    service: &S,
    guard: &OwnershipGuard,
    credential: Option<&str>,
    request: DeleteUserByIdRequest,
) -> Result<DeleteUserByIdResponse, Status>
where
    S: UserServicePort,
{
    let user_id = guard.authorize(credential, UserId(request.user_id))?;

    service.delete_user(&user_id).await?;

    Ok(DeleteUserByIdResponse { success: true })
}
