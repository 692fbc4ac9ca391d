use tonic::Status;

use crate::domain::authz::errors::LoginError;
use crate::domain::authz::login::LoginService;
use crate::proto::users::GetTokenRequest;
use crate::proto::users::GetTokenResponse;
use crate::user::ports::UserRepository;

pub async fn get_token<UR>(
    login: &LoginService<UR>,
    request: GetTokenRequest,
) -> Result<GetTokenResponse, Status>
where
    UR: UserRepository,
{
    match login.authenticate(&request.username, &request.password).await {
        Ok(token) => Ok(GetTokenResponse { token }),
        Err(err @ (LoginError::InvalidCredentials | LoginError::NotFound)) => {
            tracing::debug!(error = %err, "Login rejected");
            Err(err.into())
        }
        Err(err) => Err(err.into()),
    }
}
