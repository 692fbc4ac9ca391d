use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use super::credential;
use super::handlers::add_user;
use super::handlers::delete_user_by_id;
use super::handlers::get_token;
use super::handlers::get_user_by_id;
use super::handlers::get_user_by_username;
use super::handlers::get_username_by_id;
use super::handlers::update_user_info;
use crate::domain::authz::guard::OwnershipGuard;
use crate::domain::authz::login::LoginService;
use crate::domain::user::service::UserService;
use crate::proto::users::users_server::Users;
use crate::proto::users::AddUserRequest;
use crate::proto::users::AddUserResponse;
use crate::proto::users::DeleteUserByIdRequest;
use crate::proto::users::DeleteUserByIdResponse;
use crate::proto::users::GetTokenRequest;
use crate::proto::users::GetTokenResponse;
use crate::proto::users::GetUserByIdRequest;
use crate::proto::users::GetUserByIdResponse;
use crate::proto::users::GetUserByUsernameRequest;
use crate::proto::users::GetUserByUsernameResponse;
use crate::proto::users::GetUsernameByIdRequest;
use crate::proto::users::GetUsernameByIdResponse;
use crate::proto::users::UpdateUserInfoRequest;
use crate::proto::users::UpdateUserInfoResponse;
use crate::user::ports::UserRepository;

pub struct UsersGrpcService<UR>
where
    UR: UserRepository,
{
    users: Arc<UserService<UR>>,
    login: Arc<LoginService<UR>>,
    guard: OwnershipGuard,
    credential_header: String,
}

impl<UR> UsersGrpcService<UR>
where
    UR: UserRepository,
{
    /// `credential_header` is the lowercase metadata key carrying `Bearer <token>`.
    pub fn new(
        users: Arc<UserService<UR>>,
        login: Arc<LoginService<UR>>,
        guard: OwnershipGuard,
        credential_header: impl Into<String>,
    ) -> Self {
        Self {
            users,
            login,
            guard,
            credential_header: credential_header.into(),
        }
    }
}

#[tonic::async_trait]
impl<UR> Users for UsersGrpcService<UR>
where
    UR: UserRepository,
{
    async fn get_token(
        &self,
        request: Request<GetTokenRequest>,
    ) -> Result<Response<GetTokenResponse>, Status> {
        let response = get_token::get_token(&self.login, request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn add_user(
        &self,
        request: Request<AddUserRequest>,
    ) -> Result<Response<AddUserResponse>, Status> {
        let response = add_user::add_user(self.users.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_user_by_id(
        &self,
        request: Request<GetUserByIdRequest>,
    ) -> Result<Response<GetUserByIdResponse>, Status> {
        let response =
            get_user_by_id::get_user_by_id(self.users.as_ref(), request.into_inner()).await?;
        Ok(Response::new(response))
    }

    async fn get_user_by_username(
        &self,
        request: Request<GetUserByUsernameRequest>,
    ) -> Result<Response<GetUserByUsernameResponse>, Status> {
        let response =
            get_user_by_username::get_user_by_username(self.users.as_ref(), request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn get_username_by_id(
        &self,
        request: Request<GetUsernameByIdRequest>,
    ) -> Result<Response<GetUsernameByIdResponse>, Status> {
        let response =
            get_username_by_id::get_username_by_id(self.users.as_ref(), request.into_inner())
                .await?;
        Ok(Response::new(response))
    }

    async fn delete_user_by_id(
        &self,
        request: Request<DeleteUserByIdRequest>,
    ) -> Result<Response<DeleteUserByIdResponse>, Status> {
        let (metadata, _, message) = request.into_parts();
        let credential = credential(&metadata, &self.credential_header);
        let response = delete_user_by_id::delete_user_by_id(
            self.users.as_ref(),
            &self.guard,
            credential,
            message,
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn update_user_info(
        &self,
        request: Request<UpdateUserInfoRequest>,
    ) -> Result<Response<UpdateUserInfoResponse>, Status> {
        let (metadata, _, message) = request.into_parts();
        let credential = credential(&metadata, &self.credential_header);
        let response = update_user_info::update_user_info(
            self.users.as_ref(),
            &self.guard,
            credential,
            message,
        )
        .await?;
        Ok(Response::new(response))
    }
}
