#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::FixedClock;
use auth::SigningKey;
use auth::TokenManager;
use axum::Router;
use chrono::Utc;
use mockall::mock;
use tonic::Request;
use user_service::domain::authz::engine::AuthorizationEngine;
use user_service::domain::authz::guard::OwnershipGuard;
use user_service::domain::authz::login::LoginService;
use user_service::domain::user::models::EmailAddress;
use user_service::domain::user::models::NewUser;
use user_service::domain::user::models::User;
use user_service::domain::user::models::UserId;
use user_service::domain::user::models::Username;
use user_service::domain::user::ports::UserRepository;
use user_service::domain::user::service::UserService;
use user_service::inbound::grpc::AuthorizationGrpcService;
use user_service::inbound::grpc::UsersGrpcService;
use user_service::inbound::http::create_router;
use user_service::outbound::repositories::InMemoryUserRepository;
use user_service::proto::users::users_server::Users;
use user_service::proto::users::AddUserRequest;
use user_service::user::errors::UserError;

pub const SECRET: &str = "integration-test-secret-key-32-bytes-long";
pub const HEADER: &str = "authorization";
pub const START: i64 = 1_700_000_000;

mock! {
    pub CredentialStore {}

    #[async_trait]
    impl UserRepository for CredentialStore {
        async fn create(&self, user: NewUser) -> Result<User, UserError>;
        async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
        async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
        async fn update(&self, user: User) -> Result<User, UserError>;
        async fn delete(&self, id: &UserId) -> Result<(), UserError>;
    }
}

/// The whole service wired in-process, with a clock the test controls.
pub struct TestApp<UR>
where
    UR: UserRepository,
{
    pub repository: Arc<UR>,
    pub clock: Arc<FixedClock>,
    pub tokens: Arc<TokenManager>,
    pub engine: Arc<AuthorizationEngine>,
    pub users: UsersGrpcService<UR>,
    pub authorization: AuthorizationGrpcService,
}

impl TestApp<InMemoryUserRepository> {
    pub fn new() -> Self {
        Self::with_repository(InMemoryUserRepository::new())
    }

    /// Register an identity through `AddUser` and return its id.
    pub async fn register(&self, username: &str, password: &str) -> i64 {
        let response = self
            .users
            .add_user(Request::new(AddUserRequest {
                desired_username: username.to_string(),
                email: format!("{}@example.com", username),
                desired_password: password.to_string(),
            }))
            .await
            .expect("Failed to register user")
            .into_inner();

        response.created_user.expect("Missing created user").user_id
    }
}

impl<UR> TestApp<UR>
where
    UR: UserRepository,
{
    pub fn with_repository(repository: UR) -> Self {
        let repository = Arc::new(repository);
        let clock = Arc::new(FixedClock::at(START));

        let key = Arc::new(SigningKey::from_secret(SECRET).expect("Invalid test secret"));
        let token_manager = TokenManager::new(key).with_clock(clock.clone());
        let authenticator = Arc::new(Authenticator::new(token_manager.clone()));
        let tokens = Arc::new(token_manager);

        let user_service = Arc::new(UserService::new(Arc::clone(&repository)));
        let login_service = Arc::new(LoginService::new(Arc::clone(&repository), authenticator));
        let engine = Arc::new(AuthorizationEngine::new(Arc::clone(&tokens), HEADER));

        let users = UsersGrpcService::new(
            user_service,
            login_service,
            OwnershipGuard::new(Arc::clone(&tokens)),
            HEADER,
        );
        let authorization = AuthorizationGrpcService::new(Arc::clone(&engine));

        Self {
            repository,
            clock,
            tokens,
            engine,
            users,
            authorization,
        }
    }

    pub fn router(&self) -> Router {
        create_router(Arc::clone(&self.engine))
    }

    /// `Bearer <token>` for `user_id`, issued at the current test time.
    pub fn bearer(&self, user_id: i64) -> String {
        format!(
            "Bearer {}",
            self.tokens.issue(user_id).expect("Failed to issue token")
        )
    }

    /// Wrap `message` in a request carrying `credential` as metadata.
    pub fn authorized<T>(&self, message: T, credential: &str) -> Request<T> {
        let mut request = Request::new(message);
        request.metadata_mut().insert(
            HEADER,
            credential.parse().expect("Invalid metadata value"),
        );
        request
    }
}

pub fn stored_user(id: i64, username: &str) -> User {
    User {
        id: UserId(id),
        username: Username::new(username.to_string()).unwrap(),
        email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQ$aGFzaGhhc2g".to_string(),
        created_at: Utc::now(),
    }
}
