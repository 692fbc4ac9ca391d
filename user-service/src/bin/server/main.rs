use std::sync::Arc;

use auth::Authenticator;
use auth::SigningKey;
use auth::TokenManager;
use sqlx::postgres::PgPoolOptions;
use tonic::transport::Server;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use user_service::config::Config;
use user_service::domain::authz::engine::AuthorizationEngine;
use user_service::domain::authz::engine::ServiceAccountRule;
use user_service::domain::authz::guard::OwnershipGuard;
use user_service::domain::authz::login::LoginService;
use user_service::domain::user::service::UserService;
use user_service::inbound::grpc::AuthorizationGrpcService;
use user_service::inbound::grpc::UsersGrpcService;
use user_service::inbound::http::create_router;
use user_service::outbound::repositories::PostgresUserRepository;
use user_service::proto::envoy::service::auth::v3::authorization_server::AuthorizationServer;
use user_service::proto::users::users_server::UsersServer;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "user-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        grpc_port = config.server.grpc_port,
        token_lifetime_minutes = config.jwt.expiration_minutes,
        credential_header = %config.authz.header,
        store_timeout_ms = config.credential_store.timeout_ms,
        "Configuration loaded"
    );

    // No listener binds without a usable signing key.
    let signing_key = Arc::new(SigningKey::from_secret(&config.jwt.secret)?);
    let tokens = TokenManager::new(signing_key)
        .with_lifetime(chrono::Duration::minutes(config.jwt.expiration_minutes));
    let authenticator = Arc::new(Authenticator::new(tokens.clone()));
    let tokens = Arc::new(tokens);

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(config.credential_store.timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let store_timeout = config.credential_store.timeout();
    let user_repository = Arc::new(PostgresUserRepository::new(pg_pool));
    let user_service = Arc::new(
        UserService::new(Arc::clone(&user_repository)).with_store_timeout(store_timeout),
    );
    let login_service = Arc::new(
        LoginService::new(Arc::clone(&user_repository), authenticator)
            .with_store_timeout(store_timeout),
    );

    let service_account = config
        .authz
        .allow_service_account
        .as_deref()
        .and_then(ServiceAccountRule::new);
    if service_account.is_some() {
        tracing::warn!("Service account rule enabled, matching peers skip token validation");
    }
    let engine = Arc::new(
        AuthorizationEngine::new(Arc::clone(&tokens), config.authz.header.clone())
            .with_service_account(service_account),
    );

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http ext-authz server listening"
    );

    let http_application = create_router(Arc::clone(&engine));
    let http_server =
        tokio::spawn(async move { axum::serve(http_listener, http_application).await });

    let grpc_address = format!("0.0.0.0:{}", config.server.grpc_port).parse()?;
    let users_service = UsersGrpcService::new(
        user_service,
        login_service,
        OwnershipGuard::new(tokens),
        config.authz.header.clone(),
    );
    let authorization_service = AuthorizationGrpcService::new(engine);
    tracing::info!(
        address = %grpc_address,
        port = config.server.grpc_port,
        protocol = "grpc",
        "gRpc server listening"
    );

    let grpc_server = tokio::spawn(async move {
        Server::builder()
            .add_service(UsersServer::new(users_service))
            .add_service(AuthorizationServer::new(authorization_service))
            .serve(grpc_address)
            .await
    });

    match tokio::try_join!(http_server, grpc_server) {
        Ok((http, grpc)) => {
            if let Err(e) = http {
                tracing::error!(error = %e, "Http server failed");
            }
            if let Err(e) = grpc {
                tracing::error!(error = %e, "gRpc server failed");
            }
            tracing::info!("Servers exited");
        }
        Err(e) => tracing::error!(error = %e, "Server task panicked"),
    };

    Ok(())
}
