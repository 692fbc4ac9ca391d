use tonic::metadata::MetadataMap;

pub mod errors;
pub mod grpc_authz_server;
pub mod grpc_user_server;
pub mod handlers;

pub use grpc_authz_server::AuthorizationGrpcService;
pub use grpc_user_server::UsersGrpcService;

/// Credential header value from call metadata.
///
/// A value that is not visible ASCII is returned as empty so it is rejected
/// as malformed rather than treated as absent.
pub(crate) fn credential<'a>(metadata: &'a MetadataMap, header: &str) -> Option<&'a str> {
    metadata
        .get(header)
        .map(|value| value.to_str().unwrap_or_default())
}
