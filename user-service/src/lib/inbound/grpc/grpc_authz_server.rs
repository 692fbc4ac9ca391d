use std::sync::Arc;

use tonic::Request;
use tonic::Response;
use tonic::Status;

use crate::domain::authz::decision::AuthorizationDecision;
use crate::domain::authz::decision::CheckAttributes;
use crate::domain::authz::engine::AuthorizationEngine;
use crate::proto::envoy::config::core::v3::HeaderValue;
use crate::proto::envoy::config::core::v3::HeaderValueOption;
use crate::proto::envoy::r#type::v3::HttpStatus;
use crate::proto::envoy::r#type::v3::StatusCode;
use crate::proto::envoy::service::auth::v3::authorization_server::Authorization;
use crate::proto::envoy::service::auth::v3::check_response::HttpResponse;
use crate::proto::envoy::service::auth::v3::CheckRequest;
use crate::proto::envoy::service::auth::v3::CheckResponse;
use crate::proto::envoy::service::auth::v3::DeniedHttpResponse;
use crate::proto::envoy::service::auth::v3::OkHttpResponse;
use crate::proto::google::rpc::Status as RpcStatus;

/// gRPC status codes carried inside `CheckResponse.status`.
const RPC_OK: i32 = 0;
const RPC_PERMISSION_DENIED: i32 = 7;

/// Envoy `ext_authz` gRPC service backed by the authorization engine.
pub struct AuthorizationGrpcService {
    engine: Arc<AuthorizationEngine>,
}

impl AuthorizationGrpcService {
    pub fn new(engine: Arc<AuthorizationEngine>) -> Self {
        Self { engine }
    }
}

#[tonic::async_trait]
impl Authorization for AuthorizationGrpcService {
    async fn check(
        &self,
        request: Request<CheckRequest>,
    ) -> Result<Response<CheckResponse>, Status> {
        let attributes = CheckAttributes::from(request.into_inner());
        let decision = self.engine.check(&attributes);

        Ok(Response::new(check_response(&decision)))
    }
}

/// Flattens the nested Envoy attribute context. Absent parts become empty.
impl From<CheckRequest> for CheckAttributes {
    fn from(request: CheckRequest) -> Self {
        let attributes = request.attributes.unwrap_or_default();

        let source_principal = attributes
            .source
            .map(|peer| peer.principal)
            .filter(|principal| !principal.is_empty());

        let http = attributes
            .request
            .and_then(|request| request.http)
            .unwrap_or_default();

        CheckAttributes {
            host: http.host,
            path: http.path,
            headers: http.headers.into_iter().collect(),
            source_principal,
        }
    }
}

fn check_response(decision: &AuthorizationDecision) -> CheckResponse {
    let headers: Vec<HeaderValueOption> = decision
        .response_metadata
        .iter()
        .map(|(key, value)| HeaderValueOption {
            header: Some(HeaderValue {
                key: key.clone(),
                value: value.clone(),
            }),
        })
        .collect();

    match decision.body() {
        None => CheckResponse {
            status: Some(RpcStatus {
                code: RPC_OK,
                message: String::new(),
            }),
            http_response: Some(HttpResponse::OkResponse(OkHttpResponse {
                headers,
                headers_to_remove: Vec::new(),
            })),
        },
        Some(body) => CheckResponse {
            status: Some(RpcStatus {
                code: RPC_PERMISSION_DENIED,
                message: String::new(),
            }),
            http_response: Some(HttpResponse::DeniedResponse(DeniedHttpResponse {
                status: Some(HttpStatus {
                    code: StatusCode::Forbidden as i32,
                }),
                headers,
                body: body.to_string(),
            })),
        },
    }
}
