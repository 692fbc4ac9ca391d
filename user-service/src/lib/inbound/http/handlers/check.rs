use std::collections::HashMap;

use axum::extract::State;
use axum::http::header;
use axum::http::HeaderMap;
use axum::http::HeaderName;
use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::response::IntoResponse;
use axum::response::Response;

use crate::domain::authz::decision::AuthorizationDecision;
use crate::domain::authz::decision::CheckAttributes;
use crate::inbound::http::router::AppState;

/// Client certificate details forwarded by Envoy.
///
/// Any client can send this header. It names a trustworthy peer only when the
/// proxy is configured to sanitize or overwrite it (Envoy
/// `forward_client_cert_details: SANITIZE_SET`).
const FORWARDED_CLIENT_CERT: &str = "x-forwarded-client-cert";

pub async fn check(State(state): State<AppState>, uri: Uri, headers: HeaderMap) -> CheckReply {
    let attributes = check_attributes(&uri, &headers);
    CheckReply(state.engine.check(&attributes))
}

/// Decision rendered as the response an HTTP authorization service gives a proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReply(pub AuthorizationDecision);

impl IntoResponse for CheckReply {
    fn into_response(self) -> Response {
        let decision = self.0;
        let status =
            StatusCode::from_u16(decision.http_status()).unwrap_or(StatusCode::FORBIDDEN);

        let mut response = match decision.body() {
            Some(body) => (status, body).into_response(),
            None => status.into_response(),
        };

        let headers = response.headers_mut();
        for (name, value) in &decision.response_metadata {
            if let (Ok(name), Ok(value)) = (
                HeaderName::try_from(name.as_str()),
                HeaderValue::try_from(value.as_str()),
            ) {
                headers.insert(name, value);
            }
        }

        response
    }
}

fn check_attributes(uri: &Uri, headers: &HeaderMap) -> CheckAttributes {
    let mut flattened = HashMap::with_capacity(headers.len());
    for (name, value) in headers {
        // Values that are not visible ASCII become empty and fail the bearer parse.
        flattened
            .entry(name.as_str().to_string())
            .or_insert_with(|| value.to_str().unwrap_or_default().to_string());
    }

    let host = headers
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.host())
        .unwrap_or_default()
        .to_string();

    let source_principal = headers
        .get(FORWARDED_CLIENT_CERT)
        .and_then(|value| value.to_str().ok())
        .and_then(client_cert_uri);

    CheckAttributes {
        host,
        path: uri.path().to_string(),
        headers: flattened,
        source_principal,
    }
}

/// The `URI=` element of the first entry of an `x-forwarded-client-cert` value.
///
/// The result feeds the service-account rule, which must only be enabled for
/// the HTTP surface behind a proxy that sanitizes the header; see
/// [`FORWARDED_CLIENT_CERT`].
fn client_cert_uri(value: &str) -> Option<String> {
    value
        .split(',')
        .next()?
        .split(';')
        .find_map(|pair| pair.trim().strip_prefix("URI="))
        .map(|uri| uri.trim_matches('"').to_string())
        .filter(|uri| !uri.is_empty())
}
