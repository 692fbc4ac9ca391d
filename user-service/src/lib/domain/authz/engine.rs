use std::sync::Arc;

use auth::CredentialError;
use auth::TokenManager;

use crate::domain::authz::decision::AuthorizationDecision;
use crate::domain::authz::decision::CheckAttributes;
use crate::domain::authz::decision::DecisionReason;

/// Allows peers whose principal names a given service account.
///
/// A principal such as `spiffe://cluster.local/ns/default/sa/gateway` matches
/// the rule for `gateway`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccountRule {
    suffix: String,
}

impl ServiceAccountRule {
    /// Returns `None` for a blank account name.
    pub fn new(account: &str) -> Option<Self> {
        let account = account.trim();
        if account.is_empty() {
            return None;
        }

        Some(Self {
            suffix: format!("/sa/{}", account),
        })
    }

    pub fn matches(&self, principal: &str) -> bool {
        principal.ends_with(&self.suffix)
    }
}

/// Decides whether a proxied request carries a usable session token.
///
/// Holds read-only state only; one engine is shared by every connection.
#[derive(Clone)]
pub struct AuthorizationEngine {
    tokens: Arc<TokenManager>,
    header: String,
    service_account: Option<ServiceAccountRule>,
}

impl AuthorizationEngine {
    /// `header` is the lowercase name of the credential header.
    pub fn new(tokens: Arc<TokenManager>, header: impl Into<String>) -> Self {
        Self {
            tokens,
            header: header.into(),
            service_account: None,
        }
    }

    pub fn with_service_account(mut self, rule: Option<ServiceAccountRule>) -> Self {
        self.service_account = rule;
        self
    }

    /// Evaluate one check request. Never fails: every problem becomes a deny.
    pub fn check(&self, request: &CheckAttributes) -> AuthorizationDecision {
        let decision = self.decide(request);

        if decision.is_allowed() {
            tracing::info!(host = %request.host, path = %request.path, "[ext-authz] allowed");
        } else {
            tracing::info!(
                host = %request.host,
                path = %request.path,
                reason = ?decision.reason,
                "[ext-authz] denied"
            );
        }

        decision
    }

    fn decide(&self, request: &CheckAttributes) -> AuthorizationDecision {
        if let (Some(rule), Some(principal)) =
            (&self.service_account, request.source_principal.as_deref())
        {
            if rule.matches(principal) {
                tracing::debug!(principal, "Service account allowed without token");
                return AuthorizationDecision::allow();
            }
        }

        let token = match auth::extract_bearer(request.header(&self.header)) {
            Ok(token) => token,
            Err(CredentialError::Missing) => {
                return AuthorizationDecision::deny(DecisionReason::MissingCredential)
            }
            Err(CredentialError::Malformed) => {
                return AuthorizationDecision::deny(DecisionReason::MalformedCredential)
            }
        };

        match self.tokens.validate(token) {
            Ok(user_id) => {
                tracing::debug!(user_id, "Token accepted");
                AuthorizationDecision::allow()
            }
            Err(err) => {
                tracing::debug!(error = %err, "Token rejected");
                AuthorizationDecision::deny(DecisionReason::InvalidOrExpiredToken)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use auth::FixedClock;
    use auth::SigningKey;
    use chrono::Duration;

    use super::*;
    use crate::domain::authz::decision::Outcome;
    use crate::domain::authz::decision::RESULT_HEADER;

    const SECRET: &str = "engine_test_secret_key_32_bytes_long";

    fn engine_at(clock: Arc<FixedClock>) -> AuthorizationEngine {
        let key = Arc::new(SigningKey::from_secret(SECRET).unwrap());
        let tokens = TokenManager::new(key).with_clock(clock);
        AuthorizationEngine::new(Arc::new(tokens), "authorization")
    }

    fn request_with(header: Option<&str>) -> CheckAttributes {
        let mut headers = HashMap::new();
        if let Some(value) = header {
            headers.insert("authorization".to_string(), value.to_string());
        }

        CheckAttributes {
            host: "api.example.com".to_string(),
            path: "/orders".to_string(),
            headers,
            source_principal: None,
        }
    }

    #[test]
    fn test_valid_token_allows() {
        let clock = Arc::new(FixedClock::at(1_700_000_000));
        let engine = engine_at(clock);
        let token = engine.tokens.issue(7).unwrap();

        let decision = engine.check(&request_with(Some(&format!("Bearer {}", token))));

        assert_eq!(decision.outcome, Outcome::Allow);
        assert_eq!(decision.reason, DecisionReason::None);
        assert_eq!(decision.response_metadata[RESULT_HEADER], "allowed");
    }

    #[test]
    fn test_missing_header_denies() {
        let engine = engine_at(Arc::new(FixedClock::now()));

        let decision = engine.check(&request_with(None));

        assert_eq!(decision.outcome, Outcome::Deny);
        assert_eq!(decision.reason, DecisionReason::MissingCredential);
        assert_eq!(decision.http_status(), 403);
        assert_eq!(decision.body(), Some("Bad credentials"));
        assert_eq!(decision.response_metadata[RESULT_HEADER], "denied");
    }

    #[test]
    fn test_wrong_scheme_denies() {
        let engine = engine_at(Arc::new(FixedClock::now()));

        for header in ["Basic dXNlcjpwYXNz", "Bearer", "Bearer ", "token-without-scheme"] {
            let decision = engine.check(&request_with(Some(header)));
            assert_eq!(decision.outcome, Outcome::Deny, "header {:?}", header);
            assert_ne!(decision.reason, DecisionReason::None);
        }
    }

    #[test]
    fn test_garbage_token_denies() {
        let engine = engine_at(Arc::new(FixedClock::now()));

        let decision = engine.check(&request_with(Some("Bearer not.a.jwt")));

        assert_eq!(decision.reason, DecisionReason::InvalidOrExpiredToken);
    }

    #[test]
    fn test_foreign_key_denies() {
        let engine = engine_at(Arc::new(FixedClock::now()));
        let other_key = Arc::new(SigningKey::from_secret("some_other_secret_key_entirely").unwrap());
        let foreign = TokenManager::new(other_key).issue(7).unwrap();

        let decision = engine.check(&request_with(Some(&format!("Bearer {}", foreign))));

        assert_eq!(decision.reason, DecisionReason::InvalidOrExpiredToken);
    }

    #[test]
    fn test_expired_token_denies() {
        let clock = Arc::new(FixedClock::at(1_700_000_000));
        let engine = engine_at(clock.clone());
        let header = format!("Bearer {}", engine.tokens.issue(7).unwrap());

        clock.advance(Duration::minutes(59));
        assert!(engine.check(&request_with(Some(&header))).is_allowed());

        clock.advance(Duration::minutes(1));
        let decision = engine.check(&request_with(Some(&header)));
        assert_eq!(decision.reason, DecisionReason::InvalidOrExpiredToken);
    }

    #[test]
    fn test_custom_header_name() {
        let clock = Arc::new(FixedClock::now());
        let key = Arc::new(SigningKey::from_secret(SECRET).unwrap());
        let tokens = Arc::new(TokenManager::new(key).with_clock(clock));
        let engine = AuthorizationEngine::new(tokens.clone(), "x-session");

        let mut request = request_with(Some(&format!("Bearer {}", tokens.issue(1).unwrap())));
        assert!(!engine.check(&request).is_allowed());

        let value = request.headers.remove("authorization").unwrap();
        request.headers.insert("x-session".to_string(), value);
        assert!(engine.check(&request).is_allowed());
    }

    #[test]
    fn test_service_account_rule() {
        let engine = engine_at(Arc::new(FixedClock::now()))
            .with_service_account(ServiceAccountRule::new("gateway"));

        let mut request = request_with(None);
        request.source_principal =
            Some("spiffe://cluster.local/ns/default/sa/gateway".to_string());
        assert!(engine.check(&request).is_allowed());

        request.source_principal =
            Some("spiffe://cluster.local/ns/default/sa/billing".to_string());
        assert_eq!(
            engine.check(&request).reason,
            DecisionReason::MissingCredential
        );
    }

    #[test]
    fn test_service_account_rule_off_by_default() {
        let engine = engine_at(Arc::new(FixedClock::now()));

        let mut request = request_with(None);
        request.source_principal =
            Some("spiffe://cluster.local/ns/default/sa/gateway".to_string());

        assert!(!engine.check(&request).is_allowed());
    }

    #[test]
    fn test_blank_service_account_rejected() {
        assert!(ServiceAccountRule::new("  ").is_none());
    }
}
