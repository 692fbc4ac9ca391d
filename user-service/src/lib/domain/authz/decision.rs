use std::collections::BTreeMap;
use std::collections::HashMap;

/// Response header telling the proxy how the check ended.
pub const RESULT_HEADER: &str = "x-ext-authz-check-result";
pub const RESULT_ALLOWED: &str = "allowed";
pub const RESULT_DENIED: &str = "denied";

/// Body of every deny response.
pub const DENY_BODY: &str = "Bad credentials";

/// HTTP status the proxy returns to the client on deny.
pub const DENY_STATUS: u16 = 403;

/// Transport-neutral view of the request a proxy asks about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckAttributes {
    pub host: String,
    pub path: String,
    /// Request headers, keyed by lowercase name.
    pub headers: HashMap<String, String>,
    /// Principal of the calling peer (from its client certificate), if any.
    pub source_principal: Option<String>,
}

impl CheckAttributes {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    None,
    MissingCredential,
    MalformedCredential,
    InvalidOrExpiredToken,
    OwnershipMismatch,
}

/// Allow/deny verdict for one request, with the headers to hand back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationDecision {
    pub outcome: Outcome,
    pub reason: DecisionReason,
    pub response_metadata: BTreeMap<String, String>,
}

impl AuthorizationDecision {
    pub fn allow() -> Self {
        Self {
            outcome: Outcome::Allow,
            reason: DecisionReason::None,
            response_metadata: BTreeMap::from([(
                RESULT_HEADER.to_string(),
                RESULT_ALLOWED.to_string(),
            )]),
        }
    }

    pub fn deny(reason: DecisionReason) -> Self {
        Self {
            outcome: Outcome::Deny,
            reason,
            response_metadata: BTreeMap::from([(
                RESULT_HEADER.to_string(),
                RESULT_DENIED.to_string(),
            )]),
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.outcome == Outcome::Allow
    }

    /// 200 on allow, 403 on deny.
    pub fn http_status(&self) -> u16 {
        match self.outcome {
            Outcome::Allow => 200,
            Outcome::Deny => DENY_STATUS,
        }
    }

    /// Body the proxy should send to the client; none on allow.
    pub fn body(&self) -> Option<&'static str> {
        match self.outcome {
            Outcome::Allow => None,
            Outcome::Deny => Some(DENY_BODY),
        }
    }
}
