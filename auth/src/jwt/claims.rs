use chrono::Duration;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Claims carried by a session token.
///
/// `uid` is the string-encoded integer identity of the subject, `exp` and
/// `iat` are Unix timestamps in seconds. Only `exp` and `uid` are required on
/// decode; a token without `iat` reads it as 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
    pub uid: String,
}

impl SessionClaims {
    /// Claims for `subject_id`, issued at `issued_at` and valid for `lifetime`.
    pub fn for_subject(subject_id: i64, issued_at: i64, lifetime: Duration) -> Self {
        Self {
            exp: issued_at + lifetime.num_seconds(),
            iat: issued_at,
            uid: subject_id.to_string(),
        }
    }

    /// Parse the subject identity out of `uid`.
    ///
    /// # Errors
    /// * `InvalidSubject` - `uid` is not a base-10 integer
    pub fn subject_id(&self) -> Result<i64, TokenError> {
        self.uid
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidSubject(self.uid.clone()))
    }

    /// A token is usable strictly before `exp`; no clock skew is tolerated.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
