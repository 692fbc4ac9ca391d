use thiserror::Error;

/// Authentication scheme expected in the credential header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Error type for credential header extraction.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing credential header")]
    Missing,

    #[error("Malformed credential header, expected `Bearer <token>`")]
    Malformed,
}

/// Extract the token from an optional credential header value.
///
/// # Errors
/// * `Missing` - No header was sent
/// * `Malformed` - See [`parse_bearer`]
pub fn extract_bearer(header: Option<&str>) -> Result<&str, CredentialError> {
    header
        .ok_or(CredentialError::Missing)
        .and_then(parse_bearer)
}

/// Parse `Bearer <token>` and return the trimmed token.
///
/// The value must split into exactly two segments around the scheme: the
/// literal `Bearer`, whitespace, then a single non-empty token with no
/// embedded whitespace.
///
/// # Errors
/// * `Malformed` - Any other shape
pub fn parse_bearer(header: &str) -> Result<&str, CredentialError> {
    let rest = header
        .trim()
        .strip_prefix(BEARER_SCHEME)
        .ok_or(CredentialError::Malformed)?;

    if !rest.starts_with(char::is_whitespace) {
        return Err(CredentialError::Malformed);
    }

    let token = rest.trim();
    if token.is_empty() || token.contains(BEARER_SCHEME) || token.contains(char::is_whitespace)
    {
        return Err(CredentialError::Malformed);
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Ok("abc.def.ghi"));
        assert_eq!(parse_bearer("  Bearer   abc.def.ghi  "), Ok("abc.def.ghi"));
        assert_eq!(parse_bearer("Bearer\tabc"), Ok("abc"));
    }

    #[test]
    fn test_parse_bearer_rejects_other_shapes() {
        for header in [
            "",
            "Bearer",
            "Bearer ",
            "Bearerabc",
            "bearer abc",
            "Basic dXNlcjpwYXNz",
            "abc.def.ghi",
            "Bearer abc def",
            "Bearer Bearer abc",
            "Bearer abcBearer",
        ] {
            assert_eq!(
                parse_bearer(header),
                Err(CredentialError::Malformed),
                "header {:?} should be rejected",
                header
            );
        }
    }

    #[test]
    fn test_extract_bearer_missing() {
        assert_eq!(extract_bearer(None), Err(CredentialError::Missing));
        assert_eq!(extract_bearer(Some("Bearer tok")), Ok("tok"));
    }
}
