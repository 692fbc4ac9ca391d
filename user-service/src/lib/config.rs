use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Legacy variable holding the token signing secret.
const SECRET_KEY_VAR: &str = "SECRET_KEY";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub authz: AuthzConfig,
    #[serde(default)]
    pub credential_store: CredentialStoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub grpc_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_minutes")]
    pub expiration_minutes: i64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_minutes", &self.expiration_minutes)
            .finish()
    }
}

/// External authorization settings.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthzConfig {
    /// Header carrying `Bearer <token>`, matched exactly.
    #[serde(default = "default_header")]
    pub header: String,

    /// Service account allowed without a token when the peer principal ends
    /// with `/sa/<name>`. Disabled when unset.
    #[serde(default)]
    pub allow_service_account: Option<String>,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            header: default_header(),
            allow_service_account: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CredentialStoreConfig {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl CredentialStoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for CredentialStoreConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_expiration_minutes() -> i64 {
    auth::TokenManager::DEFAULT_LIFETIME_MINUTES
}

fn default_header() -> String {
    "authorization".to_string()
}

fn default_timeout_ms() -> u64 {
    3_000
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `SECRET_KEY` (for `jwt.secret` only)
    /// 2. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    ///
    /// The loaded configuration is validated before it is returned.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .set_override_option("jwt.secret", env::var(SECRET_KEY_VAR).ok())?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret is empty; set JWT__SECRET or SECRET_KEY".to_string(),
            ));
        }

        if self.jwt.expiration_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_minutes must be positive".to_string(),
            ));
        }

        let header = &self.authz.header;
        if header.is_empty() || header.chars().any(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Message(format!(
                "authz.header must be a non-empty lowercase header name, got {:?}",
                header
            )));
        }

        if self.credential_store.timeout_ms == 0 {
            return Err(ConfigError::Message(
                "credential_store.timeout_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/users".to_string(),
            },
            server: ServerConfig {
                http_port: 8000,
                grpc_port: 9000,
            },
            jwt: JwtConfig {
                secret: secret.to_string(),
                expiration_minutes: 60,
            },
            authz: AuthzConfig::default(),
            credential_store: CredentialStoreConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config("supersecret").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        assert!(config("").validate().is_err());
        assert!(config("   ").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_uppercase_header() {
        let mut config = config("supersecret");
        config.authz.header = "Authorization".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config("supersecret"));
        assert!(!rendered.contains("supersecret"));
    }
}
