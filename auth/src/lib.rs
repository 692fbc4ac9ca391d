//! Authentication primitives for the users service.
//!
//! - Password hashing and verification (Argon2id)
//! - HS256 session tokens bound to an integer identity, one hour lifetime
//! - `Bearer <token>` credential header parsing
//! - Credential-to-token bridging
//!
//! Everything here is synchronous and free of I/O; identity lookup lives in
//! the service that owns the credential store.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SigningKey, TokenManager};
//!
//! let key = Arc::new(SigningKey::from_secret("secret_key_at_least_32_bytes_long!").unwrap());
//! let tokens = TokenManager::new(key);
//! let token = tokens.issue(42).unwrap();
//! assert_eq!(tokens.validate(&token).unwrap(), 42);
//! ```
//!
//! ## Bearer Header
//! ```
//! use auth::parse_bearer;
//!
//! assert_eq!(parse_bearer("Bearer abc.def.ghi").unwrap(), "abc.def.ghi");
//! assert!(parse_bearer("Basic abc").is_err());
//! ```

pub mod authenticator;
pub mod bearer;
pub mod clock;
pub mod jwt;
pub mod password;

pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use bearer::extract_bearer;
pub use bearer::parse_bearer;
pub use bearer::CredentialError;
pub use clock::Clock;
pub use clock::FixedClock;
pub use clock::SystemClock;
pub use jwt::KeyError;
pub use jwt::SessionClaims;
pub use jwt::SigningKey;
pub use jwt::TokenError;
pub use jwt::TokenManager;
pub use password::PasswordError;
pub use password::PasswordHasher;
