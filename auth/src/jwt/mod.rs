pub mod claims;
pub mod errors;
pub mod keys;
pub mod manager;

pub use claims::SessionClaims;
pub use errors::KeyError;
pub use errors::TokenError;
pub use keys::SigningKey;
pub use manager::TokenManager;
