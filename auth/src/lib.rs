//! Authentication core library
//!
//! Provides the authentication building blocks used by the HTTP service:
//! - Password hashing (Argon2id, 72-byte UTF-8-safe input truncation)
//! - Signed, time-limited bearer tokens (HMAC JWT) with an injectable clock
//! - Credential store traits implemented by persistence backends
//! - Authentication coordination (login, token resolution, registration)
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("my_password", "corrupted"));
//! ```
//!
//! ## Tokens
//! ```
//! use std::sync::Arc;
//!
//! use auth::{SystemClock, TokenService, TokenSettings};
//!
//! let settings = TokenSettings::new("secret_key_at_least_32_bytes_long!");
//! let tokens = TokenService::new(&settings, Arc::new(SystemClock)).unwrap();
//!
//! let issued = tokens.issue("alice").unwrap();
//! assert_eq!(tokens.validate(&issued.access_token), Some("alice".to_string()));
//! assert_eq!(tokens.validate("not-a-token"), None);
//! ```

pub mod authenticator;
pub mod clock;
pub mod credentials;
pub mod jwt;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::DemoAccount;
pub use authenticator::RegistrationError;
pub use authenticator::MIN_PASSWORD_LENGTH;
pub use clock::Clock;
pub use clock::ManualClock;
pub use clock::SystemClock;
pub use credentials::ConflictField;
pub use credentials::Credential;
pub use credentials::CredentialLookup;
pub use credentials::CredentialStore;
pub use credentials::StoreError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordParams;
pub use token::ConfigurationError;
pub use token::IssuedToken;
pub use token::TokenService;
pub use token::TokenSettings;
