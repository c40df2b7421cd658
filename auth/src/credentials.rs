use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Stored login credential.
///
/// The password hash is opaque output of [`crate::PasswordHasher`]; the
/// `Debug` rendering never shows it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub subject: String,
    pub email: String,
    pub password_hash: String,
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("subject", &self.subject)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}

/// Field whose uniqueness constraint fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictField {
    Subject,
    Email,
}

/// Errors reported by a credential store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Uniqueness constraint violated on {0:?}")]
    Conflict(ConflictField),

    #[error("Credential store error: {0}")]
    Backend(String),
}

/// Read access to stored credentials.
#[async_trait]
pub trait CredentialLookup: Send + Sync + 'static {
    /// Find the credential registered under `subject`.
    ///
    /// # Returns
    /// Optional credential (None if not found)
    ///
    /// # Errors
    /// * `Backend` - Store operation failed
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Credential>, StoreError>;
}

/// Read and write access to stored credentials.
///
/// Implementations must enforce subject and email uniqueness atomically on
/// `insert`; the existence checks alone do not guard against concurrent
/// registrations.
#[async_trait]
pub trait CredentialStore: CredentialLookup {
    async fn exists_by_subject(&self, subject: &str) -> Result<bool, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    /// Persist a new credential.
    ///
    /// # Errors
    /// * `Conflict` - Subject or email is already taken
    /// * `Backend` - Store operation failed
    async fn insert(
        &self,
        subject: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Credential, StoreError>;
}
