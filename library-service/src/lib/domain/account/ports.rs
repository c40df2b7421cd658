use async_trait::async_trait;
use auth::IssuedToken;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::RegisterCommand;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Check a username/password pair and issue an access token.
    ///
    /// # Arguments
    /// * `subject` - Claimed username
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed access token for the subject
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown subject or wrong password
    /// * `Token` - Token generation failed
    async fn login(&self, subject: &str, password: &str) -> Result<IssuedToken, AccountError>;

    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Subject, validated email, and plaintext password
    ///
    /// # Returns
    /// Created account
    ///
    /// # Errors
    /// * `InvalidSubject` / `PasswordTooShort` - Input rejected
    /// * `SubjectTaken` / `EmailTaken` - Uniqueness violated
    /// * `Hashing` - Password hashing failed
    /// * `Store` - Credential store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError>;

    /// Resolve the subject behind a bearer token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is missing a subject, malformed, forged or expired
    fn current_subject(&self, token: &str) -> Result<String, AccountError>;
}
