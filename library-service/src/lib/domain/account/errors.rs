use auth::AuthenticationError;
use auth::RegistrationError;
use thiserror::Error;

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Top-level error for all account operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    // Authentication outcomes, deliberately generic
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    // Registration input errors
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Subject cannot be empty")]
    InvalidSubject,

    #[error("Password too short: minimum {min} characters, got {actual}")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    // Conflicts, safe to disclose
    #[error("Subject already registered: {0}")]
    SubjectTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    // Infrastructure errors
    #[error("Credential store error: {0}")]
    Store(String),

    #[error("Token generation failed: {0}")]
    Token(String),
}

impl From<AuthenticationError> for AccountError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => AccountError::InvalidCredentials,
            AuthenticationError::Unauthenticated => AccountError::Unauthenticated,
            AuthenticationError::TokenIssuance(e) => AccountError::Token(e.to_string()),
        }
    }
}

impl From<RegistrationError> for AccountError {
    fn from(err: RegistrationError) -> Self {
        match err {
            RegistrationError::InvalidSubject => AccountError::InvalidSubject,
            RegistrationError::PasswordTooShort { min, actual } => {
                AccountError::PasswordTooShort { min, actual }
            }
            RegistrationError::SubjectTaken(subject) => AccountError::SubjectTaken(subject),
            RegistrationError::EmailTaken(email) => AccountError::EmailTaken(email),
            RegistrationError::Hashing(e) => AccountError::Hashing(e.to_string()),
            RegistrationError::Store(e) => AccountError::Store(e.to_string()),
        }
    }
}
