use std::fmt;
use std::str::FromStr;

use auth::Credential;

use crate::account::errors::EmailError;

/// Registered account as seen outside the auth core.
///
/// Built from a stored credential with the password hash left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub subject: String,
    pub email: String,
}

impl From<Credential> for Account {
    fn from(credential: Credential) -> Self {
        Self {
            subject: credential.subject,
            email: credential.email,
        }
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Command to register a new account
#[derive(Clone)]
pub struct RegisterCommand {
    pub subject: String,
    pub email: EmailAddress,
    pub password: String,
}

impl RegisterCommand {
    /// Construct a new register command.
    ///
    /// # Arguments
    /// * `subject` - Requested username (validated by the auth core)
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(subject: String, email: EmailAddress, password: String) -> Self {
        Self {
            subject,
            email,
            password,
        }
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("subject", &self.subject)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
