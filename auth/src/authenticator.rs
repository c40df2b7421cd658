#[cfg(test)]
use std::sync::atomic::AtomicUsize;
#[cfg(test)]
use std::sync::atomic::Ordering;

use crate::credentials::ConflictField;
use crate::credentials::Credential;
use crate::credentials::CredentialLookup;
use crate::credentials::CredentialStore;
use crate::credentials::StoreError;
use crate::jwt::JwtError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::token::IssuedToken;
use crate::token::TokenService;

/// Shortest password accepted at registration, in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

// Verified against when no real credential was checked
const DUMMY_PASSWORD: &str = "dummy-password-for-unknown-subjects";

/// Authentication coordinator combining credential lookup, password
/// verification and token issuance.
///
/// Password hashing and verification run on the blocking thread pool, so
/// `login` and `register` must be awaited inside a Tokio runtime.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_service: TokenService,
    demo_account: Option<DemoFallback>,
    dummy_hash: String,
    #[cfg(test)]
    verifications: AtomicUsize,
}

/// Fixed subject/password pair accepted when no stored credential matches.
///
/// Only for demos and smoke tests; leave it unset in real deployments.
#[derive(Clone)]
pub struct DemoAccount {
    pub subject: String,
    pub password: String,
}

struct DemoFallback {
    subject: String,
    password_hash: String,
}

/// Authentication operation errors.
///
/// Login and token failures are deliberately uniform: callers cannot tell an
/// unknown subject from a wrong password, or an expired token from a forged
/// one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthenticated,

    #[error("Token generation failed: {0}")]
    TokenIssuance(#[from] JwtError),
}

/// Registration errors. Unlike login failures these are safe to disclose.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Subject cannot be empty")]
    InvalidSubject,

    #[error("Password too short: minimum {min} characters, got {actual}")]
    PasswordTooShort { min: usize, actual: usize },

    #[error("Subject already registered: {0}")]
    SubjectTaken(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error(transparent)]
    Hashing(#[from] PasswordError),

    #[error(transparent)]
    Store(StoreError),
}

impl Authenticator {
    /// Create a new authenticator without a demo fallback account.
    ///
    /// Hashes a throwaway password up front so that logins for unknown
    /// subjects cost one verification like any other login.
    ///
    /// # Errors
    /// * `HashingFailed` - The hasher rejected the throwaway password
    pub fn new(
        password_hasher: PasswordHasher,
        token_service: TokenService,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            password_hasher,
            token_service,
            demo_account: None,
            dummy_hash,
            #[cfg(test)]
            verifications: AtomicUsize::new(0),
        })
    }

    /// Accept `account` whenever the stored credentials do not match.
    ///
    /// The demo password is hashed here so that checking it later costs the
    /// same as checking a stored credential.
    ///
    /// # Errors
    /// * `HashingFailed` - The demo password could not be hashed
    pub fn with_demo_fallback(mut self, account: DemoAccount) -> Result<Self, PasswordError> {
        let password_hash = self.password_hasher.hash(&account.password)?;

        self.demo_account = Some(DemoFallback {
            subject: account.subject,
            password_hash,
        });

        Ok(self)
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `subject` - Claimed username
    /// * `password` - Plaintext password
    /// * `lookup` - Store holding registered credentials
    ///
    /// # Errors
    /// * `InvalidCredentials` - No stored or demo credential matched
    /// * `TokenIssuance` - Token signing failed
    pub async fn login<L>(
        &self,
        subject: &str,
        password: &str,
        lookup: &L,
    ) -> Result<IssuedToken, AuthenticationError>
    where
        L: CredentialLookup + ?Sized,
    {
        let stored = match lookup.find_by_subject(subject).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "Credential lookup failed during login");
                None
            }
        };

        let mut verified = false;

        if let Some(credential) = stored {
            verified = true;
            if self.verify_password(password, &credential.password_hash).await {
                return Ok(self.token_service.issue(subject)?);
            }
        }

        if let Some(demo) = self.demo_account.as_ref().filter(|demo| demo.subject == subject) {
            verified = true;
            if self.verify_password(password, &demo.password_hash).await {
                tracing::warn!(subject = %subject, "Login accepted through demo fallback account");
                return Ok(self.token_service.issue(subject)?);
            }
        }

        if !verified {
            // Result ignored: only the cost matters
            self.verify_password(password, &self.dummy_hash).await;
        }

        tracing::debug!(subject = %subject, "Login rejected");
        Err(AuthenticationError::InvalidCredentials)
    }

    /// Resolve the subject asserted by a bearer token.
    ///
    /// # Errors
    /// * `Unauthenticated` - Token is malformed, forged, expired or lacks a subject
    pub fn resolve_subject(&self, token: &str) -> Result<String, AuthenticationError> {
        self.token_service
            .validate(token)
            .ok_or(AuthenticationError::Unauthenticated)
    }

    /// Register a new credential.
    ///
    /// The existence checks give friendly errors in the common case; the
    /// store's own uniqueness constraint still decides concurrent races and
    /// its conflicts map to the same errors.
    ///
    /// # Errors
    /// * `InvalidSubject` - Subject is empty or blank
    /// * `PasswordTooShort` - Password has fewer than 8 characters
    /// * `SubjectTaken` / `EmailTaken` - Uniqueness violated
    /// * `Hashing` - Password hashing failed
    /// * `Store` - Store operation failed
    pub async fn register<S>(
        &self,
        subject: &str,
        password: &str,
        email: &str,
        store: &S,
    ) -> Result<Credential, RegistrationError>
    where
        S: CredentialStore + ?Sized,
    {
        if subject.trim().is_empty() {
            return Err(RegistrationError::InvalidSubject);
        }

        let length = password.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::PasswordTooShort {
                min: MIN_PASSWORD_LENGTH,
                actual: length,
            });
        }

        let conflict = |e: StoreError| match e {
            StoreError::Conflict(ConflictField::Subject) => {
                RegistrationError::SubjectTaken(subject.to_string())
            }
            StoreError::Conflict(ConflictField::Email) => {
                RegistrationError::EmailTaken(email.to_string())
            }
            other => RegistrationError::Store(other),
        };

        if store.exists_by_subject(subject).await.map_err(conflict)? {
            return Err(RegistrationError::SubjectTaken(subject.to_string()));
        }

        if store.exists_by_email(email).await.map_err(conflict)? {
            return Err(RegistrationError::EmailTaken(email.to_string()));
        }

        let password_hash = self.hash_password(password).await?;

        let credential = store
            .insert(subject, email, &password_hash)
            .await
            .map_err(conflict)?;

        tracing::info!(subject = %credential.subject, "Credential registered");
        Ok(credential)
    }

    async fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        let hasher = self.password_hasher.clone();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    async fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        #[cfg(test)]
        self.verifications.fetch_add(1, Ordering::SeqCst);

        let hasher = self.password_hasher.clone();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &password_hash))
            .await
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "Password verification task failed");
                false
            })
    }
}
