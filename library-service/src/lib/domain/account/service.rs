use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::CredentialStore;
use auth::IssuedToken;

use crate::account::errors::AccountError;
use crate::account::models::Account;
use crate::account::models::RegisterCommand;
use crate::account::ports::AccountServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
pub struct AccountService<CS>
where
    CS: CredentialStore,
{
    store: Arc<CS>,
    authenticator: Arc<Authenticator>,
}

impl<CS> AccountService<CS>
where
    CS: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `authenticator` - Configured authentication core
    pub fn new(store: Arc<CS>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            store,
            authenticator,
        }
    }
}

#[async_trait]
impl<CS> AccountServicePort for AccountService<CS>
where
    CS: CredentialStore,
{
    async fn login(&self, subject: &str, password: &str) -> Result<IssuedToken, AccountError> {
        let issued = self
            .authenticator
            .login(subject, password, self.store.as_ref())
            .await?;

        tracing::info!(
            subject = %issued.subject,
            expires_at = %issued.expires_at,
            "Access token issued"
        );

        Ok(issued)
    }

    async fn register(&self, command: RegisterCommand) -> Result<Account, AccountError> {
        let credential = self
            .authenticator
            .register(
                &command.subject,
                &command.password,
                command.email.as_str(),
                self.store.as_ref(),
            )
            .await?;

        Ok(credential.into())
    }

    fn current_subject(&self, token: &str) -> Result<String, AccountError> {
        Ok(self.authenticator.resolve_subject(token)?)
    }
}
