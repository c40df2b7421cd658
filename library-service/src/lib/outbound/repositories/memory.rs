use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::ConflictField;
use auth::Credential;
use auth::CredentialLookup;
use auth::CredentialStore;
use auth::StoreError;
use tokio::sync::RwLock;

/// Credential store kept in process memory.
///
/// Used when no database is configured. Uniqueness of subject and email is
/// enforced under the write lock on insert, so concurrent registrations of
/// the same subject cannot both succeed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    /// Map of subject -> Credential
    credentials: Arc<RwLock<HashMap<String, Credential>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.credentials.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.credentials.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialLookup for InMemoryCredentialStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Credential>, StoreError> {
        Ok(self.credentials.read().await.get(subject).cloned())
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists_by_subject(&self, subject: &str) -> Result<bool, StoreError> {
        Ok(self.credentials.read().await.contains_key(subject))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self
            .credentials
            .read()
            .await
            .values()
            .any(|credential| credential.email == email))
    }

    async fn insert(
        &self,
        subject: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Credential, StoreError> {
        let mut credentials = self.credentials.write().await;

        if credentials.contains_key(subject) {
            return Err(StoreError::Conflict(ConflictField::Subject));
        }

        if credentials.values().any(|credential| credential.email == email) {
            return Err(StoreError::Conflict(ConflictField::Email));
        }

        let credential = Credential {
            subject: subject.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        credentials.insert(subject.to_string(), credential.clone());

        tracing::debug!(subject = %subject, "Credential stored in memory");
        Ok(credential)
    }
}
