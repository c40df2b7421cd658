use async_trait::async_trait;
use auth::ConflictField;
use auth::Credential;
use auth::CredentialLookup;
use auth::CredentialStore;
use auth::StoreError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const USERNAME_CONSTRAINT: &str = "users_username_key";
const EMAIL_CONSTRAINT: &str = "users_email_key";

#[derive(sqlx::FromRow)]
struct CredentialRow {
    username: String,
    email: String,
    password_hash: String,
}

impl From<CredentialRow> for Credential {
    fn from(row: CredentialRow) -> Self {
        Self {
            subject: row.username,
            email: row.email,
            password_hash: row.password_hash,
        }
    }
}

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialLookup for PostgresCredentialStore {
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Credential>, StoreError> {
        let row = sqlx::query_as::<_, CredentialRow>(
            r#"
            SELECT username, email, password_hash
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(subject)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))?;

        Ok(row.map(Credential::from))
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn exists_by_subject(&self, subject: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)
            "#,
        )
        .bind(subject)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)
            "#,
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Backend(e.to_string()))
    }

    async fn insert(
        &self,
        subject: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Credential, StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(subject)
        .bind(email)
        .bind(password_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    match db_err.constraint() {
                        Some(USERNAME_CONSTRAINT) => {
                            return StoreError::Conflict(ConflictField::Subject)
                        }
                        Some(EMAIL_CONSTRAINT) => return StoreError::Conflict(ConflictField::Email),
                        _ => {}
                    }
                }
            }
            StoreError::Backend(e.to_string())
        })?;

        Ok(Credential {
            subject: subject.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        })
    }
}
