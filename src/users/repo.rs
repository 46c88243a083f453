use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::users::repo_types::{NewUser, UserRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Credential store. The single source of truth for authentication:
/// handlers and the token layer only ever see this trait.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Role, cart and history take their defaults.
    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError>;

    /// Look up by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Look up the record whose stored session token equals `token` exactly.
    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Overwrite the stored session token. Returns false if the user is gone.
    async fn set_session_token(&self, user_id: Uuid, token: &str) -> Result<bool, StoreError>;

    /// Clear the stored session token. Returns false if the user is gone;
    /// clearing an already-cleared token still counts as success.
    async fn clear_session_token(&self, user_id: Uuid) -> Result<bool, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.constraint() == Some("users_email_key"),
        _ => false,
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (id, email, password_hash, name, lastname)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, email, password_hash, name, lastname, role,
                      session_token, cart, history, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.name)
        .bind(new.lastname)
        .fetch_one(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::DuplicateEmail
            } else {
                StoreError::Backend(anyhow::Error::new(e).context("insert user"))
            }
        })?;
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, name, lastname, role,
                   session_token, cart, history, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("select user by email")?;
        Ok(user)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        let user = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, name, lastname, role,
                   session_token, cart, history, created_at
            FROM users
            WHERE session_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .context("select user by token")?;
        Ok(user)
    }

    async fn set_session_token(&self, user_id: Uuid, token: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET session_token = $2 WHERE id = $1")
            .bind(user_id)
            .bind(token)
            .execute(&self.db)
            .await
            .context("update session token")?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_session_token(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE users SET session_token = NULL WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await
            .context("clear session token")?;
        Ok(result.rows_affected() > 0)
    }
}
