use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::users::repo::{StoreError, UserStore};
use crate::users::repo_types::{NewUser, UserRecord};

/// In-process credential store behind the same trait as Postgres.
/// Backs `AppState::fake()` so handler and token tests run without a
/// database.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<Uuid, UserRecord>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a record as-is. Registration only creates role-0 users, so
    /// admin records and pre-set tokens enter through here in tests.
    pub async fn seed(&self, record: UserRecord) {
        self.users.write().await.insert(record.id, record);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new: NewUser<'_>) -> Result<UserRecord, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let record = UserRecord {
            id: Uuid::new_v4(),
            email: new.email.to_string(),
            password_hash: new.password_hash.to_string(),
            name: new.name.to_string(),
            lastname: new.lastname.to_string(),
            role: 0,
            session_token: None,
            cart: serde_json::json!([]),
            history: serde_json::json!([]),
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.session_token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_session_token(&self, user_id: Uuid, token: &str) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(user) => {
                user.session_token = Some(token.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn clear_session_token(&self, user_id: Uuid) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user_id) {
            Some(user) => {
                user.session_token = None;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_user(store: &MemoryUserStore, email: &str) -> UserRecord {
        store
            .create(NewUser {
                email,
                password_hash: "$argon2id$stub",
                name: "Test",
                lastname: "User",
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = MemoryUserStore::new();
        create_user(&store, "dup@example.com").await;
        let err = store
            .create(NewUser {
                email: "dup@example.com",
                password_hash: "$argon2id$stub",
                name: "Other",
                lastname: "User",
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }

    #[tokio::test]
    async fn new_users_start_logged_out_with_empty_cart() {
        let store = MemoryUserStore::new();
        let user = create_user(&store, "fresh@example.com").await;
        assert_eq!(user.role, 0);
        assert!(user.session_token.is_none());
        assert_eq!(user.cart, serde_json::json!([]));
        assert_eq!(user.history, serde_json::json!([]));
    }

    #[tokio::test]
    async fn set_and_clear_session_token() {
        let store = MemoryUserStore::new();
        let user = create_user(&store, "tok@example.com").await;

        assert!(store.set_session_token(user.id, "tok-1").await.unwrap());
        let found = store.find_by_token("tok-1").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);

        assert!(store.clear_session_token(user.id).await.unwrap());
        assert!(store.find_by_token("tok-1").await.unwrap().is_none());

        // Clearing twice is still a success for an existing user.
        assert!(store.clear_session_token(user.id).await.unwrap());
    }

    #[tokio::test]
    async fn token_lookup_is_exact_match_only() {
        let store = MemoryUserStore::new();
        let user = create_user(&store, "exact@example.com").await;
        store.set_session_token(user.id, "abcdef123456").await.unwrap();

        assert!(store.find_by_token("abcdef").await.unwrap().is_none());
        assert!(store.find_by_token("abcdef1234567").await.unwrap().is_none());
        assert!(store.find_by_token("abcdef123456").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unknown_user_reports_missing() {
        let store = MemoryUserStore::new();
        assert!(!store.set_session_token(Uuid::new_v4(), "t").await.unwrap());
        assert!(!store.clear_session_token(Uuid::new_v4()).await.unwrap());
    }
}
