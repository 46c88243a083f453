use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: Uuid,                       // unique user ID
    pub email: String,                  // unique, trimmed + lowercased
    #[serde(skip_serializing)]
    pub password_hash: String,          // Argon2 hash, not exposed in JSON
    pub name: String,
    pub lastname: String,
    pub role: i32,                      // 0 = regular, > 0 = admin
    #[serde(skip_serializing)]
    pub session_token: Option<String>,  // current session, None when logged out
    pub cart: serde_json::Value,        // owned by the catalog service
    pub history: serde_json::Value,     // owned by the catalog service
    pub created_at: OffsetDateTime,
}

impl UserRecord {
    pub fn is_admin(&self) -> bool {
        self.role != 0
    }
}

/// Insert payload for registration. Role, cart and history take their
/// column defaults.
#[derive(Debug, Clone, Copy)]
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: &'a str,
    pub lastname: &'a str,
}
