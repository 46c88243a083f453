use std::sync::Arc;

use axum::extract::FromRef;
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::rngs::OsRng;
use rand::RngCore;
use subtle::ConstantTimeEq;
use tracing::debug;
use uuid::Uuid;

use crate::error::AuthError;
use crate::state::AppState;
use crate::users::repo::UserStore;
use crate::users::repo_types::UserRecord;

/// Raw entropy per token; encodes to 43 base64url characters.
const TOKEN_BYTES: usize = 32;

/// Issues and validates the opaque per-user session token. The token is
/// random, carries no claims, and is only valid while it matches the value
/// stored on the user record, so a logout or a newer login revokes it
/// immediately.
#[derive(Clone)]
pub struct SessionTokens {
    users: Arc<dyn UserStore>,
}

impl FromRef<AppState> for SessionTokens {
    fn from_ref(state: &AppState) -> Self {
        Self {
            users: state.users.clone(),
        }
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

impl SessionTokens {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    fn generate() -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Base64UrlUnpadded::encode_string(&bytes)
    }

    /// Mint a fresh token and persist it on the record, replacing any
    /// previous one. One active session per user.
    pub async fn issue(&self, user_id: Uuid) -> Result<String, AuthError> {
        let token = Self::generate();
        if !self.users.set_session_token(user_id, &token).await? {
            return Err(AuthError::UserNotFound);
        }
        debug!(user_id = %user_id, "session token issued");
        Ok(token)
    }

    /// Resolve a presented token to its record. The stored value is compared
    /// again after the lookup, in constant time: a token cleared or replaced
    /// in the meantime must not authenticate, and neither may an empty one.
    pub async fn validate(&self, token: &str) -> Result<Option<UserRecord>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        let user = match self.users.find_by_token(token).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        match user.session_token.as_deref() {
            Some(stored) if !stored.is_empty() && constant_time_eq(stored, token) => {
                debug!(user_id = %user.id, "session token validated");
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    /// Drop the user's active session. Clearing an already-cleared token is
    /// fine; a missing user is not.
    pub async fn revoke(&self, user_id: Uuid) -> Result<(), AuthError> {
        if !self.users.clear_session_token(user_id).await? {
            return Err(AuthError::UserNotFound);
        }
        debug!(user_id = %user_id, "session token revoked");
        Ok(())
    }
}
