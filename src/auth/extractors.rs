use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::auth::cookie;
use crate::auth::role::{require_role, ADMIN_ROLE};
use crate::auth::token::SessionTokens;
use crate::error::AuthError;
use crate::users::repo_types::UserRecord;

/// Extracts the `w_auth` cookie, validates it against the store and hands
/// the resolved record to the handler. Rejects before the handler runs.
pub struct AuthUser(pub UserRecord);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionTokens: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // The cookie is the only token transport.
        let token = cookie::token_from_headers(&parts.headers).ok_or(AuthError::MissingToken)?;

        let tokens = SessionTokens::from_ref(state);
        match tokens.validate(&token).await? {
            Some(user) => Ok(AuthUser(user)),
            None => {
                warn!("request with invalid or revoked session token");
                Err(AuthError::InvalidToken)
            }
        }
    }
}

/// `AuthUser` plus the admin role floor, for mutating catalog routes.
/// Authentication runs first, so an anonymous caller sees 401, a known
/// non-admin 403.
pub struct AdminUser(pub UserRecord);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SessionTokens: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        if let Err(err) = require_role(&user, ADMIN_ROLE) {
            warn!(user_id = %user.id, role = user.role, "admin route refused");
            return Err(err);
        }
        Ok(AdminUser(user))
    }
}
