use axum::{
    extract::{FromRef, State},
    http::{header, HeaderMap},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        cookie,
        dto::{
            AuthStatusResponse, ErrorDetail, FieldError, LoginRequest, LoginResponse,
            LogoutResponse, RegisterRequest, RegisterResponse,
        },
        extractors::AuthUser,
        password::PasswordError,
        token::SessionTokens,
        validate::validate_registration,
    },
    error::AuthError,
    state::AppState,
    users::repo::StoreError,
    users::repo_types::NewUser,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(register))
        .route("/users/login", post(login))
        .route("/users/auth", get(auth_status))
        // Singular by contract; existing clients rely on it.
        .route("/user/logout", get(logout))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<RegisterResponse>, AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    if let Err(fields) = validate_registration(&payload, &state.config.auth) {
        warn!(email = %payload.email, "registration payload rejected");
        return Ok(Json(RegisterResponse::rejected(ErrorDetail::validation(
            fields,
        ))));
    }

    // Ensure email is not taken
    match state.users.find_by_email(&payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Ok(Json(RegisterResponse::rejected(ErrorDetail::message(
                "Email already registered",
            ))));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    }

    let hash = match state.hasher.hash(&payload.password) {
        Ok(h) => h,
        Err(err @ (PasswordError::Empty | PasswordError::TooLong(_))) => {
            warn!(email = %payload.email, "password rejected by hasher policy");
            return Ok(Json(RegisterResponse::rejected(ErrorDetail::validation(
                vec![FieldError {
                    field: "password",
                    message: err.to_string(),
                }],
            ))));
        }
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err(AuthError::Store(anyhow::anyhow!(e)));
        }
    };

    let user = match state
        .users
        .create(NewUser {
            email: &payload.email,
            password_hash: &hash,
            name: &payload.name,
            lastname: &payload.lastname,
        })
        .await
    {
        Ok(u) => u,
        // Lost the race against a concurrent registration.
        Err(StoreError::DuplicateEmail) => {
            warn!(email = %payload.email, "email already registered");
            return Ok(Json(RegisterResponse::rejected(ErrorDetail::message(
                "Email already registered",
            ))));
        }
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err(e.into());
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(Json(RegisterResponse::ok()))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<LoginResponse>), AuthError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Ok((
                HeaderMap::new(),
                Json(LoginResponse::rejected("Auth failed, email not found")),
            ));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e.into());
        }
    };

    let ok = match state.hasher.verify(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            return Err(AuthError::Store(anyhow::anyhow!(e)));
        }
    };

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Ok((
            HeaderMap::new(),
            Json(LoginResponse::rejected("Wrong password")),
        ));
    }

    let tokens = SessionTokens::from_ref(&state);
    let token = tokens.issue(user.id).await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie::session_cookie(&token, state.config.auth.cookie_secure),
    );

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok((headers, Json(LoginResponse::ok(user.id))))
}

#[instrument(skip(user))]
pub async fn auth_status(AuthUser(user): AuthUser) -> Json<AuthStatusResponse> {
    Json(AuthStatusResponse {
        is_admin: user.is_admin(),
        is_auth: true,
        email: user.email,
        name: user.name,
        lastname: user.lastname,
        role: user.role,
        cart: user.cart,
        history: user.history,
    })
}

#[instrument(skip(state, user))]
pub async fn logout(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<LogoutResponse>, AuthError> {
    let tokens = SessionTokens::from_ref(&state);
    tokens.revoke(user.id).await?;
    info!(user_id = %user.id, "user logged out");
    Ok(Json(LogoutResponse { success: true }))
}

#[cfg(test)]
mod response_tests {
    use super::*;

    #[test]
    fn register_success_has_no_err_field() {
        let json = serde_json::to_string(&RegisterResponse::ok()).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }

    #[test]
    fn login_failure_carries_the_exact_message() {
        let json = serde_json::to_string(&LoginResponse::rejected("Wrong password")).unwrap();
        assert_eq!(json, r#"{"loginSuccess":false,"message":"Wrong password"}"#);
    }

    #[test]
    fn auth_status_uses_client_field_names() {
        let response = AuthStatusResponse {
            is_admin: false,
            is_auth: true,
            email: "test@example.com".into(),
            name: "Test".into(),
            lastname: "User".into(),
            role: 0,
            cart: serde_json::json!([]),
            history: serde_json::json!([]),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""isAdmin":false"#));
        assert!(json.contains(r#""isAuth":true"#));
        assert!(json.contains(r#""cart":[]"#));
    }
}
