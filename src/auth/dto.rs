use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub lastname: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// One rejected field in a registration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Failure detail carried inside a `success: false` body.
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorDetail {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            fields: Vec::new(),
        }
    }

    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            message: "validation failed".into(),
            fields,
        }
    }
}

/// Response for registration; failures stay HTTP 200 with `success: false`.
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ErrorDetail>,
}

impl RegisterResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            err: None,
        }
    }

    pub fn rejected(err: ErrorDetail) -> Self {
        Self {
            success: false,
            err: Some(err),
        }
    }
}

/// Response for login; failures stay HTTP 200 with `loginSuccess: false`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "loginSuccess")]
    pub login_success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(rename = "userId", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl LoginResponse {
    pub fn ok(user_id: Uuid) -> Self {
        Self {
            login_success: true,
            message: None,
            user_id: Some(user_id),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            login_success: false,
            message: Some(message.into()),
            user_id: None,
        }
    }
}

/// Session probe response for an authenticated user.
#[derive(Debug, Serialize)]
pub struct AuthStatusResponse {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(rename = "isAuth")]
    pub is_auth: bool,
    pub email: String,
    pub name: String,
    pub lastname: String,
    pub role: i32,
    pub cart: serde_json::Value,
    pub history: serde_json::Value,
}

/// Response for logout.
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}
