use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{FieldError, RegisterRequest};
use crate::config::AuthConfig;

/// Display-name bound for `name` and `lastname`.
pub const MAX_NAME_LEN: usize = 100;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Field-level checks, run before anything touches the store. Expects the
/// email to be normalized (trimmed, lowercased) already.
pub fn validate_registration(
    req: &RegisterRequest,
    policy: &AuthConfig,
) -> Result<(), Vec<FieldError>> {
    let mut errors = Vec::new();

    if req.email.is_empty() {
        errors.push(FieldError {
            field: "email",
            message: "email is required".into(),
        });
    } else if !is_valid_email(&req.email) {
        errors.push(FieldError {
            field: "email",
            message: "email is not a valid address".into(),
        });
    }

    if req.password.is_empty() {
        errors.push(FieldError {
            field: "password",
            message: "password is required".into(),
        });
    } else if req.password.len() < policy.password_min_len {
        errors.push(FieldError {
            field: "password",
            message: format!(
                "password must be at least {} characters",
                policy.password_min_len
            ),
        });
    } else if req.password.len() > policy.password_max_len {
        errors.push(FieldError {
            field: "password",
            message: format!(
                "password must be at most {} characters",
                policy.password_max_len
            ),
        });
    }

    if req.name.trim().is_empty() {
        errors.push(FieldError {
            field: "name",
            message: "name is required".into(),
        });
    } else if req.name.len() > MAX_NAME_LEN {
        errors.push(FieldError {
            field: "name",
            message: format!("name must be at most {} characters", MAX_NAME_LEN),
        });
    }

    if req.lastname.trim().is_empty() {
        errors.push(FieldError {
            field: "lastname",
            message: "lastname is required".into(),
        });
    } else if req.lastname.len() > MAX_NAME_LEN {
        errors.push(FieldError {
            field: "lastname",
            message: format!("lastname must be at most {} characters", MAX_NAME_LEN),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
