use crate::error::AuthError;
use crate::users::repo_types::UserRecord;

/// Role floor for mutating catalog routes.
pub const ADMIN_ROLE: i32 = 1;

/// Pure role check: allowed iff the user's role meets the floor. Runs only
/// after authentication has already succeeded, never in place of it.
pub fn require_role(user: &UserRecord, minimum: i32) -> Result<(), AuthError> {
    if user.role >= minimum {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn user_with_role(role: i32) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: "role@example.com".into(),
            password_hash: "$argon2id$stub".into(),
            name: "Role".into(),
            lastname: "Check".into(),
            role,
            session_token: None,
            cart: serde_json::json!([]),
            history: serde_json::json!([]),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn regular_users_are_forbidden() {
        assert!(matches!(
            require_role(&user_with_role(0), ADMIN_ROLE),
            Err(AuthError::Forbidden)
        ));
    }

    #[test]
    fn role_must_meet_the_floor() {
        assert!(require_role(&user_with_role(1), ADMIN_ROLE).is_ok());
        assert!(require_role(&user_with_role(5), ADMIN_ROLE).is_ok());
        assert!(matches!(
            require_role(&user_with_role(1), 2),
            Err(AuthError::Forbidden)
        ));
        assert!(require_role(&user_with_role(0), 0).is_ok());
    }

    #[test]
    fn any_nonzero_role_counts_as_admin() {
        assert!(!user_with_role(0).is_admin());
        assert!(user_with_role(1).is_admin());
        assert!(user_with_role(3).is_admin());
    }
}
