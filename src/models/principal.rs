//! Principal: the resolved identity behind a session.

use serde::Serialize;

use super::{Role, User};
use crate::errors::ClientError;

/// The authenticated user for the current page load.
///
/// Only built from a complete backend record; a record without a role or a
/// name is a resolution failure, never a partially populated principal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Principal {
    /// Session-facing identifier (the backend's auth id)
    pub id: String,
    /// Row identifier of the backing user record
    pub user_id: String,
    pub name: String,
    pub email: Option<String>,
    pub role: Role,
    pub company: Option<String>,
}

impl Principal {
    /// Build a principal from the user record fetched for `session_id`.
    pub fn from_record(session_id: &str, user: User) -> Result<Self, ClientError> {
        let role = user.role.ok_or_else(|| {
            ClientError::ResolutionFailed(format!("User {} has no role", session_id))
        })?;
        if user.name.trim().is_empty() {
            return Err(ClientError::ResolutionFailed(format!(
                "User {} has no name",
                session_id
            )));
        }

        Ok(Self {
            id: user.auth_id.unwrap_or_else(|| session_id.to_string()),
            user_id: user.id,
            name: user.name,
            email: user.email,
            role,
            company: user.company,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: serde_json::Value) -> User {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_complete_record_resolves() {
        let user = record(serde_json::json!({
            "id": 9,
            "authId": "auth-x",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "admin",
            "company": "Acme",
        }));
        let principal = Principal::from_record("auth-x", user).unwrap();
        assert_eq!(principal.user_id, "9");
        assert_eq!(principal.name, "Ada");
        assert!(principal.is_admin());
    }

    #[test]
    fn test_record_without_name_is_rejected() {
        let user = record(serde_json::json!({ "id": 9, "role": "admin" }));
        assert!(matches!(
            Principal::from_record("auth-x", user),
            Err(ClientError::ResolutionFailed(_))
        ));

        let blank = record(serde_json::json!({ "id": 9, "name": "  ", "role": "admin" }));
        assert!(Principal::from_record("auth-x", blank).is_err());
    }

    #[test]
    fn test_record_without_role_is_rejected() {
        let user = record(serde_json::json!({ "id": 9, "name": "Ada" }));
        assert!(matches!(
            Principal::from_record("auth-x", user),
            Err(ClientError::ResolutionFailed(_))
        ));
    }
}
