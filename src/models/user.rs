//! User model matching the backend `users` records.

use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id};

/// Role flag carried by users and principals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Client,
    Staff,
    /// Any role string the client does not know about
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Staff => "staff",
            Role::Other(s) => s,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "admin" => Role::Admin,
            "client" => Role::Client,
            "staff" => Role::Staff,
            _ => Role::Other(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dashboard user. Project membership is a separate relation, not a field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(
        rename = "authId",
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

/// Request body for creating a user under a company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Company name as expected by the backend
    pub company: String,
}

/// Partial update applied over an existing user record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub company: Option<String>,
}

impl UpdateUserRequest {
    /// Merge the update over `user`, keeping existing values for unset fields.
    pub fn merged_into(&self, user: &User) -> User {
        User {
            id: user.id.clone(),
            auth_id: user.auth_id.clone(),
            name: self.name.clone().unwrap_or_else(|| user.name.clone()),
            email: self.email.clone().or_else(|| user.email.clone()),
            role: self.role.clone().or_else(|| user.role.clone()),
            company: self.company.clone().or_else(|| user.company.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing_is_case_insensitive() {
        assert_eq!(Role::from("ADMIN".to_string()), Role::Admin);
        assert_eq!(Role::from(" client ".to_string()), Role::Client);
        assert_eq!(
            Role::from("auditor".to_string()),
            Role::Other("auditor".to_string())
        );
    }

    #[test]
    fn test_user_accepts_numeric_id() {
        let user: User =
            serde_json::from_value(serde_json::json!({"id": 7, "name": "Ada", "email": "a@x.io"}))
                .unwrap();
        assert_eq!(user.id, "7");
        assert!(user.role.is_none());
    }

    #[test]
    fn test_update_merges_over_existing() {
        let user = User {
            id: "1".into(),
            auth_id: Some("auth-1".into()),
            name: "Ada".into(),
            email: Some("ada@x.io".into()),
            role: Some(Role::Client),
            company: Some("Acme".into()),
        };
        let update = UpdateUserRequest {
            role: Some(Role::Admin),
            ..Default::default()
        };
        let merged = update.merged_into(&user);
        assert_eq!(merged.role, Some(Role::Admin));
        assert_eq!(merged.name, "Ada");
        assert_eq!(merged.auth_id.as_deref(), Some("auth-1"));
    }
}
