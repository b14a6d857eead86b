//! Session, identity and route authorization.
//!
//! The gate is a pure function of the resolved principal and the role a route
//! requires; it is evaluated on every navigation and never cached.

mod identity;
mod session;

pub use identity::*;
pub use session::*;

use crate::config::Config;
use crate::models::{Principal, Role};

/// Why a navigation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No principal could be established
    Unauthenticated,
    /// A principal exists but lacks the required role
    Forbidden,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Admit,
    Deny(DenyReason),
}

/// Check whether `principal` may enter a route that requires `required`.
pub fn check_access(principal: Option<&Principal>, required: &Role) -> Access {
    match principal {
        None => Access::Deny(DenyReason::Unauthenticated),
        Some(p) if &p.role == required => Access::Admit,
        Some(_) => Access::Deny(DenyReason::Forbidden),
    }
}

/// Where denied navigations are sent.
///
/// Both denial reasons share one target unless a separate wrong-role target
/// is configured explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    unauthenticated: String,
    forbidden: String,
}

impl RedirectPolicy {
    pub fn single(target: impl Into<String>) -> Self {
        let target = target.into();
        Self {
            unauthenticated: target.clone(),
            forbidden: target,
        }
    }

    pub fn split(unauthenticated: impl Into<String>, forbidden: impl Into<String>) -> Self {
        Self {
            unauthenticated: unauthenticated.into(),
            forbidden: forbidden.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        match &config.forbidden_redirect {
            Some(forbidden) => Self::split(config.deny_redirect.clone(), forbidden.clone()),
            None => Self::single(config.deny_redirect.clone()),
        }
    }

    pub fn target(&self, reason: DenyReason) -> &str {
        match reason {
            DenyReason::Unauthenticated => &self.unauthenticated,
            DenyReason::Forbidden => &self.forbidden,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: "auth-1".to_string(),
            user_id: "1".to_string(),
            name: "Ada".to_string(),
            email: Some("ada@example.com".to_string()),
            role,
            company: Some("Acme".to_string()),
        }
    }

    #[test]
    fn test_absent_principal_is_denied() {
        assert_eq!(
            check_access(None, &Role::Admin),
            Access::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn test_non_admin_roles_are_denied() {
        for role in [Role::Client, Role::Staff, Role::Other("owner".to_string())] {
            assert_eq!(
                check_access(Some(&principal(role)), &Role::Admin),
                Access::Deny(DenyReason::Forbidden)
            );
        }
    }

    #[test]
    fn test_admin_is_admitted_repeatably() {
        let admin = principal(Role::Admin);
        for _ in 0..3 {
            assert_eq!(check_access(Some(&admin), &Role::Admin), Access::Admit);
        }
    }

    #[test]
    fn test_stored_role_case_does_not_matter() {
        // Backend rows carry "Admin", "admin" or "ADMIN" for the same role
        for stored in ["Admin", "admin", "ADMIN"] {
            let role = Role::from(stored.to_string());
            assert_eq!(
                check_access(Some(&principal(role)), &Role::Admin),
                Access::Admit,
                "role {:?}",
                stored
            );
        }
        let lookalike = Role::from("administrator".to_string());
        assert_eq!(
            check_access(Some(&principal(lookalike)), &Role::Admin),
            Access::Deny(DenyReason::Forbidden)
        );
    }

    #[test]
    fn test_single_policy_uses_one_target() {
        let policy = RedirectPolicy::single("/auth");
        assert_eq!(policy.target(DenyReason::Unauthenticated), "/auth");
        assert_eq!(policy.target(DenyReason::Forbidden), "/auth");
    }

    #[test]
    fn test_split_policy() {
        let policy = RedirectPolicy::split("/dashboard", "/auth");
        assert_eq!(policy.target(DenyReason::Unauthenticated), "/dashboard");
        assert_eq!(policy.target(DenyReason::Forbidden), "/auth");
    }
}
