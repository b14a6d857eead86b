//! Dashboard view: the logged-in user's own record.

use super::{render_notices, Notice};
use crate::errors::ClientError;
use crate::models::Principal;
use crate::AppContext;

/// Landing view after login.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub principal: Option<Principal>,
    pub notices: Vec<Notice>,
}

impl DashboardView {
    /// Load the view. Without a session the caller must redirect to login.
    pub async fn load(ctx: &AppContext) -> Result<Self, ClientError> {
        if ctx.session().is_none() {
            return Err(ClientError::MissingSession);
        }

        let mut notices = Vec::new();
        let principal = match ctx.identity.resolve().await {
            Ok(principal) => Some(principal.clone()),
            Err(e) => {
                notices.push(Notice::error(format!("Failed to fetch user data: {}", e.message())));
                None
            }
        };

        Ok(Self { principal, notices })
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# Dashboard\n");
        if let Some(p) = &self.principal {
            out.push_str(&format!("Welcome, {}\n", p.name));
            if let Some(email) = &p.email {
                out.push_str(&format!("Email: {}\n", email));
            }
            out.push_str(&format!("Role: {}\n", p.role));
            if let Some(company) = &p.company {
                out.push_str(&format!("Company: {}\n", company));
            }
            if p.is_admin() {
                out.push_str("Go to: /users /companies /projects\n");
            } else {
                out.push_str("Go to: /myprojects\n");
            }
        }
        render_notices(&mut out, &self.notices);
        out
    }
}
