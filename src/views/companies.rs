//! Company list and company detail views.

use super::{render_notices, Notice};
use crate::errors::ClientError;
use crate::models::{Company, User};
use crate::AppContext;

/// All companies.
#[derive(Debug, Clone)]
pub struct CompanyListView {
    pub companies: Vec<Company>,
    pub notices: Vec<Notice>,
}

impl CompanyListView {
    pub async fn load(ctx: &AppContext) -> Self {
        match ctx.api.all_companies().await {
            Ok(companies) => Self {
                companies,
                notices: Vec::new(),
            },
            Err(e) => Self {
                companies: Vec::new(),
                notices: vec![Notice::error(format!(
                    "Failed to fetch companies: {}",
                    e.message()
                ))],
            },
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# Companies\n");
        for company in &self.companies {
            out.push_str(&format!("  [{}] {}\n", company.id, company.name));
        }
        render_notices(&mut out, &self.notices);
        out
    }
}

/// One company and its users.
#[derive(Debug, Clone)]
pub struct CompanyDetailsView {
    pub company: Company,
    pub users: Vec<User>,
    pub notices: Vec<Notice>,
}

impl CompanyDetailsView {
    /// Load the view for the company passed through navigation.
    pub async fn load(ctx: &AppContext, company: Option<Company>) -> Result<Self, ClientError> {
        let company = company.ok_or_else(|| {
            ClientError::MissingContext("Company details are missing!".to_string())
        })?;

        let (users, notices) = match ctx.api.users_by_company(&company.name).await {
            Ok(users) => (users, Vec::new()),
            Err(e) => (
                Vec::new(),
                vec![Notice::error(format!("Failed to fetch users: {}", e.message()))],
            ),
        };

        Ok(Self {
            company,
            users,
            notices,
        })
    }

    pub fn render(&self) -> String {
        let mut out = format!("# {}\nUsers:\n", self.company.name);
        for user in &self.users {
            let email = user.email.as_deref().unwrap_or("-");
            out.push_str(&format!("  {} <{}>\n", user.name, email));
        }
        render_notices(&mut out, &self.notices);
        out
    }
}
