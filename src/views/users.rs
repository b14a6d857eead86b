//! User management views.

use super::{render_notices, Notice};
use crate::errors::ClientError;
use crate::models::{AddUserRequest, Company, UpdateUserRequest, User};
use crate::AppContext;

/// Users of one selected company, plus user creation.
#[derive(Debug, Clone)]
pub struct UsersView {
    pub companies: Vec<Company>,
    pub selected_company: Option<String>,
    pub users: Vec<User>,
    pub notices: Vec<Notice>,
}

impl UsersView {
    pub async fn load(ctx: &AppContext) -> Self {
        let mut view = Self {
            companies: Vec::new(),
            selected_company: None,
            users: Vec::new(),
            notices: Vec::new(),
        };
        match ctx.api.company_choices().await {
            Ok(companies) => view.companies = companies,
            Err(e) => view.notices.push(Notice::error(format!(
                "An error occurred while fetching companies: {}",
                e.message()
            ))),
        }
        view
    }

    /// Show the users of `company_name`.
    pub async fn select_company(&mut self, ctx: &AppContext, company_name: &str) -> Result<(), ClientError> {
        if company_name.trim().is_empty() {
            return Err(self.reject(ClientError::Validation(
                "Please select a company".to_string(),
            )));
        }

        let users = match ctx.api.users_by_company(company_name).await {
            Ok(users) => users,
            Err(e) => {
                self.users.clear();
                return Err(self.reject(e));
            }
        };
        self.selected_company = Some(company_name.to_string());
        self.users = users;
        Ok(())
    }

    /// Create a user; it is listed right away when it belongs to the selected company.
    pub async fn add_user(&mut self, ctx: &AppContext, request: AddUserRequest) -> Result<User, ClientError> {
        let missing = [
            &request.username,
            &request.email,
            &request.password,
            &request.company,
        ]
        .iter()
        .any(|value| value.trim().is_empty());
        if missing {
            return Err(self.reject(ClientError::Validation(
                "All fields are required".to_string(),
            )));
        }

        let user = match ctx.api.add_user(&request).await {
            Ok(user) => user,
            Err(e) => return Err(self.reject(e)),
        };

        tracing::info!("Added user {} to {}", user.id, request.company);
        if self.selected_company.as_deref() == Some(request.company.as_str()) {
            self.users.push(user.clone());
        }
        self.notices
            .push(Notice::success("User added", "User added successfully"));
        Ok(user)
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notices.push(Notice::from_error(&err));
        err
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# Users\nCompanies:\n");
        for company in &self.companies {
            out.push_str(&format!("  {}\n", company.name));
        }
        if let Some(company) = &self.selected_company {
            out.push_str(&format!("Users of {}:\n", company));
            for user in &self.users {
                let role = user.role.as_ref().map(|r| r.as_str()).unwrap_or("-");
                out.push_str(&format!("  [{}] {} ({})\n", user.id, user.name, role));
            }
        }
        render_notices(&mut out, &self.notices);
        out
    }
}

/// One user, with edit and delete.
#[derive(Debug, Clone)]
pub struct UserDetailsView {
    pub user: User,
    pub deleted: bool,
    pub notices: Vec<Notice>,
}

impl UserDetailsView {
    /// Open the view for the user passed through navigation.
    pub fn load(user: Option<User>) -> Result<Self, ClientError> {
        let user = user
            .ok_or_else(|| ClientError::MissingContext("User details are missing!".to_string()))?;
        Ok(Self {
            user,
            deleted: false,
            notices: Vec::new(),
        })
    }

    /// Apply `update` over the current record and save it.
    pub async fn update(&mut self, ctx: &AppContext, update: &UpdateUserRequest) -> Result<(), ClientError> {
        let merged = update.merged_into(&self.user);
        if let Err(e) = ctx.api.update_user(&merged).await {
            return Err(self.reject(e));
        }
        self.user = merged;
        self.notices
            .push(Notice::success("User updated", "User updated successfully"));
        Ok(())
    }

    /// Delete the user. The backend addresses users by email here.
    pub async fn delete(&mut self, ctx: &AppContext) -> Result<(), ClientError> {
        let Some(email) = self.user.email.clone() else {
            return Err(self.reject(ClientError::Validation(
                "Email is required to delete user".to_string(),
            )));
        };
        if let Err(e) = ctx.api.delete_user(&email).await {
            return Err(self.reject(e));
        }
        tracing::info!("Deleted user {}", self.user.id);
        self.deleted = true;
        self.notices
            .push(Notice::success("User deleted", "User deleted successfully"));
        Ok(())
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notices.push(Notice::from_error(&err));
        err
    }

    pub fn render(&self) -> String {
        let mut out = format!("# {}\n", self.user.name);
        if self.deleted {
            out.push_str("(deleted)\n");
        }
        out.push_str(&format!("Email: {}\n", self.user.email.as_deref().unwrap_or("-")));
        out.push_str(&format!(
            "Role: {}\n",
            self.user.role.as_ref().map(|r| r.as_str()).unwrap_or("-")
        ));
        out.push_str(&format!(
            "Company: {}\n",
            self.user.company.as_deref().unwrap_or("-")
        ));
        render_notices(&mut out, &self.notices);
        out
    }
}
