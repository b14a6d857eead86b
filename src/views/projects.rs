//! Project list views.

use super::{render_notices, Notice};
use crate::errors::ClientError;
use crate::models::{Company, CreateProjectRequest, Project};
use crate::AppContext;

/// A project with its company display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectRow {
    pub project: Project,
    pub company_name: String,
}

impl ProjectRow {
    pub const UNKNOWN_COMPANY: &'static str = "Unknown";

    pub fn new(project: Project, companies: &[Company]) -> Self {
        let company_name = Company::resolve(companies, &project.company)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| Self::UNKNOWN_COMPANY.to_string());
        Self {
            project,
            company_name,
        }
    }

    /// Case-insensitive match on project name, company name or description.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.project.name.to_lowercase().contains(&query)
            || self.company_name.to_lowercase().contains(&query)
            || self.project.description.to_lowercase().contains(&query)
    }
}

/// Filter `rows` by `query`, keeping their order.
pub fn search_rows<'a>(rows: &'a [ProjectRow], query: &str) -> Vec<&'a ProjectRow> {
    rows.iter().filter(|row| row.matches(query)).collect()
}

/// Input for a new project. The company is picked by id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    pub company_id: String,
}

/// All projects (admin view).
#[derive(Debug, Clone)]
pub struct ProjectListView {
    pub rows: Vec<ProjectRow>,
    pub companies: Vec<Company>,
    pub query: String,
    pub notices: Vec<Notice>,
}

impl ProjectListView {
    pub async fn load(ctx: &AppContext) -> Self {
        let (projects, companies) =
            tokio::join!(ctx.api.all_projects(), ctx.api.all_companies());

        match (projects, companies) {
            (Ok(projects), Ok(companies)) => Self {
                rows: projects
                    .into_iter()
                    .map(|p| ProjectRow::new(p, &companies))
                    .collect(),
                companies,
                query: String::new(),
                notices: Vec::new(),
            },
            (Err(e), _) | (_, Err(e)) => Self {
                rows: Vec::new(),
                companies: Vec::new(),
                query: String::new(),
                notices: vec![Notice::error(format!("Failed to fetch data: {}", e.message()))],
            },
        }
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Rows matching the current query.
    pub fn visible(&self) -> Vec<&ProjectRow> {
        search_rows(&self.rows, &self.query)
    }

    /// Create a project and append it to the list.
    pub async fn create(
        &mut self,
        ctx: &AppContext,
        input: NewProject,
    ) -> Result<&ProjectRow, ClientError> {
        let required = [
            (&input.name, "Please enter the project name"),
            (&input.description, "Please enter a description"),
            (&input.start_date, "Please select a start date"),
            (&input.end_date, "Please select an end date"),
            (&input.company_id, "Please select a company"),
        ];
        if let Some((_, message)) = required.iter().find(|(value, _)| value.trim().is_empty()) {
            return Err(self.reject(ClientError::Validation(message.to_string())));
        }

        let company = self
            .companies
            .iter()
            .find(|c| c.id == input.company_id)
            .cloned();
        let Some(company) = company else {
            return Err(self.reject(ClientError::Validation(format!(
                "Unknown company {}",
                input.company_id
            ))));
        };

        let request = CreateProjectRequest {
            name: input.name,
            description: input.description,
            start_date: input.start_date,
            end_date: input.end_date,
            company: company.name.clone(),
        };

        let project = match ctx.api.create_project(&request).await {
            Ok(project) => project,
            Err(e) => return Err(self.reject(e)),
        };

        tracing::info!("Created project {} for {}", project.id, company.name);
        self.notices
            .push(Notice::success("Project created", "Project created successfully"));
        self.rows.push(ProjectRow::new(project, &self.companies));
        Ok(&self.rows[self.rows.len() - 1])
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.notices.push(Notice::from_error(&err));
        err
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# Projects\n");
        render_rows(&mut out, &self.visible());
        render_notices(&mut out, &self.notices);
        out
    }
}

/// Projects the session's user takes part in.
#[derive(Debug, Clone)]
pub struct ClientProjectsView {
    pub rows: Vec<ProjectRow>,
    pub query: String,
    pub notices: Vec<Notice>,
}

impl ClientProjectsView {
    pub async fn load(ctx: &AppContext) -> Result<Self, ClientError> {
        let session = ctx.session().ok_or(ClientError::MissingSession)?;

        let (rows, notices) = match ctx.api.client_projects(&session.id).await {
            // The client endpoint already sends company names
            Ok(projects) => (
                projects
                    .into_iter()
                    .map(|p| {
                        let company_name = p.company.clone();
                        ProjectRow {
                            project: p,
                            company_name,
                        }
                    })
                    .collect(),
                Vec::new(),
            ),
            Err(e) => (
                Vec::new(),
                vec![Notice::error(format!("Failed to fetch projects: {}", e.message()))],
            ),
        };

        Ok(Self {
            rows,
            query: String::new(),
            notices,
        })
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn visible(&self) -> Vec<&ProjectRow> {
        search_rows(&self.rows, &self.query)
    }

    pub fn render(&self) -> String {
        let mut out = String::from("# My Projects\n");
        render_rows(&mut out, &self.visible());
        render_notices(&mut out, &self.notices);
        out
    }
}

fn render_rows(out: &mut String, rows: &[&ProjectRow]) {
    for row in rows {
        let start = row.project.start_date.as_deref().unwrap_or("-");
        let end = row.project.end_date.as_deref().unwrap_or("-");
        out.push_str(&format!(
            "  [{}] {} | {} | {} | {} - {}\n",
            row.project.id, row.project.name, row.company_name, row.project.description, start, end
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(id: &str, name: &str, company: &str, description: &str) -> Project {
        Project {
            id: id.to_string(),
            name: name.to_string(),
            company: company.to_string(),
            description: description.to_string(),
            start_date: None,
            end_date: None,
        }
    }

    fn companies() -> Vec<Company> {
        vec![
            Company {
                id: "1".to_string(),
                name: "Acme".to_string(),
            },
            Company {
                id: "2".to_string(),
                name: "Globex".to_string(),
            },
        ]
    }

    #[test]
    fn test_row_resolves_company_by_id_or_name() {
        let companies = companies();
        assert_eq!(ProjectRow::new(project("p1", "A", "1", ""), &companies).company_name, "Acme");
        assert_eq!(
            ProjectRow::new(project("p2", "B", "Globex", ""), &companies).company_name,
            "Globex"
        );
        assert_eq!(
            ProjectRow::new(project("p3", "C", "99", ""), &companies).company_name,
            ProjectRow::UNKNOWN_COMPANY
        );
    }

    #[test]
    fn test_search_is_case_insensitive_across_columns() {
        let companies = companies();
        let rows = vec![
            ProjectRow::new(project("p1", "Website", "1", "Marketing site"), &companies),
            ProjectRow::new(project("p2", "Billing", "2", "Invoices"), &companies),
        ];

        let ids = |query: &str| -> Vec<String> {
            search_rows(&rows, query)
                .into_iter()
                .map(|r| r.project.id.clone())
                .collect()
        };

        assert_eq!(ids("website"), vec!["p1"]);
        assert_eq!(ids("GLOBEX"), vec!["p2"]);
        assert_eq!(ids("invoice"), vec!["p2"]);
        assert_eq!(ids(""), vec!["p1", "p2"]);
        assert!(ids("nothing").is_empty());
    }
}
