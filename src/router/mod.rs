//! Routes and navigation.
//!
//! Every navigation re-runs the authorization gate for guarded routes before
//! the view is loaded. Missing preconditions turn into redirects, never into
//! a partially rendered view.

use std::str::FromStr;

use crate::auth::{check_access, Access};
use crate::errors::ClientError;
use crate::models::{Company, Project, Role, User};
use crate::views::{
    ClientProjectsView, CompanyDetailsView, CompanyListView, DashboardView, Notice,
    ProjectListView, UserDetailsView, UsersView,
};
use crate::workflow::ProjectWorkflow;
use crate::AppContext;

/// Route of the login view.
pub const LOGIN_PATH: &str = "/auth";

/// A client-side route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Auth,
    Users,
    Companies,
    Projects,
    MyProjects,
    UserDetails(String),
    CompanyDetails(String),
    ProjectDetails(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/dashboard".to_string(),
            Route::Auth => LOGIN_PATH.to_string(),
            Route::Users => "/users".to_string(),
            Route::Companies => "/companies".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::MyProjects => "/myprojects".to_string(),
            Route::UserDetails(id) => format!("/user/{}", id),
            Route::CompanyDetails(id) => format!("/company/{}", id),
            Route::ProjectDetails(id) => format!("/project/{}", id),
        }
    }

    /// Role required to enter, if the route is guarded.
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::Users | Route::Companies | Route::Projects => Some(Role::Admin),
            _ => None,
        }
    }

    /// Where to go when the route is entered without its navigation state.
    fn context_fallback(&self) -> Route {
        match self {
            Route::ProjectDetails(_) => Route::Projects,
            Route::CompanyDetails(_) => Route::Companies,
            Route::UserDetails(_) => Route::Users,
            _ => Route::Dashboard,
        }
    }
}

impl FromStr for Route {
    type Err = ClientError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed.trim_start_matches('/').split('/').collect();

        let route = match segments.as_slice() {
            [""] | ["dashboard"] => Route::Dashboard,
            ["auth"] => Route::Auth,
            ["users"] => Route::Users,
            ["companies"] => Route::Companies,
            ["projects"] => Route::Projects,
            ["myprojects"] => Route::MyProjects,
            ["user", id] if !id.is_empty() => Route::UserDetails(id.to_string()),
            ["company", id] if !id.is_empty() => Route::CompanyDetails(id.to_string()),
            ["project", id] if !id.is_empty() => Route::ProjectDetails(id.to_string()),
            _ => return Err(ClientError::Validation(format!("Unknown route {}", path))),
        };
        Ok(route)
    }
}

/// Entities handed from one view to the next.
#[derive(Debug, Clone, Default)]
pub struct NavState {
    pub project: Option<Project>,
    pub company: Option<Company>,
    pub user: Option<User>,
}

impl NavState {
    /// Fetch the entity a detail route is keyed by, as a list view would
    /// have handed it over. Lookups that fail leave the state empty.
    pub async fn for_route(ctx: &AppContext, route: &Route) -> Self {
        let mut state = NavState::default();
        match route {
            Route::ProjectDetails(id) => {
                let (projects, companies) =
                    tokio::join!(ctx.api.all_projects(), ctx.api.all_companies());
                match projects {
                    Ok(projects) => state.project = projects.into_iter().find(|p| &p.id == id),
                    Err(e) => tracing::warn!("Could not look up project {}: {}", id, e),
                }
                if let (Some(project), Ok(companies)) = (&state.project, companies) {
                    state.company = Company::resolve(&companies, &project.company).cloned();
                }
            }
            Route::CompanyDetails(id) => match ctx.api.all_companies().await {
                Ok(companies) => state.company = Company::resolve(&companies, id).cloned(),
                Err(e) => tracing::warn!("Could not look up company {}: {}", id, e),
            },
            Route::UserDetails(id) => match ctx.api.get_user(id).await {
                Ok(user) => state.user = Some(user),
                Err(e) => tracing::warn!("Could not look up user {}: {}", id, e),
            },
            _ => {}
        }
        state
    }
}

/// A loaded view.
pub enum Page {
    Dashboard(DashboardView),
    Login,
    Users(UsersView),
    Companies(CompanyListView),
    CompanyDetails(CompanyDetailsView),
    Projects(ProjectListView),
    MyProjects(ClientProjectsView),
    UserDetails(UserDetailsView),
    Project(Box<ProjectWorkflow>),
}

impl Page {
    pub fn render(&self) -> String {
        match self {
            Page::Dashboard(view) => view.render(),
            Page::Login => "# Auth\nRun `login admin` or `login client`.\n".to_string(),
            Page::Users(view) => view.render(),
            Page::Companies(view) => view.render(),
            Page::CompanyDetails(view) => view.render(),
            Page::Projects(view) => view.render(),
            Page::MyProjects(view) => view.render(),
            Page::UserDetails(view) => view.render(),
            Page::Project(workflow) => workflow.render(),
        }
    }

    /// Apply a search term to pages that have one.
    pub fn set_query(&mut self, query: String) {
        match self {
            Page::Projects(view) => view.set_query(query),
            Page::MyProjects(view) => view.set_query(query),
            _ => {}
        }
    }

    /// Abandon in-flight work belonging to this page.
    pub fn unmount(&self) {
        if let Page::Project(workflow) = self {
            workflow.unmount();
        }
    }
}

/// Result of a navigation.
pub enum Navigation {
    Render(Page),
    Redirect { to: String, notice: Option<Notice> },
}

impl Navigation {
    fn redirect(to: impl Into<String>, notice: Option<Notice>) -> Self {
        let to = to.into();
        tracing::info!("Redirecting to {}", to);
        Navigation::Redirect { to, notice }
    }
}

/// Gate `route` and load its view.
pub async fn navigate(ctx: &AppContext, route: &Route, state: NavState) -> Navigation {
    if let Some(required) = route.required_role() {
        // No session means no principal; nothing is fetched in that case
        let principal = ctx.identity.principal().await;
        if let Access::Deny(reason) = check_access(principal, &required) {
            tracing::info!("Access to {} denied: {:?}", route.path(), reason);
            return Navigation::redirect(ctx.policy.target(reason), None);
        }
    }

    match load_page(ctx, route, state).await {
        Ok(page) => Navigation::Render(page),
        Err(ClientError::MissingSession) => {
            Navigation::redirect(LOGIN_PATH, Some(Notice::from_error(&ClientError::MissingSession)))
        }
        Err(e @ ClientError::MissingContext(_)) => {
            Navigation::redirect(route.context_fallback().path(), Some(Notice::from_error(&e)))
        }
        Err(e) => {
            // Views degrade on their own; anything else still must not crash
            tracing::error!("Failed to load {}: {}", route.path(), e);
            Navigation::redirect(Route::Dashboard.path(), Some(Notice::from_error(&e)))
        }
    }
}

async fn load_page(ctx: &AppContext, route: &Route, state: NavState) -> Result<Page, ClientError> {
    let page = match route {
        Route::Dashboard => Page::Dashboard(DashboardView::load(ctx).await?),
        Route::Auth => Page::Login,
        Route::Users => Page::Users(UsersView::load(ctx).await),
        Route::Companies => Page::Companies(CompanyListView::load(ctx).await),
        Route::Projects => Page::Projects(ProjectListView::load(ctx).await),
        Route::MyProjects => Page::MyProjects(ClientProjectsView::load(ctx).await?),
        Route::CompanyDetails(_) => {
            Page::CompanyDetails(CompanyDetailsView::load(ctx, state.company).await?)
        }
        Route::UserDetails(_) => Page::UserDetails(UserDetailsView::load(state.user)?),
        Route::ProjectDetails(_) => {
            let mut workflow = ProjectWorkflow::mount(ctx, state.project, state.company.as_ref())?;
            workflow.load_all().await;
            Page::Project(Box::new(workflow))
        }
    };
    Ok(page)
}

/// Keeps the current page and unmounts it when navigating elsewhere.
pub struct Navigator {
    ctx: AppContext,
    current: Option<Page>,
}

impl Navigator {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx, current: None }
    }

    /// Navigate to `route`, following redirects up to a small bound.
    pub async fn go(&mut self, route: Route, state: NavState) -> (&Page, Vec<Notice>) {
        if let Some(page) = self.current.take() {
            page.unmount();
        }

        let mut notices = Vec::new();
        let mut route = route;
        let mut state = state;
        for _ in 0..4 {
            match navigate(&self.ctx, &route, state).await {
                Navigation::Render(page) => {
                    return (self.current.insert(page), notices);
                }
                Navigation::Redirect { to, notice } => {
                    notices.extend(notice);
                    route = to.parse().unwrap_or(Route::Auth);
                    state = NavState::default();
                }
            }
        }

        (self.current.insert(Page::Login), notices)
    }

    pub fn current_mut(&mut self) -> Option<&mut Page> {
        self.current.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_routes() {
        assert_eq!("/dashboard".parse::<Route>().unwrap(), Route::Dashboard);
        assert_eq!("/".parse::<Route>().unwrap(), Route::Dashboard);
        assert_eq!("/projects/".parse::<Route>().unwrap(), Route::Projects);
        assert_eq!(
            "/project/42".parse::<Route>().unwrap(),
            Route::ProjectDetails("42".to_string())
        );
        assert_eq!(
            "/user/abc".parse::<Route>().unwrap(),
            Route::UserDetails("abc".to_string())
        );
        assert!("/project".parse::<Route>().is_err());
        assert!("/nowhere".parse::<Route>().is_err());
    }

    #[test]
    fn test_only_admin_lists_are_guarded() {
        assert_eq!(Route::Users.required_role(), Some(Role::Admin));
        assert_eq!(Route::Companies.required_role(), Some(Role::Admin));
        assert_eq!(Route::Projects.required_role(), Some(Role::Admin));
        assert_eq!(Route::MyProjects.required_role(), None);
        assert_eq!(Route::ProjectDetails("1".into()).required_role(), None);
    }
}
