//! Project Dashboard Client
//!
//! Terminal client for the project/company/user management dashboard backend.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod router;
mod views;
mod workflow;

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use api::{ApiClient, Credentials, LoginKind};
use auth::{IdentityResolver, RedirectPolicy, Session, SessionStore};
use config::Config;
use errors::ClientError;
use models::{AddUserRequest, Role, UpdateUserRequest};
use router::{NavState, Navigator, Page, Route};
use views::NewProject;
use workflow::ProjectWorkflow;

/// Per-page-load context handed to every view.
///
/// Built once from the stored session; views never read the session store
/// themselves.
#[derive(Clone)]
pub struct AppContext {
    pub api: ApiClient,
    pub identity: Arc<IdentityResolver>,
    pub policy: Arc<RedirectPolicy>,
}

impl AppContext {
    pub fn new(api: ApiClient, session: Option<Session>, policy: RedirectPolicy) -> Self {
        Self {
            identity: Arc::new(IdentityResolver::new(api.clone(), session)),
            api,
            policy: Arc::new(policy),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.identity.session()
    }
}

/// What the binary was asked to do.
#[derive(Debug, Clone, PartialEq)]
enum Command {
    Navigate(String),
    Login(LoginKind, Credentials),
    Logout,
    Comment { project_id: String, text: String },
    AddMembers { project_id: String, user_ids: Vec<String> },
    RemoveMember { project_id: String, user_id: String },
    CreateProject(NewProject),
    AddUser(AddUserRequest),
    UpdateUser { user_id: String, update: UpdateUserRequest },
    DeleteUser { user_id: String },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self, ClientError> {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        let command = match args.as_slice() {
            [] => Command::Navigate("/dashboard".to_string()),
            ["login", "admin", email, password] => Command::Login(
                LoginKind::Admin,
                Credentials {
                    username: None,
                    email: email.to_string(),
                    password: password.to_string(),
                },
            ),
            ["login", "client", username, email, password] => Command::Login(
                LoginKind::Client,
                Credentials {
                    username: Some(username.to_string()),
                    email: email.to_string(),
                    password: password.to_string(),
                },
            ),
            ["logout"] => Command::Logout,
            ["comment", project_id, text @ ..] if !text.is_empty() => Command::Comment {
                project_id: project_id.to_string(),
                text: text.join(" "),
            },
            ["add-members", project_id, user_ids @ ..] if !user_ids.is_empty() => {
                Command::AddMembers {
                    project_id: project_id.to_string(),
                    user_ids: user_ids.iter().map(|s| s.to_string()).collect(),
                }
            }
            ["remove-member", project_id, user_id] => Command::RemoveMember {
                project_id: project_id.to_string(),
                user_id: user_id.to_string(),
            },
            ["create-project", name, company_id, start_date, end_date, description @ ..]
                if !description.is_empty() =>
            {
                Command::CreateProject(NewProject {
                    name: name.to_string(),
                    description: description.join(" "),
                    start_date: start_date.to_string(),
                    end_date: end_date.to_string(),
                    company_id: company_id.to_string(),
                })
            }
            ["add-user", username, email, password, role, company] => {
                Command::AddUser(AddUserRequest {
                    username: username.to_string(),
                    email: email.to_string(),
                    password: password.to_string(),
                    role: Role::from(role.to_string()),
                    company: company.to_string(),
                })
            }
            ["update-user", user_id, fields @ ..] if !fields.is_empty() => Command::UpdateUser {
                user_id: user_id.to_string(),
                update: parse_update(fields)?,
            },
            ["delete-user", user_id] => Command::DeleteUser {
                user_id: user_id.to_string(),
            },
            [path] if path.starts_with('/') => Command::Navigate(path.to_string()),
            _ => {
                return Err(ClientError::Validation(format!(
                    "Usage: dashboard-client [<path> | login admin <email> <password> | \
                     login client <username> <email> <password> | logout | \
                     comment <project_id> <text> | add-members <project_id> <user_id>... | \
                     remove-member <project_id> <user_id> | \
                     create-project <name> <company_id> <start> <end> <description> | \
                     add-user <username> <email> <password> <role> <company> | \
                     update-user <user_id> <field>=<value>... | delete-user <user_id>] \
                     (got {:?})",
                    args
                )))
            }
        };
        Ok(command)
    }
}

/// Parse `name=..`, `email=..`, `role=..` and `company=..` pairs.
fn parse_update(fields: &[&str]) -> Result<UpdateUserRequest, ClientError> {
    let mut update = UpdateUserRequest::default();
    for field in fields {
        let Some((key, value)) = field.split_once('=') else {
            return Err(ClientError::Validation(format!(
                "Expected <field>=<value>, got {}",
                field
            )));
        };
        let value = value.to_string();
        match key {
            "name" => update.name = Some(value),
            "email" => update.email = Some(value),
            "role" => update.role = Some(Role::from(value)),
            "company" => update.company = Some(value),
            _ => {
                return Err(ClientError::Validation(format!(
                    "Unknown user field {}",
                    key
                )))
            }
        }
    }
    Ok(update)
}

/// Parameters a page accepts in its route path.
#[derive(Debug, Default, PartialEq)]
struct PageParams {
    /// Search term for project lists (`?q=`)
    query: Option<String>,
    /// Company whose users the users view lists (`?company=`)
    company: Option<String>,
}

/// Split `/projects?q=term` into the route path and its decoded parameters.
fn split_params(path: &str) -> Result<(String, PageParams), ClientError> {
    let url = reqwest::Url::parse(&format!("http://dashboard{}", path))
        .map_err(|e| ClientError::Validation(format!("Invalid route {}: {}", path, e)))?;

    let mut params = PageParams::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "q" => params.query = Some(value.into_owned()),
            "company" => params.company = Some(value.into_owned()),
            other => tracing::debug!("Ignoring route parameter {}", other),
        }
    }
    Ok((url.path().to_string(), params))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::debug!("Backend: {}", config.api_url);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let api = match config.request_timeout {
        Some(timeout) => ApiClient::with_timeout(config.api_url.clone(), timeout)?,
        None => ApiClient::new(config.api_url.clone()),
    };
    let store = SessionStore::new(config.session_path.clone());
    tracing::debug!("Session file: {:?}", store.path());

    let output = run(command, api, &store, RedirectPolicy::from_config(&config)).await?;
    print!("{}", output);

    Ok(())
}

/// Execute one command and return what should be printed.
async fn run(
    command: Command,
    api: ApiClient,
    store: &SessionStore,
    policy: RedirectPolicy,
) -> Result<String, ClientError> {
    match command {
        Command::Login(kind, credentials) => {
            let id = api.login(kind, &credentials).await?;
            store.set(&id).await?;
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, Route::Dashboard, |_, _| no_action()).await
        }
        Command::Logout => {
            store.clear().await?;
            Ok("Logged out.\n".to_string())
        }
        Command::Navigate(path) => {
            let (path, params) = split_params(&path)?;
            let route: Route = path.parse()?;
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, route, move |ctx, page| {
                Box::pin(async move {
                    if let Some(query) = params.query {
                        page.set_query(query);
                    }
                    match (params.company, page) {
                        (Some(company), Page::Users(view)) => {
                            view.select_company(ctx, &company).await
                        }
                        _ => Ok(()),
                    }
                })
            })
            .await
        }
        Command::Comment { project_id, text } => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_project(ctx, &project_id, |workflow| {
                Box::pin(async move { workflow.post_comment(&text).await })
            })
            .await
        }
        Command::AddMembers {
            project_id,
            user_ids,
        } => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_project(ctx, &project_id, |workflow| {
                Box::pin(async move {
                    workflow.open_add_members()?;
                    workflow.select(&user_ids);
                    workflow.add_selected().await
                })
            })
            .await
        }
        Command::RemoveMember {
            project_id,
            user_id,
        } => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_project(ctx, &project_id, |workflow| {
                Box::pin(async move { workflow.remove_member(&user_id).await })
            })
            .await
        }
        Command::CreateProject(input) => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, Route::Projects, move |ctx, page| {
                Box::pin(async move {
                    match page {
                        Page::Projects(view) => view.create(ctx, input).await.map(|_| ()),
                        _ => Ok(()),
                    }
                })
            })
            .await
        }
        Command::AddUser(request) => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, Route::Users, move |ctx, page| {
                Box::pin(async move {
                    match page {
                        Page::Users(view) => {
                            let company = request.company.clone();
                            view.add_user(ctx, request).await?;
                            view.select_company(ctx, &company).await
                        }
                        _ => Ok(()),
                    }
                })
            })
            .await
        }
        Command::UpdateUser { user_id, update } => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, Route::UserDetails(user_id), move |ctx, page| {
                Box::pin(async move {
                    match page {
                        Page::UserDetails(view) => view.update(ctx, &update).await,
                        _ => Ok(()),
                    }
                })
            })
            .await
        }
        Command::DeleteUser { user_id } => {
            let ctx = AppContext::new(api, store.get().await?, policy);
            with_page(ctx, Route::UserDetails(user_id), |ctx, page| {
                Box::pin(async move {
                    match page {
                        Page::UserDetails(view) => view.delete(ctx).await,
                        _ => Ok(()),
                    }
                })
            })
            .await
        }
    }
}

type PageAction<'a> =
    std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), ClientError>> + 'a>>;

fn no_action<'a>() -> PageAction<'a> {
    Box::pin(async { Ok(()) })
}

/// Navigate to `route`, run `action` against the page that was rendered and
/// print the result. The page lists any failure as a notice.
async fn with_page<F>(ctx: AppContext, route: Route, action: F) -> Result<String, ClientError>
where
    F: for<'a> FnOnce(&'a AppContext, &'a mut Page) -> PageAction<'a>,
{
    let path = route.path();
    let state = NavState::for_route(&ctx, &route).await;
    let mut navigator = Navigator::new(ctx.clone());
    let (_, notices) = navigator.go(route, state).await;

    let mut out = String::new();
    for notice in &notices {
        out.push_str(&format!("{}\n", notice));
    }

    if let Some(page) = navigator.current_mut() {
        match action(&ctx, &mut *page).await {
            Ok(()) => {}
            Err(e) if e.is_local() => tracing::debug!("Rejected: {}", e),
            Err(e) => tracing::warn!("Action on {} failed: {}", path, e),
        }
        out.push_str(&page.render());
    }
    Ok(out)
}

/// Open the project view and run `action` against its workflow.
async fn with_project<F>(ctx: AppContext, project_id: &str, action: F) -> Result<String, ClientError>
where
    F: for<'a> FnOnce(&'a mut ProjectWorkflow) -> PageAction<'a>,
{
    let route = Route::ProjectDetails(project_id.to_string());
    with_page(ctx, route, move |_, page| match page {
        Page::Project(workflow) => action(&mut **workflow),
        _ => no_action(),
    })
    .await
}
