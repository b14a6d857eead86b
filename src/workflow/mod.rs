//! Project collaboration workflow.
//!
//! One mounted instance per project view. It owns four independent data
//! slots (members, company users, comments, admin flag), each latched to fire
//! its fetch at most once per mount, and the membership and comment actions.

mod mount;
mod slot;

pub use mount::*;
pub use slot::*;

use std::collections::HashSet;

use crate::api::ApiClient;
use crate::auth::Session;
use crate::errors::ClientError;
use crate::models::{Comment, Company, Project, ThreadEntry, User};
use crate::views::{render_notices, Notice};
use crate::AppContext;

/// Company users that are not yet members, deduplicated by id, in company order.
pub fn candidate_pool(company_users: &[User], members: &[User]) -> Vec<User> {
    let member_ids: HashSet<&str> = members.iter().map(|u| u.id.as_str()).collect();
    let mut seen = HashSet::new();

    company_users
        .iter()
        .filter(|u| !member_ids.contains(u.id.as_str()))
        .filter(|u| seen.insert(u.id.clone()))
        .cloned()
        .collect()
}

/// State and actions of the project collaboration view.
pub struct ProjectWorkflow {
    api: ApiClient,
    session: Option<Session>,
    project: Project,
    company_name: String,
    members: Slot<Vec<User>>,
    company_users: Slot<Vec<User>>,
    candidates: Vec<User>,
    comments: Slot<Vec<ThreadEntry>>,
    admin: Slot<bool>,
    selection: Vec<String>,
    modal_open: bool,
    draft: String,
    notices: Vec<Notice>,
    mount: MountHandle,
}

impl ProjectWorkflow {
    /// Mount the workflow for `project`. `company` is the resolved company of
    /// the project, when known; otherwise the project's own reference is used.
    pub fn mount(
        ctx: &AppContext,
        project: Option<Project>,
        company: Option<&Company>,
    ) -> Result<Self, ClientError> {
        let project = project
            .filter(|p| !p.id.trim().is_empty())
            .ok_or_else(|| ClientError::MissingContext("No project data found!".to_string()))?;

        let company_name = company
            .map(|c| c.name.clone())
            .unwrap_or_else(|| project.company.clone());

        tracing::debug!("Mounting project workflow for {}", project.id);

        Ok(Self {
            api: ctx.api.clone(),
            session: ctx.session().cloned(),
            project,
            company_name,
            members: Slot::new(),
            company_users: Slot::new(),
            candidates: Vec::new(),
            comments: Slot::new(),
            admin: Slot::new(),
            selection: Vec::new(),
            modal_open: false,
            draft: String::new(),
            notices: Vec::new(),
            mount: MountHandle::new(),
        })
    }

    // ==================== LOADING ====================

    /// Fire every slot whose latch is still open, concurrently.
    ///
    /// Calling this again during the same mount (for instance after the
    /// members list changed) fires nothing new.
    pub async fn load_all(&mut self) {
        let key = self.project.id.clone();
        let session_id = self.session.as_ref().map(|s| s.id.clone());

        let fire_members = self.members.begin(&key);
        let fire_company = self.company_users.begin(&key);
        let fire_comments = match &session_id {
            Some(_) => self.comments.begin(&key),
            None => {
                self.fail_comments_closed();
                false
            }
        };
        let fire_admin = match &session_id {
            Some(_) => self.admin.begin(&key),
            None => {
                self.admin.fail_closed("No active session");
                false
            }
        };

        let api = self.api.clone();
        let company_name = self.company_name.clone();
        let requester = session_id.unwrap_or_default();

        let (members, company_users, comments, admin) = tokio::join!(
            async {
                if fire_members {
                    Some(api.project_members(&key).await)
                } else {
                    None
                }
            },
            async {
                if fire_company {
                    Some(api.users_by_company(&company_name).await)
                } else {
                    None
                }
            },
            async {
                if fire_comments {
                    Some(api.project_comments(&key, &requester).await)
                } else {
                    None
                }
            },
            async {
                if fire_admin {
                    Some(api.is_admin(&requester).await)
                } else {
                    None
                }
            },
        );

        if !self.is_mounted() {
            tracing::debug!("Project {} unmounted; dropping loaded data", key);
            return;
        }

        if let Some(result) = members {
            self.apply_members(result);
        }
        if let Some(result) = company_users {
            self.apply_company_users(result);
        }
        if let Some(result) = comments {
            self.apply_comments(result);
        }
        if let Some(result) = admin {
            self.apply_admin(result);
        }
    }

    /// Load the project's current members.
    pub async fn load_members(&mut self) {
        if !self.members.begin(&self.project.id) {
            return;
        }
        let result = self.api.project_members(&self.project.id).await;
        if self.is_mounted() {
            self.apply_members(result);
        }
    }

    /// Load the company's users; the candidate pool is derived from them.
    pub async fn load_candidates(&mut self) {
        if !self.company_users.begin(&self.project.id) {
            return;
        }
        let result = self.api.users_by_company(&self.company_name).await;
        if self.is_mounted() {
            self.apply_company_users(result);
        }
    }

    /// Load the comment thread. Without a session nothing is fetched.
    pub async fn load_comments(&mut self) {
        let Some(requester) = self.session.as_ref().map(|s| s.id.clone()) else {
            self.fail_comments_closed();
            return;
        };
        if !self.comments.begin(&self.project.id) {
            return;
        }
        let result = self
            .api
            .project_comments(&self.project.id, &requester)
            .await;
        if self.is_mounted() {
            self.apply_comments(result);
        }
    }

    /// Ask the backend whether the session's user is an admin.
    pub async fn load_admin_flag(&mut self) {
        let Some(auth_id) = self.session.as_ref().map(|s| s.id.clone()) else {
            self.admin.fail_closed("No active session");
            return;
        };
        if !self.admin.begin(&self.project.id) {
            return;
        }
        let result = self.api.is_admin(&auth_id).await;
        if self.is_mounted() {
            self.apply_admin(result);
        }
    }

    fn apply_members(&mut self, result: Result<Vec<User>, ClientError>) {
        if let Some(err) = self.members.finish(result) {
            self.report(format!("Failed to fetch users: {}", err.message()));
        }
        self.refresh_candidates();
    }

    fn apply_company_users(&mut self, result: Result<Vec<User>, ClientError>) {
        if let Some(err) = self.company_users.finish(result) {
            self.report(format!("Failed to fetch company users: {}", err.message()));
        }
        self.refresh_candidates();
    }

    fn apply_comments(&mut self, result: Result<Vec<Comment>, ClientError>) {
        let result =
            result.map(|comments| comments.into_iter().map(ThreadEntry::from_fetched).collect());
        if let Some(err) = self.comments.finish(result) {
            self.report(format!("Failed to fetch comments: {}", err.message()));
        }
    }

    fn apply_admin(&mut self, result: Result<bool, ClientError>) {
        if let Some(err) = self.admin.finish(result) {
            self.report(format!("Failed to fetch admin status: {}", err.message()));
        }
    }

    fn fail_comments_closed(&mut self) {
        if matches!(self.comments.state(), SlotState::Failed(_)) {
            return;
        }
        let err = ClientError::MissingSession;
        self.comments.fail_closed(err.message());
        self.report(err.message());
    }

    fn refresh_candidates(&mut self) {
        let members: &[User] = self.members.value().map(Vec::as_slice).unwrap_or(&[]);
        self.candidates = match self.company_users.value() {
            Some(users) => candidate_pool(users, members),
            None => Vec::new(),
        };
    }

    // ==================== MEMBERSHIP ====================

    /// Whether the member management actions are available.
    pub fn can_manage_members(&self) -> bool {
        self.admin.value().copied().unwrap_or(false)
    }

    /// Open the add-member selection, resetting any previous selection.
    pub fn open_add_members(&mut self) -> Result<(), ClientError> {
        self.require_admin()?;
        self.selection.clear();
        self.modal_open = true;
        Ok(())
    }

    pub fn close_add_members(&mut self) {
        self.modal_open = false;
    }

    pub fn select(&mut self, user_ids: &[String]) {
        self.selection = user_ids.to_vec();
    }

    /// Add the current selection to the project.
    pub async fn add_selected(&mut self) -> Result<(), ClientError> {
        let selection = self.selection.clone();
        self.add_members(&selection).await
    }

    /// Add `user_ids` to the project.
    ///
    /// Every id must be in the candidate pool. On failure nothing changes.
    pub async fn add_members(&mut self, user_ids: &[String]) -> Result<(), ClientError> {
        self.require_admin()?;

        let mut seen = HashSet::new();
        let ids: Vec<String> = user_ids
            .iter()
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        if ids.is_empty() {
            return Err(self.reject(ClientError::Validation(
                "Select at least one user".to_string(),
            )));
        }

        let added: Vec<User> = ids
            .iter()
            .filter_map(|id| self.candidates.iter().find(|u| &u.id == id))
            .cloned()
            .collect();
        if added.len() != ids.len() {
            return Err(self.reject(ClientError::Validation(
                "Only company users who are not yet members can be added".to_string(),
            )));
        }

        if let Err(e) = self.api.add_users_to_project(&self.project.id, &ids).await {
            return Err(self.reject(e));
        }
        if !self.is_mounted() {
            return Ok(());
        }

        tracing::info!("Added {} user(s) to project {}", added.len(), self.project.id);
        match self.members.value_mut() {
            Some(members) => members.extend(added),
            None => {
                self.members.finish(Ok(added));
            }
        }
        self.refresh_candidates();
        self.selection.clear();
        self.close_add_members();
        self.notices.push(Notice::success(
            "Users Added",
            "The users have been added to the project.",
        ));
        Ok(())
    }

    /// Remove one member from the project.
    pub async fn remove_member(&mut self, user_id: &str) -> Result<(), ClientError> {
        self.require_admin()?;

        if let Err(e) = self
            .api
            .remove_user_from_project(&self.project.id, user_id)
            .await
        {
            return Err(self.reject(e));
        }
        if !self.is_mounted() {
            return Ok(());
        }

        tracing::info!("Removed user {} from project {}", user_id, self.project.id);
        if let Some(members) = self.members.value_mut() {
            members.retain(|u| u.id != user_id);
        }
        self.refresh_candidates();
        self.notices.push(Notice::success(
            "User Removed",
            "The user has been removed from the project.",
        ));
        Ok(())
    }

    fn require_admin(&mut self) -> Result<(), ClientError> {
        if self.can_manage_members() {
            return Ok(());
        }
        Err(self.reject(ClientError::Forbidden(
            "Only admins can manage project members".to_string(),
        )))
    }

    // ==================== COMMENTS ====================

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Post the current draft.
    pub async fn send_draft(&mut self) -> Result<(), ClientError> {
        let text = self.draft.clone();
        self.post_comment(&text).await
    }

    /// Post `text` as the session's user and append it to the thread.
    ///
    /// Empty text is rejected without a request. When the comment is stored
    /// but the sender's name cannot be looked up, the thread is left as is and
    /// [`ClientError::PostedNotDisplayed`] is returned.
    pub async fn post_comment(&mut self, text: &str) -> Result<(), ClientError> {
        if text.trim().is_empty() {
            return Err(self.reject(ClientError::Validation(
                "Please type a message".to_string(),
            )));
        }
        let Some(sender) = self.session.as_ref().map(|s| s.id.clone()) else {
            return Err(self.reject(ClientError::MissingSession));
        };

        let mut comment = match self.api.add_comment(&self.project.id, &sender, text).await {
            Ok(comment) => comment,
            Err(e) => return Err(self.reject(e)),
        };

        let display_name = match comment.user_name.clone() {
            Some(name) => name,
            None => match self.api.get_user_name(&sender).await {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(
                        "Comment {} stored but sender name lookup failed: {}",
                        comment.id,
                        e
                    );
                    return Err(self.reject(ClientError::PostedNotDisplayed {
                        comment_id: comment.id,
                        message: format!(
                            "Message was sent but could not be displayed: {}",
                            e.message()
                        ),
                    }));
                }
            },
        };

        if !self.is_mounted() {
            return Ok(());
        }

        // The post response omits the thread keys that fetched comments carry
        comment.sender.get_or_insert_with(|| sender.clone());
        comment
            .project_id
            .get_or_insert_with(|| self.project.id.clone());

        let entry = ThreadEntry {
            comment,
            display_name,
        };
        match self.comments.value_mut() {
            Some(thread) => thread.push(entry),
            None => {
                self.comments.finish(Ok(vec![entry]));
            }
        }
        self.draft.clear();
        Ok(())
    }

    // ==================== ACCESSORS ====================

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn members(&self) -> &Slot<Vec<User>> {
        &self.members
    }

    /// The add-candidate pool: company users minus current members.
    pub fn candidates(&self) -> &[User] {
        &self.candidates
    }

    pub fn comments(&self) -> &Slot<Vec<ThreadEntry>> {
        &self.comments
    }

    pub fn is_add_members_open(&self) -> bool {
        self.modal_open
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Handle for abandoning this mount from elsewhere.
    pub fn mount_handle(&self) -> MountHandle {
        self.mount.clone()
    }

    pub fn unmount(&self) {
        self.mount.unmount();
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_mounted()
    }

    fn report(&mut self, message: impl Into<String>) {
        let notice = Notice::error(message);
        tracing::warn!("Project {}: {}", self.project.id, notice.message);
        self.notices.push(notice);
    }

    fn reject(&mut self, err: ClientError) -> ClientError {
        self.report(err.message());
        err
    }

    /// Plain-text rendering of the view.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n", self.project.name));
        out.push_str(&format!("Company: {}\n", self.company_name));
        out.push_str(&format!("Description: {}\n\n", self.project.description));

        out.push_str("Users Involved:\n");
        match self.members.state() {
            SlotState::Ready(members) => {
                for user in members {
                    if self.can_manage_members() {
                        out.push_str(&format!("  - {} ({}) [remove]\n", user.name, user.id));
                    } else {
                        out.push_str(&format!("  - {}\n", user.name));
                    }
                }
            }
            SlotState::Loading => out.push_str("  Loading users...\n"),
            _ => {}
        }
        if self.can_manage_members() && !self.candidates.is_empty() {
            out.push_str("Can be added:\n");
            for user in &self.candidates {
                out.push_str(&format!("  + {} ({})\n", user.name, user.id));
            }
        }

        out.push_str("\nProject Chat:\n");
        if self.comments.is_loading() {
            out.push_str("  Loading messages...\n");
        }
        if let Some(thread) = self.comments.value() {
            for entry in thread {
                out.push_str(&format!("  {}: {}\n", entry.display_name, entry.comment.content));
            }
        }

        render_notices(&mut out, &self.notices);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            auth_id: None,
            name: format!("user-{}", id),
            email: None,
            role: None,
            company: Some("Acme".to_string()),
        }
    }

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_candidate_pool_subtracts_members() {
        let company = vec![user("1"), user("2"), user("3")];
        let members = vec![user("2")];
        assert_eq!(ids(&candidate_pool(&company, &members)), vec!["1", "3"]);
    }

    #[test]
    fn test_candidate_pool_is_duplicate_free() {
        let company = vec![user("1"), user("1"), user("3"), user("3")];
        assert_eq!(ids(&candidate_pool(&company, &[])), vec!["1", "3"]);
    }

    #[test]
    fn test_candidate_pool_all_members() {
        let company = vec![user("1"), user("2")];
        assert!(candidate_pool(&company, &company).is_empty());
    }
}
