//! Identity resolution: session identifier to principal.

use tokio::sync::OnceCell;

use super::Session;
use crate::api::ApiClient;
use crate::errors::ClientError;
use crate::models::Principal;

/// Resolve `session_id` to a principal with a single backend call.
///
/// Any failure, including a record without a role, is reported as
/// [`ClientError::ResolutionFailed`].
pub async fn resolve_principal(api: &ApiClient, session_id: &str) -> Result<Principal, ClientError> {
    if session_id.trim().is_empty() {
        return Err(ClientError::MissingSession);
    }

    let user = api.get_user(session_id).await.map_err(|e| {
        tracing::warn!("Could not resolve session {}: {}", session_id, e);
        ClientError::ResolutionFailed(e.message())
    })?;

    Principal::from_record(session_id, user)
}

/// Resolves the session's principal once per page load and keeps it.
///
/// Failures are not cached; a later call may try again.
pub struct IdentityResolver {
    api: ApiClient,
    session: Option<Session>,
    principal: OnceCell<Principal>,
}

impl IdentityResolver {
    pub fn new(api: ApiClient, session: Option<Session>) -> Self {
        Self {
            api,
            session,
            principal: OnceCell::new(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn resolve(&self) -> Result<&Principal, ClientError> {
        let session = self.session.as_ref().ok_or(ClientError::MissingSession)?;
        self.principal
            .get_or_try_init(|| resolve_principal(&self.api, &session.id))
            .await
    }

    /// Resolve, treating every failure as "no principal".
    pub async fn principal(&self) -> Option<&Principal> {
        match self.resolve().await {
            Ok(principal) => Some(principal),
            Err(ClientError::MissingSession) => None,
            Err(e) => {
                tracing::warn!("Continuing without a principal: {}", e);
                None
            }
        }
    }
}
