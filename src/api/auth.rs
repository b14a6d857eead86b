//! Login and identity endpoints.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{deserialize_id, User};

/// Which login flow to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginKind {
    Admin,
    Client,
}

impl LoginKind {
    fn path(self) -> &'static str {
        match self {
            LoginKind::Admin => "/loginAdmin",
            LoginKind::Client => "/loginClient",
        }
    }
}

/// Credentials sent to the login endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    user: LoginUser,
}

#[derive(Debug, Deserialize)]
struct LoginUser {
    #[serde(deserialize_with = "deserialize_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct IsAdminResponse {
    #[serde(rename = "isAdmin")]
    is_admin: bool,
}

#[derive(Debug, Deserialize)]
struct NameResponse {
    name: String,
}

impl ApiClient {
    /// `POST /loginAdmin` or `/loginClient`. Returns the id to store as the session.
    pub async fn login(&self, kind: LoginKind, credentials: &Credentials) -> Result<String, ClientError> {
        let response: LoginResponse = self
            .send_json(reqwest::Method::POST, kind.path(), credentials)
            .await?;
        Ok(response.user.id)
    }

    /// `GET /getUser?user_id=` - the full user record behind a session id.
    pub async fn get_user(&self, user_id: &str) -> Result<User, ClientError> {
        self.get_json("/getUser", &[("user_id", user_id)]).await
    }

    /// `GET /isAdmin?authId=`
    pub async fn is_admin(&self, auth_id: &str) -> Result<bool, ClientError> {
        let response: IsAdminResponse = self.get_json("/isAdmin", &[("authId", auth_id)]).await?;
        Ok(response.is_admin)
    }

    /// `GET /getUserNameById?user_id=`
    pub async fn get_user_name(&self, user_id: &str) -> Result<String, ClientError> {
        let response: NameResponse = self
            .get_json("/getUserNameById", &[("user_id", user_id)])
            .await?;
        Ok(response.name)
    }
}
