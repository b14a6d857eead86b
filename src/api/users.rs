//! User endpoints.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{AddUserRequest, User};

#[derive(Debug, Deserialize)]
pub(crate) struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct AddUserResponse {
    user: User,
}

#[derive(Debug, Serialize)]
struct DeleteUserRequest<'a> {
    email: &'a str,
}

impl ApiClient {
    /// `GET /getUsersByCompany?company_name=`
    pub async fn users_by_company(&self, company_name: &str) -> Result<Vec<User>, ClientError> {
        let response: UsersResponse = self
            .get_json("/getUsersByCompany", &[("company_name", company_name)])
            .await?;
        Ok(response.users)
    }

    /// `POST /addUser`
    pub async fn add_user(&self, request: &AddUserRequest) -> Result<User, ClientError> {
        let response: AddUserResponse = self
            .send_json(reqwest::Method::POST, "/addUser", request)
            .await?;
        Ok(response.user)
    }

    /// `PUT /api/update-user` with the full merged record.
    pub async fn update_user(&self, user: &User) -> Result<(), ClientError> {
        self.send_checked(reqwest::Method::PUT, "/api/update-user", user)
            .await
    }

    /// `DELETE /api/delete-user` - users are addressed by email here.
    pub async fn delete_user(&self, email: &str) -> Result<(), ClientError> {
        self.send_checked(
            reqwest::Method::DELETE,
            "/api/delete-user",
            &DeleteUserRequest { email },
        )
        .await
    }
}
