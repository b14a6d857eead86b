//! Project and membership endpoints.

use serde::{Deserialize, Serialize};

use super::users::UsersResponse;
use super::ApiClient;
use crate::errors::ClientError;
use crate::models::{CreateProjectRequest, Project, User};

#[derive(Debug, Deserialize)]
struct ProjectsResponse {
    projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
struct ClientProjectsRequest<'a> {
    #[serde(rename = "authId")]
    auth_id: &'a str,
}

#[derive(Debug, Serialize)]
struct AddUsersRequest<'a> {
    project_id: &'a str,
    user_ids: &'a [String],
}

#[derive(Debug, Serialize)]
struct RemoveUserRequest<'a> {
    user_id: &'a str,
    project_id: &'a str,
}

impl ApiClient {
    /// `GET /getAllProjects`
    pub async fn all_projects(&self) -> Result<Vec<Project>, ClientError> {
        let response: ProjectsResponse = self.get_json("/getAllProjects", &[]).await?;
        Ok(response.projects)
    }

    /// `POST /getClientsProjects` - projects visible to the given auth id.
    pub async fn client_projects(&self, auth_id: &str) -> Result<Vec<Project>, ClientError> {
        let response: ProjectsResponse = self
            .send_json(
                reqwest::Method::POST,
                "/getClientsProjects",
                &ClientProjectsRequest { auth_id },
            )
            .await?;
        Ok(response.projects)
    }

    /// `POST /createProject` - returns the created project.
    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<Project, ClientError> {
        self.send_json(reqwest::Method::POST, "/createProject", request)
            .await
    }

    /// `GET /getUsersByProject?project_id=`
    pub async fn project_members(&self, project_id: &str) -> Result<Vec<User>, ClientError> {
        let response: UsersResponse = self
            .get_json("/getUsersByProject", &[("project_id", project_id)])
            .await?;
        Ok(response.users)
    }

    /// `POST /addUsersToProject`
    pub async fn add_users_to_project(
        &self,
        project_id: &str,
        user_ids: &[String],
    ) -> Result<(), ClientError> {
        self.send_checked(
            reqwest::Method::POST,
            "/addUsersToProject",
            &AddUsersRequest {
                project_id,
                user_ids,
            },
        )
        .await
    }

    /// `POST /removeUserFromProject`
    pub async fn remove_user_from_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<(), ClientError> {
        self.send_checked(
            reqwest::Method::POST,
            "/removeUserFromProject",
            &RemoveUserRequest {
                user_id,
                project_id,
            },
        )
        .await
    }
}
