//! Comment thread endpoints.

use serde::{Deserialize, Serialize};

use super::ApiClient;
use crate::errors::ClientError;
use crate::models::Comment;

#[derive(Debug, Deserialize)]
struct CommentsResponse {
    comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    comment: Comment,
}

#[derive(Debug, Serialize)]
struct AddCommentRequest<'a> {
    project_id: &'a str,
    comment: &'a str,
    sender: &'a str,
}

impl ApiClient {
    /// `GET /getCommentsByProject?project_id=&user_id=` in server order.
    pub async fn project_comments(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Vec<Comment>, ClientError> {
        let response: CommentsResponse = self
            .get_json(
                "/getCommentsByProject",
                &[("project_id", project_id), ("user_id", user_id)],
            )
            .await?;
        Ok(response.comments)
    }

    /// `POST /addComment` - returns the stored comment.
    pub async fn add_comment(
        &self,
        project_id: &str,
        sender: &str,
        content: &str,
    ) -> Result<Comment, ClientError> {
        let response: CommentResponse = self
            .send_json(
                reqwest::Method::POST,
                "/addComment",
                &AddCommentRequest {
                    project_id,
                    comment: content,
                    sender,
                },
            )
            .await?;
        Ok(response.comment)
    }
}
