//! Project comment model.

use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id};

/// A comment in a project thread. Comments are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(
        rename = "projectId",
        default,
        deserialize_with = "deserialize_opt_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub project_id: Option<String>,
    /// Auth id of the sender
    #[serde(rename = "userAuthId", default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(rename = "userName", default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// A comment together with the name it is displayed under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThreadEntry {
    pub comment: Comment,
    pub display_name: String,
}

impl ThreadEntry {
    pub const UNKNOWN_SENDER: &'static str = "Unknown";

    /// Wrap a fetched comment, using the name the backend attached to it.
    pub fn from_fetched(comment: Comment) -> Self {
        let display_name = comment
            .user_name
            .clone()
            .unwrap_or_else(|| Self::UNKNOWN_SENDER.to_string());
        Self {
            comment,
            display_name,
        }
    }
}
