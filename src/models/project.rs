//! Project model.

use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// A project. `company` holds the backend's company reference as sent
/// (usually a name, sometimes an id); resolve it against the company list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

/// Request body for creating a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: String,
    pub start_date: String,
    pub end_date: String,
    /// Company name as expected by the backend
    pub company: String,
}
