//! Entity list and detail views.
//!
//! Each view performs its own fetch when loaded and degrades to an empty
//! section plus a notice when that fetch fails.

mod companies;
mod dashboard;
mod projects;
mod users;

pub use companies::*;
pub use dashboard::*;
pub use projects::*;
pub use users::*;

use crate::errors::ClientError;

/// Severity of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-visible notification.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: "Error".to_string(),
            message: message.into(),
        }
    }

    pub fn from_error(err: &ClientError) -> Self {
        Self::error(err.message())
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            NoticeLevel::Success => write!(f, "[{}] {}", self.title, self.message),
            NoticeLevel::Error => write!(f, "! [{}] {}", self.title, self.message),
        }
    }
}

/// Render notices as trailing lines.
pub(crate) fn render_notices(out: &mut String, notices: &[Notice]) {
    for notice in notices {
        out.push_str(&format!("{}\n", notice));
    }
}
