//! Story model and submission payload.

use serde::{Deserialize, Serialize};

/// A submitted story as stored in the story document.
///
/// Records written by the first version of the site hold the raw form fields
/// (`name`, `email`, `story`), so those names are read as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "name")]
    pub author_name: String,
    #[serde(default, alias = "email")]
    pub author_email: String,
    #[serde(default, alias = "story", alias = "content")]
    pub body: String,
    /// Set at submission after a paid boost, never cleared
    #[serde(default, alias = "priority")]
    pub is_priority: bool,
    #[serde(default)]
    pub community_votes: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Request body for submitting a new story.
///
/// The aliases accept the field names used by the submission form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStoryRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "name")]
    pub author_name: String,
    #[serde(default, alias = "email")]
    pub author_email: String,
    #[serde(default, alias = "story")]
    pub body: String,
    #[serde(default, alias = "isPriority")]
    pub priority: Option<bool>,
}

impl SubmitStoryRequest {
    /// Check that every required text field is present.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("authorName", &self.author_name),
            ("authorEmail", &self.author_email),
            ("body", &self.body),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// Response body for a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitStoryResponse {
    pub success: bool,
    pub message: String,
    pub story: Story,
}
