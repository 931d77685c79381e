use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Input for the apify/instagram-comment-scraper actor.
#[derive(Debug, Clone, Serialize)]
pub struct InstagramCommentScraperInput {
    #[serde(rename = "directUrls")]
    pub direct_urls: Vec<String>,
    #[serde(rename = "resultsLimit")]
    pub results_limit: u32,
}

/// A single comment from the comment scraper's dataset.
///
/// Every field is optional: the actor emits placeholder rows (for example
/// when comments are disabled) that carry an error marker and no text.
#[derive(Debug, Clone, Deserialize)]
pub struct InstagramComment {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "ownerUsername")]
    pub owner_username: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "likesCount")]
    pub likes_count: Option<i64>,
    #[serde(rename = "postUrl")]
    pub post_url: Option<String>,
}

impl InstagramComment {
    /// Comment body, if the row has a non-blank one.
    pub fn content(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.trim().is_empty())
    }
}

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
}

/// Where a run sits in its lifecycle, derived from the raw status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Running,
    Succeeded,
    Failed,
}

impl RunData {
    pub fn phase(&self) -> RunPhase {
        match self.status.as_str() {
            "SUCCEEDED" => RunPhase::Succeeded,
            "FAILED" | "ABORTED" | "TIMED-OUT" => RunPhase::Failed,
            _ => RunPhase::Running,
        }
    }
}
