use std::sync::Arc;

use tracing::{info, warn};

use crate::outcome::{DegradeReason, Outcome};
use crate::traits::CommentSource;

/// Comments read per reel unless configured otherwise.
pub const DEFAULT_COMMENT_LIMIT: usize = 3;

/// Public URL of the post behind a reel short code.
pub fn post_url(short_code: &str) -> String {
    format!("https://www.instagram.com/p/{short_code}")
}

/// Fetches a handful of public comments for a shared reel.
pub struct CommentFetcher {
    source: Arc<dyn CommentSource>,
}

impl CommentFetcher {
    pub fn new(source: Arc<dyn CommentSource>) -> Self {
        Self { source }
    }

    /// Up to `limit` comment texts for the reel `short_code`.
    ///
    /// Never fails: a scrape error yields an empty list tagged
    /// [`DegradeReason::ScrapeFailed`]. An empty but successful scrape is a
    /// normal result (comments off, deleted reel).
    pub async fn fetch(&self, short_code: &str, limit: usize) -> Outcome<Vec<String>> {
        let url = post_url(short_code);

        match self.source.comments(&url, limit).await {
            Ok(mut comments) => {
                comments.truncate(limit);
                info!(short_code, count = comments.len(), "Fetched reel comments");
                Outcome::Fresh(comments)
            }
            Err(e) => {
                warn!(short_code, error = %e, "Error fetching comments for reel");
                Outcome::degraded(Vec::new(), DegradeReason::ScrapeFailed(e.to_string()))
            }
        }
    }
}
