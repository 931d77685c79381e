pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{InstagramComment, InstagramCommentScraperInput, RunData, RunPhase};

use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// Actor ID for apify/instagram-comment-scraper.
pub const INSTAGRAM_COMMENT_SCRAPER: &str = "SbK00X0JYCPblD2wp";

/// Dataset items are read in pages of at most this many rows.
const DATASET_PAGE_SIZE: usize = 50;

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
    comment_actor: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
            comment_actor: INSTAGRAM_COMMENT_SCRAPER.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Use a different actor for comment scraping. It must accept the
    /// `directUrls`/`resultsLimit` input shape.
    pub fn with_comment_actor(mut self, actor_id: impl Into<String>) -> Self {
        self.comment_actor = actor_id.into();
        self
    }

    pub fn comment_actor(&self) -> &str {
        &self.comment_actor
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize + ?Sized>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let resp = error_for_status(resp).await?;
        let api_resp: ApiResponse<RunData> = resp.json().await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let resp = error_for_status(resp).await?;
            let api_resp: ApiResponse<RunData> = resp.json().await?;
            match api_resp.data.phase() {
                RunPhase::Succeeded => return Ok(api_resp.data),
                RunPhase::Failed => {
                    return Err(ApifyError::RunFailed {
                        run_id: api_resp.data.id,
                        status: api_resp.data.status,
                    });
                }
                RunPhase::Running => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch one page of dataset items.
    pub async fn get_dataset_page<T: DeserializeOwned>(
        &self,
        dataset_id: &str,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<T>> {
        let url = format!(
            "{}/datasets/{}/items?format=json&clean=true&offset={}&limit={}",
            self.base_url, dataset_id, offset, limit
        );
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let resp = error_for_status(resp).await?;
        let items: Vec<T> = resp.json().await?;
        Ok(items)
    }

    /// Read a dataset page by page, stopping as soon as `keep` has accepted
    /// `max_items` rows or the dataset runs out.
    pub async fn collect_dataset_items<T, F>(
        &self,
        dataset_id: &str,
        max_items: usize,
        keep: F,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: FnMut(&T) -> bool,
    {
        collect_pages(
            max_items,
            DATASET_PAGE_SIZE,
            |offset, limit| self.get_dataset_page(dataset_id, offset, limit),
            keep,
        )
        .await
    }

    /// Scrape comments for one public post end-to-end: start run, poll, read
    /// the dataset until `max_items` comments with text are collected.
    pub async fn scrape_post_comments(
        &self,
        post_url: &str,
        results_limit: u32,
        max_items: usize,
    ) -> Result<Vec<InstagramComment>> {
        tracing::info!(post_url, results_limit, "Starting Instagram comment scrape");

        let input = InstagramCommentScraperInput {
            direct_urls: vec![post_url.to_string()],
            results_limit,
        };

        let run = self.start_run(&self.comment_actor, &input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        let comments: Vec<InstagramComment> = self
            .collect_dataset_items(&completed.default_dataset_id, max_items, |c: &InstagramComment| {
                c.content().is_some()
            })
            .await?;
        tracing::info!(count = comments.len(), "Fetched Instagram comments");

        Ok(comments)
    }
}

/// Pull pages of `page_size` rows from `fetch_page(offset, limit)` until
/// `keep` has accepted `max_items` rows. A page shorter than `page_size` is
/// the end of the feed.
async fn collect_pages<T, P, Fut, K>(
    max_items: usize,
    page_size: usize,
    mut fetch_page: P,
    mut keep: K,
) -> Result<Vec<T>>
where
    P: FnMut(usize, usize) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
    K: FnMut(&T) -> bool,
{
    let mut collected = Vec::new();
    let mut offset = 0;

    while collected.len() < max_items {
        let page = fetch_page(offset, page_size).await?;
        let page_len = page.len();
        offset += page_len;

        for item in page {
            if collected.len() >= max_items {
                break;
            }
            if keep(&item) {
                collected.push(item);
            }
        }

        if page_len < page_size {
            break;
        }
    }

    Ok(collected)
}

async fn error_for_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ApifyError::Api {
        status: status.as_u16(),
        message: body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_comment_scraper_actor() {
        let client = ApifyClient::new("apify_api_test".to_string());
        assert_eq!(client.comment_actor(), INSTAGRAM_COMMENT_SCRAPER);
        assert_eq!(client.base_url, BASE_URL);
    }

    #[test]
    fn builder_overrides_actor_and_base_url() {
        let client = ApifyClient::new("t".to_string())
            .with_comment_actor("someone~custom-comments")
            .with_base_url("http://localhost:9999/v2");
        assert_eq!(client.comment_actor(), "someone~custom-comments");
        assert_eq!(client.base_url, "http://localhost:9999/v2");
    }

    fn comment(text: Option<&str>) -> InstagramComment {
        InstagramComment {
            id: None,
            text: text.map(str::to_string),
            owner_username: None,
            timestamp: None,
            likes_count: None,
            post_url: None,
        }
    }

    fn comments(texts: &[&str]) -> Vec<InstagramComment> {
        texts.iter().map(|t| comment(Some(t))).collect()
    }

    /// Runs `collect_pages` over an in-memory dataset. Returns the kept
    /// texts and the offset of every page request.
    async fn collect_from(
        rows: &[InstagramComment],
        max_items: usize,
        page_size: usize,
    ) -> (Vec<String>, Vec<usize>) {
        let mut offsets = Vec::new();
        let kept = collect_pages(
            max_items,
            page_size,
            |offset, limit| {
                offsets.push(offset);
                let page: Vec<InstagramComment> =
                    rows.iter().skip(offset).take(limit).cloned().collect();
                std::future::ready(Ok(page))
            },
            |c: &InstagramComment| c.content().is_some(),
        )
        .await
        .unwrap();

        let texts = kept
            .iter()
            .filter_map(|c| c.content().map(str::to_string))
            .collect();
        (texts, offsets)
    }

    #[tokio::test]
    async fn stops_mid_page_once_limit_is_reached() {
        let rows = comments(&["a", "b", "c", "d", "e"]);

        let (texts, offsets) = collect_from(&rows, 4, 3).await;

        assert_eq!(texts, vec!["a", "b", "c", "d"]);
        assert_eq!(offsets, vec![0, 3]);
    }

    #[tokio::test]
    async fn short_page_ends_the_feed() {
        let rows = comments(&["a", "b", "c", "d", "e"]);

        let (texts, offsets) = collect_from(&rows, 10, 3).await;

        assert_eq!(texts, vec!["a", "b", "c", "d", "e"]);
        assert_eq!(offsets, vec![0, 3]);
    }

    #[tokio::test]
    async fn empty_page_after_full_pages_ends_the_feed() {
        let rows = comments(&["a", "b", "c", "d"]);

        let (texts, offsets) = collect_from(&rows, 10, 2).await;

        assert_eq!(texts.len(), 4);
        assert_eq!(offsets, vec![0, 2, 4]);
    }

    #[tokio::test]
    async fn rows_without_text_are_skipped_and_not_counted() {
        let rows = vec![
            comment(Some("first")),
            comment(None),
            comment(Some("   ")),
            comment(Some("second")),
            comment(Some("third")),
        ];

        let (texts, offsets) = collect_from(&rows, 2, 50).await;

        assert_eq!(texts, vec!["first", "second"]);
        assert_eq!(offsets, vec![0]);
    }

    #[tokio::test]
    async fn skipped_rows_make_reading_continue_onto_the_next_page() {
        let rows = vec![
            comment(None),
            comment(None),
            comment(Some("late")),
            comment(Some("later")),
        ];

        let (texts, offsets) = collect_from(&rows, 1, 2).await;

        assert_eq!(texts, vec!["late"]);
        assert_eq!(offsets, vec![0, 2]);
    }

    #[tokio::test]
    async fn zero_limit_reads_nothing() {
        let rows = comments(&["a"]);

        let (texts, offsets) = collect_from(&rows, 0, 50).await;

        assert!(texts.is_empty());
        assert!(offsets.is_empty());
    }

    #[tokio::test]
    async fn page_error_is_returned() {
        let result: Result<Vec<InstagramComment>> = collect_pages(
            3,
            50,
            |_, _| {
                std::future::ready(Err(ApifyError::Api {
                    status: 502,
                    message: "Bad gateway".to_string(),
                }))
            },
            |_| true,
        )
        .await;

        assert!(matches!(result, Err(ApifyError::Api { status: 502, .. })));
    }
}
