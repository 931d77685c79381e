// Seams between the responder and the three remote services.
//
// Inbox: Direct threads, sending replies, seen receipts (Instagram)
// CommentSource: scraped comment text for a public post URL (Apify)
// TextGenerator: one-shot chat completion (OpenAI)
//
// The responder only ever talks to these traits, so the whole poll → scrape →
// generate → send cycle runs against the in-memory mocks in `testing`.

use anyhow::Result;
use async_trait::async_trait;

use ai_client::{ChatOptions, OpenAi};
use apify_client::ApifyClient;
use instagram_client::{DirectItem, DirectThread, InstagramClient};

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[async_trait]
pub trait Inbox: Send + Sync {
    /// User id of the account the bot is logged in as.
    fn own_user_id(&self) -> &str;

    async fn list_threads(&self) -> Result<Vec<DirectThread>>;

    /// Send `text` into `thread_id` as a reply to `reply_to`.
    async fn send_reply(&self, thread_id: &str, text: &str, reply_to: &DirectItem) -> Result<()>;

    async fn mark_seen(&self, thread_id: &str, item_id: &str) -> Result<()>;
}

#[async_trait]
impl Inbox for InstagramClient {
    fn own_user_id(&self) -> &str {
        self.user_id()
    }

    async fn list_threads(&self) -> Result<Vec<DirectThread>> {
        Ok(self.direct_threads().await?)
    }

    async fn send_reply(&self, thread_id: &str, text: &str, reply_to: &DirectItem) -> Result<()> {
        Ok(self.direct_send(thread_id, text, Some(reply_to)).await?)
    }

    async fn mark_seen(&self, thread_id: &str, item_id: &str) -> Result<()> {
        Ok(self.direct_message_seen(thread_id, item_id).await?)
    }
}

// ---------------------------------------------------------------------------
// CommentSource
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CommentSource: Send + Sync {
    /// Up to `limit` comment texts for the post at `post_url`.
    async fn comments(&self, post_url: &str, limit: usize) -> Result<Vec<String>>;
}

/// Apify-backed comment source.
pub struct ApifyComments {
    client: ApifyClient,
    /// How many comments the actor is asked to scrape per run.
    results_limit: u32,
}

impl ApifyComments {
    pub fn new(client: ApifyClient, results_limit: u32) -> Self {
        Self {
            client,
            results_limit,
        }
    }
}

#[async_trait]
impl CommentSource for ApifyComments {
    async fn comments(&self, post_url: &str, limit: usize) -> Result<Vec<String>> {
        let comments = self
            .client
            .scrape_post_comments(post_url, self.results_limit, limit)
            .await?;

        Ok(comments
            .into_iter()
            .filter_map(|c| c.content().map(str::to_string))
            .collect())
    }
}

// ---------------------------------------------------------------------------
// TextGenerator
// ---------------------------------------------------------------------------

#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

#[async_trait]
impl TextGenerator for OpenAi {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        self.chat_with_options(
            system,
            user,
            ChatOptions {
                max_tokens,
                temperature: Some(temperature),
            },
        )
        .await
    }
}
