// Test mocks for the responder pipeline.
//
// Three mocks matching the three trait boundaries:
// - MockInbox (Inbox): fixed thread listing, records sends and seen receipts
// - MockCommentSource (CommentSource): HashMap-based URL→comments
// - MockGenerator (TextGenerator): canned completion, records requests
//
// Plus builders for Direct threads and items.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use instagram_client::{DirectItem, DirectThread};

use crate::traits::{CommentSource, Inbox, TextGenerator};

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn thread(thread_id: &str, items: Vec<DirectItem>) -> DirectThread {
    DirectThread {
        thread_id: thread_id.to_string(),
        thread_title: None,
        items,
    }
}

/// A reel share from `user_id` with short code `code`.
pub fn clip_item(item_id: &str, user_id: &str, code: &str) -> DirectItem {
    let json = serde_json::json!({
        "item_id": item_id,
        "user_id": user_id,
        "item_type": "clip",
        "clip": { "clip": { "code": code } },
    });
    serde_json::from_value(json).unwrap_or_else(|e| panic!("bad clip fixture: {e}"))
}

pub fn text_item(item_id: &str, user_id: &str, text: &str) -> DirectItem {
    let json = serde_json::json!({
        "item_id": item_id,
        "user_id": user_id,
        "item_type": "text",
        "text": text,
    });
    serde_json::from_value(json).unwrap_or_else(|e| panic!("bad text fixture: {e}"))
}

// ---------------------------------------------------------------------------
// MockInbox
// ---------------------------------------------------------------------------

/// A reply the responder tried to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentReply {
    pub thread_id: String,
    pub text: String,
    pub reply_to: String,
}

/// Inbox that lists the same threads on every call.
pub struct MockInbox {
    own_user_id: String,
    threads: Mutex<Vec<DirectThread>>,
    fail_listing: bool,
    fail_sends: bool,
    list_calls: AtomicUsize,
    sent: Mutex<Vec<SentReply>>,
    seen: Mutex<Vec<(String, String)>>,
}

impl MockInbox {
    pub fn new(own_user_id: &str) -> Self {
        Self {
            own_user_id: own_user_id.to_string(),
            threads: Mutex::new(Vec::new()),
            fail_listing: false,
            fail_sends: false,
            list_calls: AtomicUsize::new(0),
            sent: Mutex::new(Vec::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn with_thread(self, thread: DirectThread) -> Self {
        self.push_thread(thread);
        self
    }

    /// Every `send_reply` call fails (and is still recorded).
    pub fn failing_sends(mut self) -> Self {
        self.fail_sends = true;
        self
    }

    pub fn failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// Add a thread after construction, e.g. between cycles.
    pub fn push_thread(&self, thread: DirectThread) {
        self.threads.lock().unwrap().push(thread);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentReply> {
        self.sent.lock().unwrap().clone()
    }

    pub fn seen(&self) -> Vec<(String, String)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Inbox for MockInbox {
    fn own_user_id(&self) -> &str {
        &self.own_user_id
    }

    async fn list_threads(&self) -> Result<Vec<DirectThread>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            bail!("MockInbox: listing failed");
        }
        Ok(self.threads.lock().unwrap().clone())
    }

    async fn send_reply(&self, thread_id: &str, text: &str, reply_to: &DirectItem) -> Result<()> {
        self.sent.lock().unwrap().push(SentReply {
            thread_id: thread_id.to_string(),
            text: text.to_string(),
            reply_to: reply_to.item_id.clone(),
        });
        if self.fail_sends {
            bail!("MockInbox: send rejected");
        }
        Ok(())
    }

    async fn mark_seen(&self, thread_id: &str, item_id: &str) -> Result<()> {
        self.seen
            .lock()
            .unwrap()
            .push((thread_id.to_string(), item_id.to_string()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockCommentSource
// ---------------------------------------------------------------------------

/// HashMap-based comment source. Returns `Err` for unregistered URLs.
pub struct MockCommentSource {
    responses: HashMap<String, std::result::Result<Vec<String>, String>>,
    hang: bool,
    calls: AtomicUsize,
}

impl MockCommentSource {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            hang: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn on_comments(mut self, post_url: &str, comments: &[&str]) -> Self {
        self.responses.insert(
            post_url.to_string(),
            Ok(comments.iter().map(|c| c.to_string()).collect()),
        );
        self
    }

    pub fn on_error(mut self, post_url: &str, error: &str) -> Self {
        self.responses
            .insert(post_url.to_string(), Err(error.to_string()));
        self
    }

    /// Every scrape stalls forever, like a run that never leaves RUNNING.
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCommentSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommentSource for MockCommentSource {
    async fn comments(&self, post_url: &str, limit: usize) -> Result<Vec<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        match self.responses.get(post_url) {
            Some(Ok(comments)) => Ok(comments.iter().take(limit).cloned().collect()),
            Some(Err(e)) => bail!("{e}"),
            None => bail!("MockCommentSource: no comments registered for {post_url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// One completion request as the generator saw it.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

pub struct MockGenerator {
    reply: std::result::Result<String, String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Ok(reply.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            reply: Err(error.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn complete(
        &self,
        system: &str,
        user: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        self.requests.lock().unwrap().push(CompletionRequest {
            system: system.to_string(),
            user: user.to_string(),
            max_tokens,
            temperature,
        });
        match &self.reply {
            Ok(reply) => Ok(reply.clone()),
            Err(e) => bail!("{e}"),
        }
    }
}
