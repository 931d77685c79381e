use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::comments::{CommentFetcher, DEFAULT_COMMENT_LIMIT};
use crate::error::ResponderError;
use crate::reply::ReplyGenerator;
use crate::scanner::{self, ReelShare};
use crate::store::DedupStore;
use crate::traits::{CommentSource, Inbox, TextGenerator};

/// Default pause between inbox polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy)]
pub struct ResponderSettings {
    pub poll_interval: Duration,
    pub comment_limit: usize,
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            comment_limit: DEFAULT_COMMENT_LIMIT,
        }
    }
}

/// Counts from a single poll-and-reply pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleStats {
    pub found: usize,
    pub replied: usize,
    pub send_failures: usize,
    pub scrape_failures: usize,
    pub fallback_replies: usize,
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "found={} replied={} send_failures={} scrape_failures={} fallback_replies={}",
            self.found, self.replied, self.send_failures, self.scrape_failures, self.fallback_replies
        )
    }
}

/// Polls the inbox and answers every newly shared reel.
pub struct Responder {
    inbox: Arc<dyn Inbox>,
    store: DedupStore,
    comments: CommentFetcher,
    replies: ReplyGenerator,
    settings: ResponderSettings,
}

impl Responder {
    pub fn new(
        inbox: Arc<dyn Inbox>,
        store: DedupStore,
        comment_source: Arc<dyn CommentSource>,
        generator: Arc<dyn TextGenerator>,
        settings: ResponderSettings,
    ) -> Self {
        Self {
            inbox,
            store,
            comments: CommentFetcher::new(comment_source),
            replies: ReplyGenerator::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &DedupStore {
        &self.store
    }

    /// Poll until `cancel` fires.
    ///
    /// Cancellation drops an in-flight cycle as well as the sleep between
    /// cycles. Matches are flushed to the store before any reply work starts,
    /// so an abandoned cycle never causes a second reply. Inbox listing and
    /// store errors end the loop and are returned.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<(), ResponderError> {
        info!(
            poll_interval_secs = self.settings.poll_interval.as_secs_f64(),
            handled = self.store.len(),
            "Reel responder started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            let cycle = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Cancelled mid-cycle");
                    break;
                }
                cycle = self.run_cycle() => cycle,
            };
            let stats = match cycle {
                Ok(stats) => stats,
                Err(e) => {
                    error!(error = %e, "Unexpected error, stopping responder");
                    return Err(e);
                }
            };
            if stats.found > 0 {
                info!("Cycle complete. {stats}");
            }

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.settings.poll_interval) => {}
            }
        }

        info!("Reel responder stopped");
        Ok(())
    }

    /// One pass: scan the inbox, then answer each new reel in discovery order.
    pub async fn run_cycle(&mut self) -> Result<CycleStats, ResponderError> {
        let shares = scanner::scan(self.inbox.as_ref(), &mut self.store).await?;

        let mut stats = CycleStats {
            found: shares.len(),
            ..CycleStats::default()
        };
        if shares.is_empty() {
            return Ok(stats);
        }

        info!(count = shares.len(), "Found new reel(s) to respond to");

        for share in &shares {
            self.process_share(share, &mut stats).await;
        }

        Ok(stats)
    }

    async fn process_share(&self, share: &ReelShare, stats: &mut CycleStats) {
        info!(
            short_code = %share.short_code,
            thread_id = %share.thread_id,
            "Processing reel"
        );

        let comments = self
            .comments
            .fetch(&share.short_code, self.settings.comment_limit)
            .await;
        if comments.is_degraded() {
            stats.scrape_failures += 1;
        }
        info!(count = comments.value().len(), "Found comments");

        let reply = self.replies.generate(comments.value()).await;
        if let Some(reason) = reply.reason() {
            stats.fallback_replies += 1;
            info!(%reason, "Using fallback reply");
        }
        let reply = reply.into_value();

        match self.deliver(share, &reply).await {
            Ok(()) => {
                stats.replied += 1;
                info!(thread_id = %share.thread_id, reply = %reply, "Replied to thread");
            }
            Err(e) => {
                stats.send_failures += 1;
                warn!(thread_id = %share.thread_id, error = %e, "Error sending reply to thread");
            }
        }
    }

    async fn deliver(&self, share: &ReelShare, reply: &str) -> anyhow::Result<()> {
        self.inbox
            .send_reply(&share.thread_id, reply, &share.item)
            .await?;
        self.inbox
            .mark_seen(&share.thread_id, &share.item.item_id)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display_lists_every_counter() {
        let stats = CycleStats {
            found: 2,
            replied: 1,
            send_failures: 1,
            scrape_failures: 0,
            fallback_replies: 1,
        };
        assert_eq!(
            stats.to_string(),
            "found=2 replied=1 send_failures=1 scrape_failures=0 fallback_replies=1"
        );
    }

    #[test]
    fn default_settings_poll_every_ten_seconds() {
        let settings = ResponderSettings::default();
        assert_eq!(settings.poll_interval, Duration::from_secs(10));
        assert_eq!(settings.comment_limit, 3);
    }
}
