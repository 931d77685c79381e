pub mod comments;
pub mod config;
pub mod error;
pub mod outcome;
pub mod reply;
pub mod responder;
pub mod scanner;
pub mod store;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use comments::{post_url, CommentFetcher, DEFAULT_COMMENT_LIMIT};
pub use config::Config;
pub use error::ResponderError;
pub use outcome::{DegradeReason, Outcome};
pub use reply::{ReplyGenerator, FALLBACK_REPLY};
pub use responder::{CycleStats, Responder, ResponderSettings};
pub use scanner::{scan, ReelShare};
pub use store::DedupStore;
pub use traits::{ApifyComments, CommentSource, Inbox, TextGenerator};
