use instagram_client::{DirectItem, DirectThread};
use tracing::debug;

use crate::error::ResponderError;
use crate::store::DedupStore;
use crate::traits::Inbox;

/// A reel shared into a Direct thread that has not been answered yet.
#[derive(Debug, Clone)]
pub struct ReelShare {
    pub thread_id: String,
    pub item: DirectItem,
    pub short_code: String,
}

/// List the inbox and pick out reels that still need a reply.
///
/// Every match is recorded in `store` before this returns, and the store is
/// flushed once if anything matched. A match is therefore never offered
/// again, even if replying to it later fails.
pub async fn scan(inbox: &dyn Inbox, store: &mut DedupStore) -> Result<Vec<ReelShare>, ResponderError> {
    let threads = inbox.list_threads().await.map_err(ResponderError::Inbox)?;
    debug!(threads = threads.len(), "Scanning Direct inbox");

    let shares = select_new_shares(threads, inbox.own_user_id(), store);
    if !shares.is_empty() {
        store.flush()?;
    }
    Ok(shares)
}

/// Keep items that were sent by someone else, are reel shares, and are not
/// in `store`. Matches are added to `store` in memory as they are found.
pub fn select_new_shares(
    threads: Vec<DirectThread>,
    own_user_id: &str,
    store: &mut DedupStore,
) -> Vec<ReelShare> {
    let mut shares = Vec::new();

    for thread in threads {
        for item in thread.items {
            if item.user_id == own_user_id || store.contains(&item.item_id) {
                continue;
            }
            let Some(short_code) = item.clip_code().map(str::to_string) else {
                continue;
            };

            store.add(item.item_id.clone());
            shares.push(ReelShare {
                thread_id: thread.thread_id.clone(),
                item,
                short_code,
            });
        }
    }

    shares
}
