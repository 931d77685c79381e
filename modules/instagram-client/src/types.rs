use serde::{Deserialize, Deserializer, Serialize};

/// Item type Instagram assigns to a shared reel.
pub const ITEM_TYPE_CLIP: &str = "clip";

// --- Login ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResponse {
    pub logged_in_user: Option<LoggedInUser>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub two_factor_required: Option<bool>,
}

/// The account the client is authenticated as.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggedInUser {
    #[serde(deserialize_with = "id_string")]
    pub pk: String,
    pub username: String,
}

// --- Inbox ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InboxResponse {
    pub inbox: Inbox,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Inbox {
    #[serde(default)]
    pub threads: Vec<DirectThread>,
    #[serde(default)]
    pub has_older: bool,
    pub oldest_cursor: Option<String>,
}

/// A Direct conversation with its most recent items, newest first.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectThread {
    pub thread_id: String,
    #[serde(default)]
    pub thread_title: Option<String>,
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<DirectItem>,
}

/// A single message in a Direct thread.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectItem {
    pub item_id: String,
    #[serde(deserialize_with = "id_string")]
    pub user_id: String,
    pub item_type: String,
    #[serde(default)]
    pub client_context: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub clip: Option<ClipShare>,
}

impl DirectItem {
    /// Short code of the shared reel, when this item is a reel share.
    pub fn clip_code(&self) -> Option<&str> {
        if self.item_type != ITEM_TYPE_CLIP {
            return None;
        }
        self.clip
            .as_ref()
            .and_then(|share| share.clip.as_ref())
            .map(|media| media.code.as_str())
            .filter(|code| !code.is_empty())
    }
}

/// Envelope Instagram wraps around a shared reel. The media is missing or
/// null when the reel was deleted or made private.
#[derive(Debug, Clone, Deserialize)]
pub struct ClipShare {
    #[serde(default)]
    pub clip: Option<ClipMedia>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClipMedia {
    #[serde(default)]
    pub code: String,
}

// --- Sending ---

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct StatusResponse {
    pub status: Option<String>,
    pub message: Option<String>,
}

impl StatusResponse {
    pub fn is_ok(&self) -> bool {
        self.status.as_deref() == Some("ok")
    }
}

/// Login payload signed into `signed_body`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct LoginPayload<'a> {
    pub username: &'a str,
    pub enc_password: String,
    pub device_id: &'a str,
    pub guid: &'a str,
    pub phone_id: &'a str,
    pub login_attempt_count: &'a str,
}

/// Instagram returns numeric ids as JSON numbers in some payloads and as
/// strings in others.
fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Num(u64),
        Str(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Num(n) => n.to_string(),
        Id::Str(s) => s,
    })
}

/// Thread items, dropping any that don't match [`DirectItem`] so one odd
/// message can't hide the rest of the inbox.
fn lenient_items<'de, D>(deserializer: D) -> Result<Vec<DirectItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<DirectItem>(value) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable Direct item");
                None
            }
        })
        .collect())
}
