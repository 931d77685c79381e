use std::sync::Arc;

use tracing::{info, warn};

use crate::outcome::{DegradeReason, Outcome};
use crate::traits::TextGenerator;

/// Sent whenever there is nothing real to say.
pub const FALLBACK_REPLY: &str = "Nice reel! 😄";

const SYSTEM_PROMPT: &str = "You are a friendly person replying to Instagram reels from friends. \
Keep responses casual, funny, and brief.";

const MAX_REPLY_TOKENS: u32 = 100;
const REPLY_TEMPERATURE: f32 = 0.8;

/// Turns a reel's top comments into a one-line reply.
pub struct ReplyGenerator {
    generator: Arc<dyn TextGenerator>,
}

impl ReplyGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Generate a reply from `comments`.
    ///
    /// With no comments the fallback is returned without calling the model.
    /// A model error or a blank completion also yields the fallback.
    pub async fn generate(&self, comments: &[String]) -> Outcome<String> {
        if comments.is_empty() {
            return Outcome::degraded(FALLBACK_REPLY.to_string(), DegradeReason::NoComments);
        }

        let prompt = build_prompt(comments);
        let raw = match self
            .generator
            .complete(SYSTEM_PROMPT, &prompt, MAX_REPLY_TOKENS, REPLY_TEMPERATURE)
            .await
        {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Error generating reply");
                return Outcome::degraded(
                    FALLBACK_REPLY.to_string(),
                    DegradeReason::GenerationFailed(e.to_string()),
                );
            }
        };

        let reply = strip_wrapping_quotes(raw.trim()).trim();
        if reply.is_empty() {
            warn!("Model returned an empty reply");
            return Outcome::degraded(FALLBACK_REPLY.to_string(), DegradeReason::EmptyCompletion);
        }

        info!(reply, "Generated reply");
        Outcome::Fresh(reply.to_string())
    }
}

/// User prompt embedding the comments verbatim.
pub fn build_prompt(comments: &[String]) -> String {
    let quoted = comments
        .iter()
        .map(|c| format!("{c:?}"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Based on these top comments from an Instagram reel: [{quoted}]\n\n\
         Generate a single funny, casual reply (1-2 sentences max) that acknowledges the reel.\n\
         Don't use quotation marks. Keep it natural and friendly."
    )
}

/// Remove one pair of surrounding double quotes, if present.
pub fn strip_wrapping_quotes(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}
