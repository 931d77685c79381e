use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::comments::DEFAULT_COMMENT_LIMIT;
use crate::error::ResponderError;
use crate::responder::{ResponderSettings, DEFAULT_POLL_INTERVAL};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Instagram
    pub insta_username: String,
    pub insta_password: String,
    pub inbox_thread_limit: usize,

    // AI
    pub openai_api_key: String,
    pub openai_model: String,

    // Scraping
    pub apify_key: String,
    pub apify_comment_actor: String,
    pub apify_results_limit: u32,

    // Responder
    pub poll_interval: Duration,
    pub store_file: PathBuf,
    pub comment_limit: usize,
}

impl Config {
    /// Load configuration from the process environment, reading `.env` first
    /// if present.
    pub fn from_env() -> Result<Self, ResponderError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ResponderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ResponderError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| {
                    ResponderError::Config(format!("{key} environment variable is required"))
                })
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Self {
            insta_username: required("INSTA_USERNAME")?,
            insta_password: required("INSTA_PASSWORD")?,
            inbox_thread_limit: parse_var(
                "INBOX_THREAD_LIMIT",
                &optional("INBOX_THREAD_LIMIT", "20"),
            )?,
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: optional("OPENAI_MODEL", "gpt-4o-mini"),
            apify_key: required("APIFY_KEY")?,
            apify_comment_actor: optional(
                "APIFY_COMMENT_ACTOR",
                apify_client::INSTAGRAM_COMMENT_SCRAPER,
            ),
            apify_results_limit: parse_var(
                "APIFY_RESULTS_LIMIT",
                &optional("APIFY_RESULTS_LIMIT", "10"),
            )?,
            poll_interval: Duration::from_secs(parse_var(
                "POLL_INTERVAL_SECS",
                &optional(
                    "POLL_INTERVAL_SECS",
                    &DEFAULT_POLL_INTERVAL.as_secs().to_string(),
                ),
            )?),
            store_file: PathBuf::from(optional("STORE_FILE", "store.json")),
            comment_limit: parse_var(
                "COMMENT_LIMIT",
                &optional("COMMENT_LIMIT", &DEFAULT_COMMENT_LIMIT.to_string()),
            )?,
        })
    }

    pub fn responder_settings(&self) -> ResponderSettings {
        ResponderSettings {
            poll_interval: self.poll_interval,
            comment_limit: self.comment_limit,
        }
    }

    pub fn log_keys(&self) {
        tracing::info!("Config loaded:");
        tracing::info!("  INSTA_USERNAME: {}", self.insta_username);
        tracing::info!("  OPENAI_API_KEY: {}", preview(&self.openai_api_key));
        tracing::info!("  OPENAI_MODEL: {}", self.openai_model);
        tracing::info!("  APIFY_KEY: {}", preview(&self.apify_key));
        tracing::info!("  APIFY_COMMENT_ACTOR: {}", self.apify_comment_actor);
        tracing::info!("  POLL_INTERVAL_SECS: {}", self.poll_interval.as_secs());
        tracing::info!("  STORE_FILE: {}", self.store_file.display());
    }
}

/// First five characters of a secret plus its length in characters.
fn preview(val: &str) -> String {
    let n = val.chars().take(5).map(char::len_utf8).sum::<usize>();
    format!("{}...({} chars)", &val[..n], val.chars().count())
}

fn parse_var<T: FromStr>(key: &str, raw: &str) -> Result<T, ResponderError> {
    raw.trim()
        .parse()
        .map_err(|_| ResponderError::Config(format!("{key} must be a number, got {raw:?}")))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("INSTA_USERNAME", "reelbot"),
        ("INSTA_PASSWORD", "hunter2"),
        ("OPENAI_API_KEY", "sk-proj-abcdef"),
        ("APIFY_KEY", "apify_api_123456"),
    ];

    #[test]
    fn defaults_apply_when_only_required_vars_set() {
        let config = Config::from_lookup(lookup(REQUIRED)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.store_file, PathBuf::from("store.json"));
        assert_eq!(config.comment_limit, 3);
        assert_eq!(config.openai_model, "gpt-4o-mini");
        assert_eq!(config.apify_comment_actor, "SbK00X0JYCPblD2wp");
        assert_eq!(config.apify_results_limit, 10);
        assert_eq!(config.inbox_thread_limit, 20);
    }

    #[test]
    fn overrides_are_parsed() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("POLL_INTERVAL_SECS", "30"),
            ("STORE_FILE", "/var/lib/reels/store.json"),
            ("COMMENT_LIMIT", "5"),
        ]);

        let config = Config::from_lookup(lookup(&vars)).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.store_file, PathBuf::from("/var/lib/reels/store.json"));
        assert_eq!(config.responder_settings().comment_limit, 5);
    }

    #[test]
    fn missing_required_var_is_reported_by_name() {
        let vars: Vec<_> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "APIFY_KEY")
            .collect();

        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(err.to_string().contains("APIFY_KEY"));
    }

    #[test]
    fn non_numeric_interval_is_rejected() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("POLL_INTERVAL_SECS", "ten"));

        let err = Config::from_lookup(lookup(&vars)).unwrap_err();
        assert!(matches!(err, ResponderError::Config(msg) if msg.contains("POLL_INTERVAL_SECS")));
    }

    #[test]
    fn key_preview_counts_characters_not_bytes() {
        assert_eq!(preview("sk-proj-abcdef"), "sk-pr...(14 chars)");
        assert_eq!(preview("ключ-секрет"), "ключ-...(11 chars)");
    }
}
