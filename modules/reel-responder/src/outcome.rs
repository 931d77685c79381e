//! Results that always carry a usable value.
//!
//! Comment scraping and reply generation never fail the pipeline. When they
//! cannot produce real content they hand back a stand-in value together with
//! the reason, so callers can log it and tests can assert on it.

use thiserror::Error;

/// Why a stand-in value was used instead of fresh content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    #[error("comment scrape failed: {0}")]
    ScrapeFailed(String),

    #[error("no comments to work from")]
    NoComments,

    #[error("reply generation failed: {0}")]
    GenerationFailed(String),

    #[error("model returned an empty reply")]
    EmptyCompletion,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Fresh(T),
    Degraded { value: T, reason: DegradeReason },
}

impl<T> Outcome<T> {
    pub fn degraded(value: T, reason: DegradeReason) -> Self {
        Outcome::Degraded { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Outcome::Fresh(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Outcome::Fresh(value) | Outcome::Degraded { value, .. } => value,
        }
    }

    pub fn reason(&self) -> Option<&DegradeReason> {
        match self {
            Outcome::Fresh(_) => None,
            Outcome::Degraded { reason, .. } => Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Outcome::Degraded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_has_no_reason() {
        let outcome = Outcome::Fresh(vec!["a".to_string()]);
        assert!(!outcome.is_degraded());
        assert!(outcome.reason().is_none());
        assert_eq!(outcome.into_value(), vec!["a".to_string()]);
    }

    #[test]
    fn degraded_keeps_value_and_reason() {
        let outcome = Outcome::degraded(
            Vec::<String>::new(),
            DegradeReason::ScrapeFailed("timeout".into()),
        );
        assert!(outcome.is_degraded());
        assert!(outcome.value().is_empty());
        assert_eq!(
            outcome.reason().map(ToString::to_string).as_deref(),
            Some("comment scrape failed: timeout")
        );
    }
}
