use thiserror::Error;

pub type Result<T> = std::result::Result<T, ApifyError>;

/// Everything that can go wrong between submitting an actor run and reading
/// its dataset.
#[derive(Debug, Error)]
pub enum ApifyError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The run reached a terminal status other than `SUCCEEDED`.
    #[error("Actor run {run_id} ended with status {status}")]
    RunFailed { run_id: String, status: String },
}

impl From<reqwest::Error> for ApifyError {
    fn from(err: reqwest::Error) -> Self {
        ApifyError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApifyError {
    fn from(err: serde_json::Error) -> Self {
        ApifyError::Parse(err.to_string())
    }
}
