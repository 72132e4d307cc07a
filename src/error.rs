use std::path::PathBuf;

use thiserror::Error;

use crate::node::Answer;

#[derive(Error, Debug)]
pub enum GuessError {
    #[error("Oracle request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Oracle returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Oracle returned an empty response for {url}")]
    EmptyResponse { url: String },

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Oracle reported an error: {0}")]
    Oracle(String),

    #[error("Node has neither a question nor a feature and threshold")]
    MissingPrompt,

    #[error("Node has no branch for a \"{0}\" answer")]
    MissingBranch(Answer),

    #[error("Invalid oracle URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Tree exploration stopped after reaching the {what} limit of {limit}")]
    ExploreLimit { what: &'static str, limit: usize },
}

impl GuessError {
    /// Transport failures and transient HTTP statuses may succeed on a later attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            GuessError::Transport(err) => err.is_connect() || err.is_timeout() || err.is_request(),
            GuessError::Status { status, .. } => {
                matches!(*status, 408 | 429 | 500..=599)
            }
            _ => false,
        }
    }
}

pub type GuessResult<T> = Result<T, GuessError>;
