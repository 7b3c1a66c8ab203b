// src/error.rs
use std::io;

use thiserror::Error;

/// Everything the scraper can fail with.
///
/// Cache misses are not errors (`Ok(None)`), and corrupt cache entries are
/// demoted to misses inside the store, so neither shows up here.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure (connect, timeout, broken body). Retried.
    #[error("network error fetching {url}: {reason}")]
    Network { url: String, reason: String },

    /// The page did not have the shape we expected. Never retried.
    #[error("content parse error: {0}")]
    ContentParse(String),

    /// A computation got an input outside its configured domain.
    #[error("domain error: {0}")]
    Domain(String),

    /// A cache kind that nobody registered. Programming error.
    #[error("unknown cache kind '{0}'")]
    UnknownKind(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("operation cancelled")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScrapeError {
    pub fn parse(msg: impl Into<String>) -> Self {
        ScrapeError::ContentParse(msg.into())
    }

    /// Only transport failures are worth another attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, ScrapeError::Network { .. })
    }

    /// Failures confined to one kingdom or one guild; the scan logs them and
    /// moves on. Everything else ends the scan.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            ScrapeError::Network { .. } | ScrapeError::ContentParse(_) | ScrapeError::Domain(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
