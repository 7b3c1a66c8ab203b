// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub scan: ScanOptions,
    pub cache: CacheOptions,
    pub retry: RetryOptions,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            scan: ScanOptions::default(),
            cache: CacheOptions::default(),
            retry: RetryOptions::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanOptions {
    /// Player whose might is ranked in every kingdom.
    pub player: String,
    /// Kingdom numbers, in visit order.
    pub kingdoms: Vec<u32>,
    /// Guilds are only harvested where the quota is at or below this.
    pub threshold: u32,
    /// Guild language to keep (exact match).
    pub language: String,
    /// Optional JSON file with quota bands replacing the built-in table.
    pub quota_table: Option<PathBuf>,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            player: s!(),
            kingdoms: Vec::new(),
            threshold: DEFAULT_THRESHOLD,
            language: s!(DEFAULT_LANGUAGE),
            quota_table: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheOptions {
    /// Store root; the cache lives in `<root>/cache`.
    pub root: PathBuf,
    pub ttl: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from(STORE_DIR),
            ttl: CACHE_TTL,
        }
    }
}

impl CacheOptions {
    pub fn ledger_path(&self) -> PathBuf {
        self.root.join(LEDGER_FILE)
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join(REPORT_FILE)
    }

    pub fn kingdoms_path(&self) -> PathBuf {
        self.root.join(KINGDOMS_FILE)
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryOptions {
    /// Retries after the first failed attempt.
    pub retries: u32,
    /// Fixed pause between attempts.
    pub delay: Duration,
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            retries: RETRIES,
            delay: RETRY_DELAY,
        }
    }
}
