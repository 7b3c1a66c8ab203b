// src/core/cancel.rs
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use crate::error::{Result, ScrapeError};

/// Cooperative cancellation flag shared between the Ctrl-C handler and the scan.
///
/// Cloning shares the flag. Nothing is interrupted forcibly: the fetch layer
/// checks the token before every attempt and while backing off.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Cancelled)` once the flag is set.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() { Err(ScrapeError::Cancelled) } else { Ok(()) }
    }
}
