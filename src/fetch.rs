// src/fetch.rs
//
// Page fetching: transport → parsed `Document`, plus the fixed-delay retry wrapper.
//
//   Retrying<PageFetcher<HttpTransport>>
//       └─ retries `Network` errors only; `ContentParse` and `Cancelled` pass through.

use std::time::Duration;

use crate::config::options::RetryOptions;
use crate::core::clock::{Sleeper, ThreadSleeper};
use crate::core::net::Transport;
use crate::core::{CancelToken, Document};
use crate::error::Result;

pub trait Fetcher {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Document>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Document> {
        (**self).fetch(url, cancel)
    }
}

impl<F: Fetcher + ?Sized> Fetcher for Box<F> {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Document> {
        (**self).fetch(url, cancel)
    }
}

/// One GET, whole body, then parse.
pub struct PageFetcher<T> {
    transport: T,
}

impl<T: Transport> PageFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> Fetcher for PageFetcher<T> {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Document> {
        cancel.check()?;
        tracing::debug!(url, "GET");
        let body = self.transport.get(url)?;
        Ok(Document::parse(&body))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first failure; total attempts = retries + 1.
    pub retries: u32,
    /// Fixed pause before each retry.
    pub delay: Duration,
}

impl From<&RetryOptions> for RetryPolicy {
    fn from(o: &RetryOptions) -> Self {
        Self { retries: o.retries, delay: o.delay }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryOptions::default())
    }
}

pub struct Retrying<F, S = ThreadSleeper> {
    inner: F,
    policy: RetryPolicy,
    sleeper: S,
}

impl<F: Fetcher> Retrying<F> {
    pub fn new(inner: F, policy: RetryPolicy) -> Self {
        Self::with_sleeper(inner, policy, ThreadSleeper::default())
    }
}

impl<F: Fetcher, S: Sleeper> Retrying<F, S> {
    pub fn with_sleeper(inner: F, policy: RetryPolicy, sleeper: S) -> Self {
        Self { inner, policy, sleeper }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }
}

impl<F: Fetcher, S: Sleeper> Fetcher for Retrying<F, S> {
    fn fetch(&self, url: &str, cancel: &CancelToken) -> Result<Document> {
        let mut retry = 0u32;
        loop {
            cancel.check()?;
            match self.inner.fetch(url, cancel) {
                Ok(doc) => {
                    if retry > 0 {
                        tracing::info!(url, attempt = retry + 1, "fetch succeeded after retry");
                    }
                    return Ok(doc);
                }
                Err(e) if e.is_transient() && retry < self.policy.retries => {
                    retry += 1;
                    tracing::warn!(
                        url,
                        retry,
                        retries = self.policy.retries,
                        delay_ms = self.policy.delay.as_millis() as u64,
                        error = %e,
                        "fetch failed, retrying"
                    );
                    self.sleeper.sleep(self.policy.delay, cancel)?;
                }
                Err(e) => {
                    if e.is_transient() {
                        tracing::error!(url, attempts = retry + 1, error = %e, "fetch failed after all retries");
                    }
                    return Err(e);
                }
            }
        }
    }
}
