// tests/retry.rs
use std::cell::Cell;
use std::time::Duration;

use lm_scrape::ScrapeError;
use lm_scrape::config::options::RetryOptions;
use lm_scrape::core::CancelToken;
use lm_scrape::core::clock::RecordingSleeper;
use lm_scrape::core::net::Transport;
use lm_scrape::fetch::{Fetcher, PageFetcher, RetryPolicy, Retrying};

/// Fails with a network error `failures` times, then serves `body`.
struct Flaky {
    failures: u32,
    calls: Cell<u32>,
    body: &'static str,
}

impl Transport for Flaky {
    fn get(&self, url: &str) -> lm_scrape::Result<String> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n < self.failures {
            Err(ScrapeError::Network { url: url.into(), reason: "timed out".into() })
        } else {
            Ok(self.body.into())
        }
    }
}

#[test]
fn surfaces_network_error_after_three_retries() {
    let t = Flaky { failures: u32::MAX, calls: Cell::new(0), body: "" };
    let sleeper = RecordingSleeper::default();
    let f = Retrying::with_sleeper(PageFetcher::new(&t), RetryPolicy::default(), &sleeper);

    let err = f.fetch("https://lordsmobilemaps.com/en/kingdom", &CancelToken::new()).unwrap_err();
    assert!(matches!(err, ScrapeError::Network { .. }));
    assert_eq!(t.calls.get(), 4);
    assert_eq!(sleeper.pauses(), vec![Duration::from_secs(2); 3]);
}

#[test]
fn policy_comes_from_options() {
    let policy = RetryPolicy::from(&RetryOptions { retries: 1, delay: Duration::from_millis(10) });
    let t = Flaky { failures: 1, calls: Cell::new(0), body: "<div class=\"playerdesc\">ok</div>" };
    let sleeper = RecordingSleeper::default();
    let f = Retrying::with_sleeper(PageFetcher::new(&t), policy, &sleeper);

    let doc = f.fetch("https://x/", &CancelToken::new()).unwrap();
    assert!(doc.select_first("div.playerdesc").is_some());
    assert_eq!(sleeper.pauses(), vec![Duration::from_millis(10)]);
}
