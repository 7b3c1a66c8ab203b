// src/core/net.rs
//
// HTTP GET over reqwest's blocking client. One request, full body, no streaming.

use std::error::Error as _;

use reqwest::blocking::Client;
use reqwest::header;

use crate::config::consts::{ACCEPT, HTTP_TIMEOUT, USER_AGENT};
use crate::error::{Result, ScrapeError};

/// Raw page source. The fetch layer parses and retries on top of this.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<String> {
        (**self).get(url)
    }
}

pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| ScrapeError::Config(format!("HTTP client: {}", describe(&e))))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let resp = self
            .client
            .get(url)
            .header(header::ACCEPT, ACCEPT)
            .send()
            .map_err(|e| network(url, &e))?;

        let status = resp.status();
        let body = resp.text().map_err(|e| network(url, &e))?;

        // Application-level failures are not transport failures: the page is
        // simply not what we asked for.
        if !status.is_success() {
            return Err(ScrapeError::parse(format!("HTTP {} from {}", status, url)));
        }
        Ok(body)
    }
}

fn network(url: &str, e: &reqwest::Error) -> ScrapeError {
    ScrapeError::Network { url: s!(url), reason: describe(e) }
}

/// reqwest's Display hides the interesting part (DNS, TLS, refused…) in `source()`.
fn describe(e: &reqwest::Error) -> String {
    let mut msg = e.to_string();
    let mut src = e.source();
    while let Some(inner) = src {
        msg.push_str(": ");
        msg.push_str(&inner.to_string());
        src = inner.source();
    }
    msg
}
