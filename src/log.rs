// src/log.rs
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::{Result, ScrapeError};
use crate::file::ensure_parent;

const DEFAULT_FILTER: &str = "lm_scrape=info";
const VERBOSE_FILTER: &str = "lm_scrape=debug";

fn fmt_elapsed(ms: u128) -> String {
    let total_ms = ms as u64;
    let h = total_ms / 3_600_000;
    let m = (total_ms % 3_600_000) / 60_000;
    let s = (total_ms % 60_000) / 1_000;
    let ms = total_ms % 1_000;
    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

/// Time since `init`, as `HH:MM:SS.mmm`.
#[derive(Clone, Copy, Debug)]
struct Elapsed(Instant);

impl FormatTime for Elapsed {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", fmt_elapsed(self.0.elapsed().as_millis()))
    }
}

/// Log to stderr and append to `log_file`.
///
/// `RUST_LOG` wins when set; otherwise `lm_scrape=info`, or `lm_scrape=debug`
/// with `verbose`.
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER }));

    ensure_parent(log_file)?;
    let file = OpenOptions::new().create(true).append(true).open(log_file)?;
    let timer = Elapsed(Instant::now());

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(timer)
                .with_target(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_timer(timer)
                .with_ansi(false),
        )
        .try_init()
        .map_err(|e| ScrapeError::Config(format!("logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::fmt_elapsed;

    #[test]
    fn elapsed_format() {
        assert_eq!(fmt_elapsed(0), "00:00:00.000");
        assert_eq!(fmt_elapsed(3_723_004), "01:02:03.004");
    }
}
