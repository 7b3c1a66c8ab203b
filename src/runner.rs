// src/runner.rs
//
// Wires the production pieces together: HTTP transport, retry policy, cache,
// quota table, ledger and accumulator. Frontends call these.

use crate::accumulator::ResultAccumulator;
use crate::config::consts::{BASE_URL, SNAPSHOT_KEY};
use crate::config::options::AppOptions;
use crate::core::CancelToken;
use crate::core::net::HttpTransport;
use crate::error::Result;
use crate::fetch::{PageFetcher, Retrying, RetryPolicy};
use crate::ledger::Ledger;
use crate::progress::Progress;
use crate::quota::QuotaTable;
use crate::scan::{ScanReport, Scanner};
use crate::store::TtlCache;

/// `--quota-table` when given, else the published table.
pub fn quota_table(opts: &AppOptions) -> Result<QuotaTable> {
    match &opts.scan.quota_table {
        Some(path) => QuotaTable::load(path),
        None => QuotaTable::canonical(),
    }
}

/// Full migration scan against the live site.
pub fn migration(opts: &AppOptions, cancel: &CancelToken, progress: &mut dyn Progress) -> Result<ScanReport> {
    let quota = quota_table(opts)?;
    let cache = TtlCache::open(&opts.cache)?;
    let fetcher = Retrying::new(PageFetcher::new(HttpTransport::new()?), RetryPolicy::from(&opts.retry));

    let mut ledger = Ledger::load(opts.cache.ledger_path())?;
    let mut acc = ResultAccumulator::new(cache.path_for(SNAPSHOT_KEY), opts.cache.report_path());

    let scanner = Scanner::new(&fetcher, &cache, &quota, BASE_URL, cancel.clone());
    scanner.run(&opts.scan, &opts.cache.kingdoms_path(), &mut ledger, &mut acc, progress)
}
