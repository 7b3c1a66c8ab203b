// src/scan.rs
//
// The kingdom scan.
//
//   player profile ─┐
//   kingdom index  ─┴─> for each kingdom:
//                          top players (2 pages) → rank → quota
//                          quota ≤ threshold ⇒ alliance listing → guild details
//                                              → language filter → accumulator
//                          → ledger (only once the kingdom succeeded)
//   accumulator.flush()   (always, also after an error or Ctrl-C)
//
// Per-kingdom network/parse/domain failures are logged and the scan moves on.

use std::path::Path;

use crate::accumulator::{FlushSummary, ResultAccumulator};
use crate::config::consts::TOP_PLAYER_PAGES;
use crate::config::options::ScanOptions;
use crate::core::CancelToken;
use crate::core::humanize::abbreviate;
use crate::error::{Result, ScrapeError};
use crate::fetch::Fetcher;
use crate::kingdoms::KingdomIndex;
use crate::ledger::Ledger;
use crate::model::{GuildRecord, Kingdom, PlayerRecord};
use crate::progress::Progress;
use crate::quota::QuotaTable;
use crate::rank::{RankedList, display_rank};
use crate::specs;
use crate::store::TtlCache;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KingdomOutcome {
    pub kingdom: u32,
    pub rank: u32,
    pub quota: u32,
    /// Guilds handed to the accumulator (0 when the quota was above threshold).
    pub matched: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub player: Option<PlayerRecord>,
    pub kingdoms: Vec<KingdomOutcome>,
    /// `(kingdom, error)` for kingdoms that failed.
    pub failed: Vec<(u32, String)>,
    /// Kingdoms missing from the index.
    pub skipped: Vec<u32>,
    pub cancelled: bool,
}

#[derive(Clone, Debug)]
pub struct ScanReport {
    pub scan: ScanSummary,
    pub flush: FlushSummary,
}

/// Everything the scan talks to is handed in; nothing is global.
pub struct Scanner<'a> {
    fetcher: &'a dyn Fetcher,
    cache: &'a TtlCache,
    quota: &'a QuotaTable,
    base: String,
    cancel: CancelToken,
}

impl<'a> Scanner<'a> {
    pub fn new(
        fetcher: &'a dyn Fetcher,
        cache: &'a TtlCache,
        quota: &'a QuotaTable,
        base: impl Into<String>,
        cancel: CancelToken,
    ) -> Self {
        Self { fetcher, cache, quota, base: base.into(), cancel }
    }

    /// Scan, then flush the accumulator no matter how the scan ended.
    /// A scan error wins over a flush error; the latter is still logged.
    pub fn run(
        &self,
        opts: &ScanOptions,
        index_path: &Path,
        ledger: &mut Ledger,
        acc: &mut ResultAccumulator,
        progress: &mut dyn Progress,
    ) -> Result<ScanReport> {
        let scanned = self.scan(opts, index_path, ledger, acc, progress);
        progress.finish();

        let flushed = acc.flush();
        match (scanned, flushed) {
            (Ok(scan), Ok(flush)) => Ok(ScanReport { scan, flush }),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), flushed) => {
                if let Err(fe) = flushed {
                    tracing::error!(error = %fe, "flush failed");
                }
                Err(e)
            }
        }
    }

    fn scan(
        &self,
        opts: &ScanOptions,
        index_path: &Path,
        ledger: &mut Ledger,
        acc: &mut ResultAccumulator,
        progress: &mut dyn Progress,
    ) -> Result<ScanSummary> {
        let mut summary = ScanSummary::default();
        progress.begin(opts.kingdoms.len());

        let prepared = self
            .load_player(&opts.player)
            .and_then(|p| Ok((p, KingdomIndex::load_or_fetch(index_path, self.fetcher, &self.base, &self.cancel)?)));
        let (player, index) = match prepared {
            Ok(v) => v,
            Err(ScrapeError::Cancelled) => {
                tracing::warn!("cancelled before the scan started");
                summary.cancelled = true;
                return Ok(summary);
            }
            Err(e) => return Err(e),
        };
        tracing::info!(
            player = %player.name,
            might = %abbreviate(player.might),
            kingdoms = opts.kingdoms.len(),
            threshold = opts.threshold,
            language = %opts.language,
            "scan started"
        );
        progress.log(&format!("{} has {} might", player.name, abbreviate(player.might)));
        summary.player = Some(player.clone());

        for &number in &opts.kingdoms {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            let Some(kingdom) = index.get(number) else {
                tracing::warn!(kingdom = number, "kingdom is not found");
                progress.log(&format!("#{number}: kingdom is not found"));
                summary.skipped.push(number);
                continue;
            };

            match self.scan_kingdom(&kingdom, &player, opts, ledger, acc) {
                Ok(outcome) => {
                    progress.log(&format!(
                        "#{}: rank {}, scrolls {}",
                        number,
                        display_rank(outcome.rank),
                        outcome.quota
                    ));
                    progress.item_done(number);
                    summary.kingdoms.push(outcome);
                }
                Err(ScrapeError::Cancelled) => {
                    tracing::warn!(kingdom = number, "scan cancelled");
                    summary.cancelled = true;
                    break;
                }
                Err(e) if e.is_recoverable() => {
                    tracing::error!(kingdom = number, error = %e, "kingdom failed");
                    progress.item_failed(number, &e.to_string());
                    summary.failed.push((number, e.to_string()));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            done = summary.kingdoms.len(),
            failed = summary.failed.len(),
            skipped = summary.skipped.len(),
            cancelled = summary.cancelled,
            "scan finished"
        );
        Ok(summary)
    }

    fn scan_kingdom(
        &self,
        kingdom: &Kingdom,
        player: &PlayerRecord,
        opts: &ScanOptions,
        ledger: &mut Ledger,
        acc: &mut ResultAccumulator,
    ) -> Result<KingdomOutcome> {
        let rank = self.rank_in(kingdom, player)?;
        let quota = self.quota.quota_for(rank)?;
        tracing::info!("#{}: Player rank is {}, Scrolls: {}", kingdom.number, display_rank(rank), quota);

        let matched = if quota <= opts.threshold {
            self.harvest(kingdom, &opts.language, acc)?
        } else {
            0
        };

        // Only a completed kingdom goes into the ledger.
        if let Err(e) = ledger.record(kingdom.number, quota) {
            tracing::warn!(path = %ledger.path().display(), error = %e, "ledger not saved");
        }
        Ok(KingdomOutcome { kingdom: kingdom.number, rank, quota, matched })
    }

    /// Cached profile, else the player page (then cached).
    pub fn load_player(&self, name: &str) -> Result<PlayerRecord> {
        if let Some(p) = self.cache.try_load::<PlayerRecord>(name)? {
            tracing::debug!(player = name, "player from cache");
            return Ok(p);
        }
        let doc = self.fetcher.fetch(&specs::players::profile_url(&self.base, name), &self.cancel)?;
        let player = specs::players::parse_profile(&doc, name)?;
        self.cache.store(name, &player)?;
        Ok(player)
    }

    fn rank_in(&self, kingdom: &Kingdom, player: &PlayerRecord) -> Result<u32> {
        let mut list = RankedList::new(player.might);
        for page in 1..=TOP_PLAYER_PAGES {
            let url = specs::players::ranking_url(&self.base, kingdom, page);
            let doc = self.fetcher.fetch(&url, &self.cancel)?;
            list.extend(specs::players::parse_ranking(&doc, kingdom.number)?.into_iter().map(|p| p.might));
        }
        tracing::debug!(kingdom = kingdom.number, ranked = list.len(), "ranking collected");
        Ok(list.rank())
    }

    /// Guilds of `kingdom` speaking `language`, in listing order. A guild whose
    /// page fails is skipped.
    fn harvest(&self, kingdom: &Kingdom, language: &str, acc: &mut ResultAccumulator) -> Result<usize> {
        let doc = self.fetcher.fetch(&specs::guilds::listing_url(&self.base, kingdom), &self.cancel)?;
        let listed = specs::guilds::parse_listing(&doc, kingdom.number)?;

        let mut matched = 0;
        for entry in listed {
            let name = entry.name.clone();
            let guild = match self.load_guild(entry) {
                Ok(g) => g,
                Err(e) if e.is_recoverable() => {
                    tracing::warn!(kingdom = kingdom.number, guild = %name, error = %e, "guild skipped");
                    continue;
                }
                Err(e) => return Err(e),
            };
            if guild.language == language {
                tracing::info!("#{}; {}", kingdom.number, guild.summary());
                acc.add(guild);
                matched += 1;
            }
        }
        Ok(matched)
    }

    /// Cached guild keyed by name, else the listing row completed from its page.
    fn load_guild(&self, listed: GuildRecord) -> Result<GuildRecord> {
        if let Some(cached) = self.cache.try_load::<GuildRecord>(&listed.name)? {
            if !cached.name.is_empty() {
                return Ok(cached);
            }
        }
        let mut guild = listed;
        let doc = self.fetcher.fetch(&specs::guilds::detail_url(&self.base, &guild.name), &self.cancel)?;
        specs::guilds::parse_detail(&doc, &mut guild)?;
        self.cache.store(&guild.name, &guild)?;
        Ok(guild)
    }
}
