// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::config::consts::{DEFAULT_LANGUAGE, DEFAULT_THRESHOLD, RETRIES, STORE_DIR};
use crate::config::options::{AppOptions, CacheOptions, RetryOptions, ScanOptions};
use crate::config::range::parse_kingdoms;
use crate::core::CancelToken;
use crate::error::Result;
use crate::ledger::Ledger;
use crate::progress::Progress;
use crate::rank::display_rank;
use crate::{log, runner};

#[derive(Debug, Parser)]
#[command(name = "lm_scrape", version, about = "Migration scroll calculator and guild finder for lordsmobilemaps.com")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Store root (cache, ledger, report, log)
    #[arg(long, global = true, env = "LM_STORE", default_value = STORE_DIR)]
    pub store: PathBuf,

    /// Maximum age of cached players and guilds
    #[arg(long, global = true, env = "LM_CACHE_TTL", default_value = "24h", value_parser = humantime::parse_duration)]
    pub cache_ttl: Duration,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank a player in each kingdom, record the scroll cost, and collect guilds
    /// where the move is cheap enough
    Migration {
        /// Player whose might is ranked
        #[arg(short = 'P', long)]
        player: String,

        /// Kingdoms to visit, e.g. `100-120,200,300-350`
        #[arg(short = 'K', long = "kingdom")]
        kingdoms: String,

        /// Collect guilds only where the scroll cost is at or below this
        #[arg(short = 'S', long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: u32,

        /// Guild language to keep
        #[arg(long, default_value = DEFAULT_LANGUAGE)]
        language: String,

        /// JSON file replacing the built-in quota table
        #[arg(long, env = "LM_QUOTA_TABLE")]
        quota_table: Option<PathBuf>,

        /// Retries after a failed request
        #[arg(long, default_value_t = RETRIES)]
        retries: u32,

        /// Pause between retries
        #[arg(long, default_value = "2s", value_parser = humantime::parse_duration)]
        retry_delay: Duration,
    },

    /// Print the quota table, or the quota for one rank
    Quota {
        #[arg(long, env = "LM_QUOTA_TABLE")]
        quota_table: Option<PathBuf>,

        rank: Option<u32>,
    },

    /// Print the recorded scroll costs
    Ledger,
}

impl Cli {
    pub fn options(&self) -> Result<AppOptions> {
        let cache = CacheOptions { root: self.store.clone(), ttl: self.cache_ttl };
        let mut opts = AppOptions { cache, ..Default::default() };
        match &self.command {
            Command::Migration { player, kingdoms, threshold, language, quota_table, retries, retry_delay } => {
                opts.scan = ScanOptions {
                    player: player.clone(),
                    kingdoms: parse_kingdoms(kingdoms)?,
                    threshold: *threshold,
                    language: language.clone(),
                    quota_table: quota_table.clone(),
                };
                opts.retry = RetryOptions { retries: *retries, delay: *retry_delay };
            }
            Command::Quota { quota_table, .. } => opts.scan.quota_table = quota_table.clone(),
            Command::Ledger => {}
        }
        Ok(opts)
    }
}

/// Prints one line per kingdom to stderr.
struct ConsoleProgress {
    total: usize,
    seen: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, kingdom: u32) {
        self.seen += 1;
        eprintln!("[{}/{}] #{} done", self.seen, self.total, kingdom);
    }

    fn item_failed(&mut self, kingdom: u32, error: &str) {
        self.seen += 1;
        eprintln!("[{}/{}] #{} failed: {}", self.seen, self.total, kingdom, error);
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let opts = cli.options()?;
    log::init(&opts.cache.log_path(), cli.verbose)?;

    match cli.command {
        Command::Migration { .. } => {
            let cancel = CancelToken::new();
            let handler = cancel.clone();
            if let Err(e) = ctrlc::set_handler(move || handler.cancel()) {
                tracing::warn!(error = %e, "Ctrl-C handler not installed");
            }

            let mut progress = ConsoleProgress { total: 0, seen: 0 };
            let report = runner::migration(&opts, &cancel, &mut progress)?;

            for k in &report.scan.kingdoms {
                println!("#{}; rank {}; {} scrolls; {} guilds", k.kingdom, display_rank(k.rank), k.quota, k.matched);
            }
            for (k, e) in &report.scan.failed {
                println!("#{k}; failed: {e}");
            }
            if report.scan.cancelled {
                println!("cancelled");
            }
            println!(
                "{} new, {} total -> {}",
                report.flush.added,
                report.flush.total,
                report.flush.report.display()
            );
        }
        Command::Quota { rank, .. } => {
            let table = runner::quota_table(&opts)?;
            match rank {
                Some(r) => println!("{}", table.quota_for(r)?),
                None => print!("{table}"),
            }
        }
        Command::Ledger => {
            let ledger = Ledger::load(opts.cache.ledger_path())?;
            print!("{}", ledger.render());
        }
    }
    Ok(())
}
