// src/config/consts.rs
use std::time::Duration;

// Net config
pub const BASE_URL: &str = "https://lordsmobilemaps.com/en/";
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 6.2; Win64; x64; rv:27.0) Gecko/20100101 Firefox/27.0";
pub const ACCEPT: &str = "text/javascript, text/html, application/xml, text/xml, */*";
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(15);

// Retry
pub const RETRIES: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

// Local cache
pub const STORE_DIR: &str = ".store";
pub const CACHE_SUBDIR: &str = "cache";
pub const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const PLAYERS_SUBDIR: &str = "players";
pub const GUILDS_SUBDIR: &str = "guilds";

// Files under the store root
pub const KINGDOMS_FILE: &str = "kingdoms.json";
pub const LEDGER_FILE: &str = "migration.txt";
pub const REPORT_FILE: &str = "List.txt";
pub const SNAPSHOT_KEY: &str = "matches.json";
pub const LOG_FILE: &str = "debug.log";

// Scan
pub const DEFAULT_THRESHOLD: u32 = 1;
pub const DEFAULT_LANGUAGE: &str = "Russian";
pub const TOP_PLAYER_PAGES: u32 = 2;
pub const RANK_DISPLAY_CAP: u32 = 50;
