// src/store.rs
//
// File-backed TTL cache for scraped entities.
//
// Layout: <root>/cache/<kind dir>/<urlsafe name>.json
//
// - Freshness is the file's last-write time against the configured TTL.
// - A stale or unreadable file is a miss; the next successful fetch overwrites it.
// - Kinds are looked up in a registry by tag, not by Rust type, so the set of
//   cacheable kinds is explicit and an unregistered one fails loudly.
// - Single writer. No locking.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::consts::{CACHE_SUBDIR, GUILDS_SUBDIR, PLAYERS_SUBDIR};
use crate::config::options::CacheOptions;
use crate::core::clock::{Clock, SystemClock};
use crate::core::sanitize::urlsafe_name;
use crate::error::{Result, ScrapeError};
use crate::file::{age, ensure_directory, read_optional, write_replace};
use crate::model::{GuildRecord, PlayerRecord};

/// A type that can live in the cache under a registered kind tag.
pub trait Cacheable: Serialize + DeserializeOwned {
    const KIND: &'static str;
}

/// Where and how one kind is stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindSpec {
    pub dir: &'static str,
    pub ext: &'static str,
}

#[derive(Clone, Debug, Default)]
pub struct KindRegistry {
    kinds: HashMap<&'static str, KindSpec>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Players and guilds.
    pub fn standard() -> Self {
        Self::new()
            .register(PlayerRecord::KIND, PLAYERS_SUBDIR)
            .register(GuildRecord::KIND, GUILDS_SUBDIR)
    }

    pub fn register(mut self, kind: &'static str, dir: &'static str) -> Self {
        self.kinds.insert(kind, KindSpec { dir, ext: "json" });
        self
    }

    pub fn lookup(&self, kind: &'static str) -> Result<KindSpec> {
        self.kinds.get(kind).copied().ok_or(ScrapeError::UnknownKind(kind))
    }
}

pub struct TtlCache {
    dir: PathBuf,
    ttl: Duration,
    registry: KindRegistry,
    clock: Box<dyn Clock>,
}

impl TtlCache {
    /// Standard kinds, wall clock.
    pub fn open(opts: &CacheOptions) -> Result<Self> {
        Self::with_clock(&opts.root, opts.ttl, KindRegistry::standard(), Box::new(SystemClock))
    }

    pub fn with_clock(
        root: &Path,
        ttl: Duration,
        registry: KindRegistry,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        let dir = root.join(CACHE_SUBDIR);
        ensure_directory(&dir)?;
        tracing::debug!(dir = %dir.display(), ttl = %humantime::format_duration(ttl), "cache opened");
        Ok(Self { dir, ttl, registry, clock })
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// `<root>/cache/<relative>`, for files that share the cache root but are not
    /// TTL entries (the result snapshot).
    pub fn path_for(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.dir.join(relative)
    }

    /// Deterministic on-disk location of `(T::KIND, name)`.
    pub fn entry_path<T: Cacheable>(&self, name: &str) -> Result<PathBuf> {
        let spec = self.registry.lookup(T::KIND)?;
        Ok(self.dir.join(spec.dir).join(format!("{}.{}", urlsafe_name(name), spec.ext)))
    }

    /// Fresh entry, or `None` when absent, stale or unreadable.
    /// Only an unregistered kind is an error.
    pub fn try_load<T: Cacheable>(&self, name: &str) -> Result<Option<T>> {
        let path = self.entry_path::<T>(name)?;
        if let Some(parent) = path.parent() {
            ensure_directory(parent)?;
        }

        let age = match age(&path, self.clock.now()) {
            Ok(a) => a,
            Err(_) => return Ok(None),
        };
        if age > self.ttl {
            tracing::debug!(kind = T::KIND, name, age = %humantime::format_duration(age), "cache entry stale");
            return Ok(None);
        }

        let text = match read_optional(&path) {
            Ok(Some(t)) => t,
            Ok(None) => return Ok(None),
            Err(e) => {
                tracing::debug!(kind = T::KIND, name, error = %e, "cache entry unreadable");
                return Ok(None);
            }
        };
        match serde_json::from_str::<T>(&text) {
            Ok(v) => Ok(Some(v)),
            Err(e) => {
                tracing::debug!(kind = T::KIND, name, error = %e, "cache entry corrupt, ignoring");
                Ok(None)
            }
        }
    }

    /// Unconditional overwrite.
    pub fn store<T: Cacheable>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.entry_path::<T>(name)?;
        let text = serde_json::to_string_pretty(value)?;
        write_replace(&path, &text)?;
        tracing::debug!(kind = T::KIND, name, path = %path.display(), "cached");
        Ok(())
    }
}
