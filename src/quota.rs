// src/quota.rs
//
// Rank → migration scrolls.
//
// The table is an ordered list of (interval, quota) pairs over 1-based ranks.
// Lookup returns the first interval that contains the rank. Construction checks
// that the intervals split [1, ∞) exactly, so with a valid table "first match"
// and "only match" coincide.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScrapeError};
use crate::file::read_optional;
use crate::interval::{Interval, check_partition};

/// One row of the built-in table: ranks `low..=high` (or `low..` when `high` is
/// `None`) need `quota` scrolls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Band {
    pub low: u32,
    pub high: Option<u32>,
    pub quota: u32,
}

const fn band(low: u32, high: u32, quota: u32) -> Band {
    Band { low, high: Some(high), quota }
}

pub const CANONICAL_BANDS: &[Band] = &[
    band(1, 1, 90),
    band(2, 2, 65),
    band(3, 3, 50),
    band(4, 4, 35),
    band(5, 5, 30),
    band(6, 6, 28),
    band(7, 7, 26),
    band(8, 8, 24),
    band(9, 9, 22),
    band(10, 10, 20),
    band(11, 13, 18),
    band(14, 16, 16),
    band(17, 18, 14),
    band(19, 20, 13),
    band(21, 22, 12),
    band(23, 24, 11),
    band(25, 26, 10),
    band(27, 28, 9),
    band(29, 30, 8),
    band(31, 32, 7),
    band(33, 35, 6),
    band(36, 38, 5),
    band(39, 41, 4),
    band(42, 45, 3),
    band(46, 50, 2),
    Band { low: 51, high: None, quota: 1 },
];

/// On-disk row for `--quota-table`: `{ "ranks": "[11,13]", "quota": 18 }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRow {
    pub ranks: String,
    pub quota: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuotaTable {
    entries: Vec<(Interval<u32>, u32)>,
}

impl QuotaTable {
    /// Validated table; `Config` when the intervals do not split `[1, ∞)`.
    pub fn new(entries: Vec<(Interval<u32>, u32)>) -> Result<Self> {
        let intervals: Vec<&Interval<u32>> = entries.iter().map(|(iv, _)| iv).collect();
        check_partition(&intervals, 1).map_err(|e| ScrapeError::Config(format!("quota table: {e}")))?;
        Ok(Self { entries })
    }

    pub fn from_bands(bands: &[Band]) -> Result<Self> {
        let mut entries = Vec::with_capacity(bands.len());
        for b in bands {
            let iv = match b.high {
                Some(high) => Interval::closed(b.low, high)
                    .map_err(|e| ScrapeError::Config(format!("quota table: {e}")))?,
                None => Interval::at_least(b.low),
            };
            entries.push((iv, b.quota));
        }
        Self::new(entries)
    }

    /// The published table.
    pub fn canonical() -> Result<Self> {
        Self::from_bands(CANONICAL_BANDS)
    }

    /// JSON array of `QuotaRow`, in lookup order.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_optional(path)?
            .ok_or_else(|| ScrapeError::Config(format!("quota table {} not found", path.display())))?;
        let rows: Vec<QuotaRow> = serde_json::from_str(&text)
            .map_err(|e| ScrapeError::Config(format!("quota table {}: {e}", path.display())))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let iv = row
                .ranks
                .parse::<Interval<u32>>()
                .map_err(|e| ScrapeError::Config(format!("quota table {}: {e}", path.display())))?;
            entries.push((iv, row.quota));
        }
        let table = Self::new(entries)?;
        tracing::info!(path = %path.display(), bands = table.len(), "quota table loaded");
        Ok(table)
    }

    /// First interval containing `rank` wins.
    pub fn quota_for(&self, rank: u32) -> Result<u32> {
        self.entries
            .iter()
            .find(|(iv, _)| iv.contains(&rank))
            .map(|&(_, q)| q)
            .ok_or_else(|| ScrapeError::Domain(format!("rank {rank} is not covered by the quota table")))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Interval<u32>, u32)> {
        self.entries.iter().map(|(iv, q)| (iv, *q))
    }
}

impl fmt::Display for QuotaTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (iv, q) in self.iter() {
            writeln!(f, "{:<10} {}", iv.to_string(), q)?;
        }
        Ok(())
    }
}
