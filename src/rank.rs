// src/rank.rs

use crate::config::consts::RANK_DISPLAY_CAP;

/// A kingdom's top players plus the scanned player, ordered by might.
///
/// The scanned player goes in first as the sentinel. After a stable sort by
/// might descending, its 1-based position is the rank, so on equal might the
/// sentinel places ahead of every fetched entry.
#[derive(Clone, Debug)]
pub struct RankedList {
    mights: Vec<u64>,
}

// Never empty: the sentinel is always there.
#[allow(clippy::len_without_is_empty)]
impl RankedList {
    pub fn new(sentinel_might: u64) -> Self {
        Self { mights: vec![sentinel_might] }
    }

    pub fn push(&mut self, might: u64) {
        self.mights.push(might);
    }

    /// Entries including the sentinel.
    pub fn len(&self) -> usize {
        self.mights.len()
    }

    pub fn rank(&self) -> u32 {
        let mut order: Vec<(usize, u64)> = self.mights.iter().copied().enumerate().collect();
        order.sort_by(|a, b| b.1.cmp(&a.1));
        let pos = order.iter().position(|&(i, _)| i == 0).unwrap_or(0);
        pos as u32 + 1
    }
}

impl Extend<u64> for RankedList {
    fn extend<I: IntoIterator<Item = u64>>(&mut self, iter: I) {
        self.mights.extend(iter);
    }
}

/// `7`, or `50+` past the end of the published ranking.
pub fn display_rank(rank: u32) -> String {
    if rank > RANK_DISPLAY_CAP { format!("{RANK_DISPLAY_CAP}+") } else { rank.to_string() }
}
