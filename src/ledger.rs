// src/ledger.rs
//
// Quota progress file: one `<kingdom>; <quota>` line per visited kingdom,
// sorted by kingdom, rewritten in full on every update.
//
//   12; 90
//   140; 18
//   512; 1

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::file::{read_optional, write_replace};

static LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(\d+);\s*(\d+)").expect("ledger line pattern"));

#[derive(Debug)]
pub struct Ledger {
    path: PathBuf,
    entries: BTreeMap<u32, u32>,
}

impl Ledger {
    /// Missing file ⇒ empty ledger. Lines that do not match are skipped.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match read_optional(&path)? {
            Some(text) => parse(&text),
            None => BTreeMap::new(),
        };
        tracing::debug!(path = %path.display(), kingdoms = entries.len(), "ledger loaded");
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, kingdom: u32) -> Option<u32> {
        self.entries.get(&kingdom).copied()
    }

    pub fn set(&mut self, kingdom: u32, quota: u32) {
        self.entries.insert(kingdom, quota);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(kingdom, quota)` in kingdom order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.entries.iter().map(|(&k, &q)| (k, q))
    }

    pub fn save(&self) -> Result<()> {
        write_replace(&self.path, &self.render())?;
        Ok(())
    }

    /// `set` then `save`.
    pub fn record(&mut self, kingdom: u32, quota: u32) -> Result<()> {
        self.set(kingdom, quota);
        self.save()
    }

    pub fn render(&self) -> String {
        let mut out = s!();
        for (k, q) in self.iter() {
            out.push_str(&format!("{k}; {q}\n"));
        }
        out
    }
}

fn parse(text: &str) -> BTreeMap<u32, u32> {
    let mut out = BTreeMap::new();
    for line in text.lines() {
        let Some(caps) = LINE.captures(line) else { continue };
        // Out-of-range numbers are junk like any other non-matching line.
        if let (Ok(k), Ok(q)) = (caps[1].parse::<u32>(), caps[2].parse::<u32>()) {
            out.insert(k, q);
        }
    }
    out
}
