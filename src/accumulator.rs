// src/accumulator.rs
//
// Matching guilds collected during a scan, merged into the persisted snapshot
// at flush.
//
// Flush:
//   1. dedup this run's matches by tag (first occurrence kept)
//   2. union with the snapshot by tag; a persisted record is never replaced
//   3. rewrite the snapshot (JSON object keyed by tag) and the text report
//
// A snapshot that exists but does not parse fails the flush; it is not overwritten.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::file::{read_optional, write_replace};
use crate::model::GuildRecord;

const SEPARATOR: &str = "----------";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlushSummary {
    /// Guilds from this run that were not in the snapshot yet.
    pub added: usize,
    /// Guilds already in the snapshot.
    pub retained: usize,
    pub total: usize,
    pub snapshot: PathBuf,
    pub report: PathBuf,
}

#[derive(Debug)]
pub struct ResultAccumulator {
    snapshot: PathBuf,
    report: PathBuf,
    pending: Vec<GuildRecord>,
}

impl ResultAccumulator {
    pub fn new(snapshot: impl Into<PathBuf>, report: impl Into<PathBuf>) -> Self {
        Self { snapshot: snapshot.into(), report: report.into(), pending: Vec::new() }
    }

    /// No dedup here; that happens at flush.
    pub fn add(&mut self, record: GuildRecord) {
        self.pending.push(record);
    }

    pub fn pending(&self) -> &[GuildRecord] {
        &self.pending
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot
    }

    pub fn report_path(&self) -> &Path {
        &self.report
    }

    /// Pending records are cleared only once both files are written.
    pub fn flush(&mut self) -> Result<FlushSummary> {
        let mut merged = load_snapshot(&self.snapshot)?;
        let retained = merged.len();

        let mut added = 0;
        {
            let mut seen = HashSet::new();
            for rec in &self.pending {
                if !seen.insert(rec.tag.as_str()) {
                    continue;
                }
                if !merged.contains_key(&rec.tag) {
                    merged.insert(rec.tag.clone(), rec.clone());
                    added += 1;
                }
            }
        }

        write_replace(&self.snapshot, &serde_json::to_string_pretty(&merged)?)?;
        let records: Vec<&GuildRecord> = merged.values().collect();
        write_replace(&self.report, &render_report(&records))?;

        tracing::info!(
            added,
            retained,
            total = merged.len(),
            snapshot = %self.snapshot.display(),
            report = %self.report.display(),
            "results flushed"
        );
        self.pending.clear();

        Ok(FlushSummary {
            added,
            retained,
            total: merged.len(),
            snapshot: self.snapshot.clone(),
            report: self.report.clone(),
        })
    }
}

/// Missing file ⇒ empty set. A present file must parse.
pub fn load_snapshot(path: &Path) -> Result<BTreeMap<String, GuildRecord>> {
    match read_optional(path)? {
        Some(text) if !text.trim().is_empty() => Ok(serde_json::from_str(&text)?),
        _ => Ok(BTreeMap::new()),
    }
}

/// Kingdom ascending, might descending inside a kingdom; a separator line
/// between kingdoms.
pub fn render_report(records: &[&GuildRecord]) -> String {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.kingdom.cmp(&b.kingdom).then(b.might.cmp(&a.might)));

    let mut out = s!();
    let mut current = None;
    for g in sorted {
        if current.is_some_and(|k| k != g.kingdom) {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        current = Some(g.kingdom);
        out.push_str(&format!("#{}; {}\n", g.kingdom, g.summary()));
    }
    out
}
