// src/specs/kingdoms.rs
//! Kingdom index, `/en/kingdom`.
//!
//! The page is a mosaic (`div.mosaicview1`) of tiles
//! `div.col-md-3.kingdom > div > div`; each tile links to `<number>-<slug>`.
//! Only the slug appears in the other kingdom URLs.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use super::join;
use crate::core::{Document, Element};
use crate::error::{Result, ScrapeError};

static ENTRY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)-(\w+)").expect("kingdom entry pattern"));

pub fn url(base: &str) -> String {
    join(base, "kingdom")
}

/// `number → slug`. The first occurrence of a number wins.
pub fn parse(doc: &Document) -> Result<BTreeMap<u32, String>> {
    let mosaic = doc
        .select_first("div.mosaicview1")
        .ok_or_else(|| ScrapeError::parse("kingdom index: mosaic not found"))?;

    let mut out = BTreeMap::new();
    for tile in mosaic.select("div.col-md-3.kingdom > div > div") {
        match entry(&tile) {
            Some((number, slug)) => {
                out.entry(number).or_insert(slug);
            }
            None => tracing::debug!(text = %tile.text(), "kingdom tile without an entry"),
        }
    }
    if out.is_empty() {
        return Err(ScrapeError::parse("kingdom index: no kingdoms listed"));
    }
    Ok(out)
}

/// Links first, then visible text.
fn entry(tile: &Element<'_>) -> Option<(u32, String)> {
    let hrefs = std::iter::once(*tile)
        .chain(tile.select("a"))
        .filter_map(|a| a.attr("href").map(str::to_string));
    hrefs.chain(std::iter::once(tile.text())).find_map(|s| {
        let caps = ENTRY.captures(&s)?;
        let number = caps[1].parse().ok()?;
        Some((number, s!(&caps[2])))
    })
}
