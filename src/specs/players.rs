// src/specs/players.rs
//! Player pages.
//!
//! - Profile, `/en/player/<name>`: `div.playerdesc` holds a sentence like
//!   "... with a might of 1,234,567 and kills of 8,910."
//! - Kingdom top players, `/en/kingdom/<slug>/ranking/player/power/` (page 1) and
//!   `.../power/<n>` (page n): table `div.detaildedbody div.toptab`, one
//!   `div.toptabrow` per player with cells
//!   `[0] rank, [1] name link, [2] guild tag, [3] guild name, [4] might`.

use std::sync::LazyLock;

use regex::Regex;

use super::{cell_text, cells, join};
use crate::core::Document;
use crate::core::sanitize::parse_count;
use crate::error::{Result, ScrapeError};
use crate::model::{Kingdom, PlayerRecord};

static MIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"might of (\d[^\s]*)").expect("might pattern"));
static KILLS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"kills of (\d[^\s]*)").expect("kills pattern"));

pub fn profile_url(base: &str, name: &str) -> String {
    join(base, &format!("player/{name}"))
}

pub fn parse_profile(doc: &Document, name: &str) -> Result<PlayerRecord> {
    let desc = doc
        .select_first("div.playerdesc")
        .ok_or_else(|| ScrapeError::parse(format!("player {name} is not found")))?
        .text()
        .replace('\n', " ");

    let might = MIGHT
        .captures(&desc)
        .and_then(|c| parse_count(&c[1]))
        .ok_or_else(|| ScrapeError::parse(format!("player {name}: no might in '{desc}'")))?;
    let kills = KILLS.captures(&desc).and_then(|c| parse_count(&c[1])).unwrap_or(0);

    Ok(PlayerRecord { name: s!(name), might, kills, ..Default::default() })
}

/// Page 1 has a trailing slash, later pages a numeric suffix.
pub fn ranking_url(base: &str, kingdom: &Kingdom, page: u32) -> String {
    let path = format!("kingdom/{}/ranking/player/power/", kingdom.slug);
    if page <= 1 { join(base, &path) } else { join(base, &format!("{path}{page}")) }
}

pub fn parse_ranking(doc: &Document, kingdom: u32) -> Result<Vec<PlayerRecord>> {
    let table = doc
        .select_first("div.detaildedbody div.toptab")
        .ok_or_else(|| ScrapeError::parse(format!("kingdom {kingdom}: player ranking table not found")))?;

    let mut out = Vec::new();
    for row in table.select("div.toptabrow") {
        let cells = cells(&row);
        let name = cells.get(1).and_then(|c| c.select_first("a")).map(|a| a.text());
        let might = cell_text(&cells, 4).and_then(|t| parse_count(&t));
        let (Some(name), Some(might)) = (name, might) else {
            tracing::debug!(kingdom, row = %row.text(), "skipping ranking row");
            continue;
        };
        out.push(PlayerRecord {
            name,
            might,
            kills: 0,
            guild_tag: cell_text(&cells, 2).unwrap_or_default(),
            guild_name: cell_text(&cells, 3).unwrap_or_default(),
            kingdom,
        });
    }
    Ok(out)
}
