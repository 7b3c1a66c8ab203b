// src/specs/guilds.rs
//! Guild pages.
//!
//! - Listing, `/en/kingdom/<slug>/ranking/alliance/power`: same table shape as
//!   the player ranking, cells `[1] name, [2] tag, [3] might, [4] kills`.
//! - Detail, `/en/alliance/<name>`:
//!   - `div.allidesc`: "This alliance has 42 members." and
//!     "The alliance language is Russian."
//!   - `div.systemf`: free-text description (optional)
//!   - the members table is the `div.toptab` in the section headed
//!     "Alliance members"; cells `[1] name, [4] might, [5] kills`.

use std::sync::LazyLock;

use regex::Regex;

use super::{cell_text, cells, join};
use crate::core::sanitize::parse_count;
use crate::core::{Document, Element};
use crate::error::{Result, ScrapeError};
use crate::model::{GuildRecord, Kingdom, PlayerRecord};

const MEMBERS_HEADING: &str = "Alliance members";

static MEMBERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"This alliance has (\d+) members?").expect("member count pattern"));
static LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"The alliance language is ([^.\n]+)").expect("language pattern"));

pub fn listing_url(base: &str, kingdom: &Kingdom) -> String {
    join(base, &format!("kingdom/{}/ranking/alliance/power", kingdom.slug))
}

pub fn detail_url(base: &str, name: &str) -> String {
    join(base, &format!("alliance/{name}"))
}

/// Listing rows as partial records: language, description and members are
/// filled in from the detail page.
pub fn parse_listing(doc: &Document, kingdom: u32) -> Result<Vec<GuildRecord>> {
    let table = doc
        .select_first("div.detaildedbody div.toptab")
        .ok_or_else(|| ScrapeError::parse(format!("kingdom {kingdom}: alliance ranking table not found")))?;

    let mut out = Vec::new();
    for row in table.select("div.toptabrow") {
        let cells = cells(&row);
        let name = cells.get(1).and_then(|c| c.select_first("a")).map(|a| a.text());
        let might = cell_text(&cells, 3).and_then(|t| parse_count(&t));
        let (Some(name), Some(might)) = (name, might) else {
            tracing::debug!(kingdom, row = %row.text(), "skipping alliance row");
            continue;
        };
        out.push(GuildRecord {
            kingdom,
            name,
            tag: cell_text(&cells, 2).unwrap_or_default(),
            might,
            kills: cell_text(&cells, 4).and_then(|t| parse_count(&t)).unwrap_or(0),
            ..Default::default()
        });
    }
    Ok(out)
}

/// Fill `guild` from its detail page.
pub fn parse_detail(doc: &Document, guild: &mut GuildRecord) -> Result<()> {
    let header = doc
        .select_first("div.allidesc")
        .ok_or_else(|| ScrapeError::parse(format!("alliance {} is not found", guild.name)))?
        .text()
        .replace('\n', " ");

    guild.member_count = match MEMBERS.captures(&header).and_then(|c| c[1].parse().ok()) {
        Some(n) => n,
        None => {
            tracing::debug!(guild = %guild.name, "no member count on the alliance page");
            0
        }
    };
    guild.language = LANGUAGE
        .captures(&header)
        .map(|c| s!(c[1].trim()))
        .unwrap_or_default();
    guild.description = doc
        .select_first("div.systemf")
        .map(|d| d.text())
        .filter(|t| !t.is_empty());

    let table = doc
        .select("div.toptab")
        .into_iter()
        .find(in_members_section)
        .ok_or_else(|| ScrapeError::parse(format!("alliance {}: members table not found", guild.name)))?;

    guild.members.clear();
    for row in table.select("div.toptabrow") {
        let cells = cells(&row);
        let name = cells.get(1).and_then(|c| c.select_first("a")).map(|a| a.text());
        let might = cell_text(&cells, 4).and_then(|t| parse_count(&t));
        let (Some(name), Some(might)) = (name, might) else { continue };
        guild.members.push(PlayerRecord {
            name,
            might,
            kills: cell_text(&cells, 5).and_then(|t| parse_count(&t)).unwrap_or(0),
            guild_tag: guild.tag.clone(),
            guild_name: guild.name.clone(),
            kingdom: guild.kingdom,
        });
    }
    Ok(())
}

/// The table's grandparent section carries a `div` reading "Alliance members".
fn in_members_section(table: &Element<'_>) -> bool {
    table
        .parent()
        .and_then(|p| p.parent())
        .filter(|g| g.name() == "div")
        .is_some_and(|g| g.select("div").iter().any(|d| d.own_text() == MEMBERS_HEADING))
}
