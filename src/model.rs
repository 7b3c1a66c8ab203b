// src/model.rs
//
// Records scraped from the site. Field names on disk are camelCase so cache files
// stay readable next to the site's own wording.

use serde::{Deserialize, Serialize};

use crate::core::humanize::abbreviate;
use crate::store::Cacheable;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerRecord {
    pub name: String,
    pub might: u64,
    pub kills: u64,
    pub guild_tag: String,
    pub guild_name: String,
    /// 0 when the page did not say.
    pub kingdom: u32,
}

impl Cacheable for PlayerRecord {
    const KIND: &'static str = "player";
}

/// A guild as listed in a kingdom's alliance ranking, enriched from its own page.
/// Identity is `tag` (exact, case-sensitive).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuildRecord {
    pub kingdom: u32,
    pub name: String,
    pub tag: String,
    pub might: u64,
    pub kills: u64,
    pub language: String,
    pub description: Option<String>,
    pub member_count: u32,
    pub members: Vec<PlayerRecord>,
}

impl Cacheable for GuildRecord {
    const KIND: &'static str = "guild";
}

impl GuildRecord {
    /// `<name> / <tag>; <might>; <N> member(s)`
    pub fn summary(&self) -> String {
        format!(
            "{} / {}; {}; {}",
            self.name,
            self.tag,
            abbreviate(self.might),
            quantity!(self.member_count, "member")
        )
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kingdom {
    pub number: u32,
    /// Name segment of the kingdom URLs, e.g. `Avalon`.
    pub slug: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_line() {
        let g = GuildRecord {
            name: s!("Iron Wolves"),
            tag: s!("IWF"),
            might: 1_260_000_000,
            member_count: 1,
            ..Default::default()
        };
        assert_eq!(g.summary(), "Iron Wolves / IWF; 1.3 G; 1 member");
    }

    #[test]
    fn tolerant_json() {
        let g: GuildRecord = serde_json::from_str(r#"{"tag":"X","memberCount":12}"#).unwrap();
        assert_eq!(g.tag, "X");
        assert_eq!(g.member_count, 12);
        assert!(g.members.is_empty());
    }
}
