// src/specs/mod.rs
//! # Page specs
//!
//! One module per page of lordsmobilemaps.com. Each spec knows the page's URL
//! and *where the data lives in its HTML*, and turns a parsed `Document` into
//! records from `model`.
//!
//! ## What lives here
//! - URL builders relative to a base (`https://lordsmobilemaps.com/en/` in
//!   production, anything in tests).
//! - Selector choice and text extraction on top of `core::html`.
//!
//! ## What does **not** live here
//! - Fetching, retries and caching. `scan` decides when a page is needed and
//!   whether a cached record will do.
//! - Ranking, quotas and filtering.
//!
//! ## Conventions
//! - A page without its anchor element (`div.playerdesc`, the ranking table,
//!   `div.allidesc`, ...) is a `ContentParse` error. The site answers unknown
//!   names with a normal page that lacks it.
//! - Rows that do not have the expected cells are skipped with a debug line,
//!   not treated as errors; ranking tables carry header rows.
//!
//! Specs are tested offline against small fixture pages.

pub mod guilds;
pub mod kingdoms;
pub mod players;

use crate::core::Element;

/// `base` + `path`, with exactly one slash between them.
pub fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// The `div` cells of a ranking row, in order.
pub(crate) fn cells<'a>(row: &Element<'a>) -> Vec<Element<'a>> {
    row.children_named("div")
}

/// Visible text of cell `i`, if there is such a cell.
pub(crate) fn cell_text(cells: &[Element<'_>], i: usize) -> Option<String> {
    cells.get(i).map(|c| c.text().replace('\n', " ")).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::join;

    #[test]
    fn join_single_slash() {
        assert_eq!(join("https://x/en/", "/kingdom"), "https://x/en/kingdom");
        assert_eq!(join("https://x/en", "player/Bob"), "https://x/en/player/Bob");
    }
}
