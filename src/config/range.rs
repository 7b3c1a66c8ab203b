// src/config/range.rs
use std::collections::HashSet;

use crate::error::{Result, ScrapeError};

/// Parse a kingdom list such as `100-120,200,300-350`.
///
/// Order is preserved and duplicates are dropped (first occurrence wins), so the
/// scan visits kingdoms exactly in the order they were written.
pub fn parse_kingdoms(s: &str) -> Result<Vec<u32>> {
    let mut out: Vec<u32> = Vec::new();
    let mut seen: HashSet<u32> = HashSet::new();
    for part in s.split(',') {
        let part = part.trim();
        if part.is_empty() { continue; }
        if let Some(dash) = part.find('-') {
            let a = parse_number(&part[..dash])?;
            let b = parse_number(&part[dash + 1..])?;
            if a > b {
                return Err(ScrapeError::Config(format!("Invalid range: {}", part)));
            }
            for v in a..=b {
                if seen.insert(v) { out.push(v); }
            }
        } else {
            let v = parse_number(part)?;
            if seen.insert(v) { out.push(v); }
        }
    }
    if out.is_empty() {
        return Err(ScrapeError::Config(format!("Invalid range: {:?}", s)));
    }
    Ok(out)
}

fn parse_number(s: &str) -> Result<u32> {
    let s = s.trim();
    s.parse::<u32>()
        .map_err(|_| ScrapeError::Config(format!("Failed to parse '{}' as a kingdom number", s)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_kingdom() {
        assert_eq!(parse_kingdoms("500").unwrap(), vec![500]);
    }

    #[test]
    fn mixed_ranges_keep_written_order() {
        let ks = parse_kingdoms("300-302, 200,100-101").unwrap();
        assert_eq!(ks, vec![300, 301, 302, 200, 100, 101]);
    }

    #[test]
    fn duplicates_are_dropped() {
        assert_eq!(parse_kingdoms("5,4-6,5").unwrap(), vec![5, 4, 6]);
    }

    #[test]
    fn wide_range_expands_in_order() {
        let ks = parse_kingdoms("1-200000,5").unwrap();
        assert_eq!(ks.len(), 200_000);
        assert_eq!(ks[0], 1);
        assert_eq!(ks[199_999], 200_000);
    }

    #[test]
    fn inverted_or_junk_is_rejected() {
        assert!(matches!(parse_kingdoms("9-3"), Err(ScrapeError::Config(_))));
        assert!(matches!(parse_kingdoms("abc"), Err(ScrapeError::Config(_))));
        assert!(matches!(parse_kingdoms(" , "), Err(ScrapeError::Config(_))));
    }
}
