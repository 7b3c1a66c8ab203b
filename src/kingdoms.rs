// src/kingdoms.rs

use std::collections::BTreeMap;
use std::path::Path;

use crate::core::CancelToken;
use crate::error::Result;
use crate::fetch::Fetcher;
use crate::file::{read_optional, write_replace};
use crate::model::Kingdom;
use crate::specs;

/// Kingdom number → URL slug, as listed on the site's kingdom index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KingdomIndex {
    slugs: BTreeMap<u32, String>,
}

impl KingdomIndex {
    pub fn new(slugs: BTreeMap<u32, String>) -> Self {
        Self { slugs }
    }

    /// Load from the local file, or download and save it when the file is
    /// missing, empty or unreadable.
    pub fn load_or_fetch(path: &Path, fetcher: &dyn Fetcher, base: &str, cancel: &CancelToken) -> Result<Self> {
        match read_optional(path) {
            Ok(Some(text)) if !text.trim().is_empty() => match serde_json::from_str(&text) {
                Ok(slugs) => {
                    let index = Self::new(slugs);
                    tracing::debug!(path = %path.display(), kingdoms = index.len(), "kingdom index loaded");
                    return Ok(index);
                }
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "kingdom index unreadable, downloading again"),
            },
            Ok(_) => {}
            Err(e) => tracing::warn!(path = %path.display(), error = %e, "kingdom index unreadable, downloading again"),
        }

        // fallback to live fetch
        let doc = fetcher.fetch(&specs::kingdoms::url(base), cancel)?;
        let index = Self::new(specs::kingdoms::parse(&doc)?);
        write_replace(path, &serde_json::to_string_pretty(&index.slugs)?)?;
        tracing::info!(path = %path.display(), kingdoms = index.len(), "kingdom index downloaded");
        Ok(index)
    }

    pub fn get(&self, number: u32) -> Option<Kingdom> {
        self.slugs.get(&number).map(|slug| Kingdom { number, slug: slug.clone() })
    }

    pub fn len(&self) -> usize {
        self.slugs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slugs.is_empty()
    }
}
