//! Thread slug extraction from forum listing pages

use crate::extract::{require, require_attr, Selectors};
use crate::{Result, SpacerError};
use scraper::Html;

/// Reads the slug of every thread tile, in document order
///
/// The slug is the second-to-last `/`-separated segment of the tile's link,
/// so `/threads/mars-rover.37226/` yields `mars-rover.37226`. Duplicates are
/// kept.
pub(crate) fn extract_slugs(document: &Html, selectors: &Selectors) -> Result<Vec<String>> {
    document
        .select(&selectors.thread_tile)
        .map(|tile| {
            let link = require(tile, &selectors.thread_link, "thread link")?;
            let href = require_attr(link, "href")?;
            slug_from_href(href)
        })
        .collect()
}

fn slug_from_href(href: &str) -> Result<String> {
    let segments: Vec<&str> = href.split('/').collect();
    segments
        .len()
        .checked_sub(2)
        .map(|i| segments[i])
        .filter(|slug| !slug.is_empty())
        .map(str::to_string)
        .ok_or_else(|| SpacerError::MalformedAttribute {
            name: "href",
            value: href.to_string(),
        })
}
