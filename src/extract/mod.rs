//! Record extraction from forum page markup
//!
//! This module turns the raw markup of a fetched page into one of three
//! shapes:
//! - posts mode: ordered `(post, author)` pairs, one per message block
//! - threads mode: ordered thread slugs from a forum listing
//! - document mode: the parsed document for ad-hoc inspection
//!
//! Any expected element that is missing fails the whole page; there is no
//! per-record recovery.

mod normalize;
mod posts;
mod threads;

pub use normalize::{
    collapse_whitespace, count_likes, parse_count, parse_join_date, parse_post_timestamp,
    parse_prefixed_id, split_caption,
};

use crate::crawler::{EntityKind, PageResult};
use crate::records::PostWithAuthor;
use crate::storage::ForumStore;
use crate::{Result, SpacerError};
use scraper::{ElementRef, Html, Selector};

/// Which record shape to extract from a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    Posts,
    Threads,
    Document,
}

impl ExtractMode {
    /// The natural mode for pages of the given kind
    pub fn for_kind(kind: EntityKind) -> Self {
        match kind {
            EntityKind::PostThread => Self::Posts,
            EntityKind::ForumThreadList => Self::Threads,
        }
    }
}

/// Output of a single extraction call
#[derive(Debug)]
pub enum Extracted {
    Posts(Vec<PostWithAuthor>),
    Threads(Vec<String>),
    Document(Html),
}

/// CSS selectors for the forum's markup
#[derive(Debug, Clone)]
pub(crate) struct Selectors {
    pub message: Selector,
    pub author: Selector,
    pub user_link: Selector,
    pub roles: Selector,
    pub extras: Selector,
    pub caption: Selector,
    pub body: Selector,
    pub reactions: Selector,
    pub thread_tile: Selector,
    pub thread_link: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        Ok(Self {
            message: selector("article.message")?,
            author: selector(".message-userDetails")?,
            user_link: selector("a.username[data-user-id]")?,
            roles: selector(".userTitle, .userBanner")?,
            extras: selector(".message-userExtras dd")?,
            caption: selector("[data-lb-caption-desc]")?,
            body: selector(".message-body .bbWrapper")?,
            reactions: selector("a.reactionsBar-link")?,
            thread_tile: selector(".structItem--thread")?,
            thread_link: selector(".structItem-title a[href*=\"/threads/\"]")?,
        })
    }
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| SpacerError::Selector(format!("{}: {}", css, e)))
}

/// Finds the first element under `scope` matching `selector`, or fails
pub(crate) fn require<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    what: &str,
) -> Result<ElementRef<'a>> {
    scope
        .select(selector)
        .next()
        .ok_or_else(|| SpacerError::MissingElement(what.to_string()))
}

/// Reads an attribute, or fails
pub(crate) fn require_attr<'a>(element: ElementRef<'a>, name: &str) -> Result<&'a str> {
    element
        .value()
        .attr(name)
        .ok_or_else(|| SpacerError::MissingElement(format!("attribute {}", name)))
}

/// Extracts typed records from page markup
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: Selectors,
}

impl Extractor {
    /// Creates an extractor with the forum's selectors compiled
    pub fn new() -> Result<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
        })
    }

    /// Extracts records from a fetched page
    ///
    /// In posts mode, every pair is upserted into `store` (author first) as
    /// soon as it is built, before the next message block is read. Pass
    /// `None` to extract without persisting.
    pub fn extract(
        &self,
        page: &PageResult,
        mode: ExtractMode,
        store: Option<&mut dyn ForumStore>,
    ) -> Result<Extracted> {
        match mode {
            ExtractMode::Posts => self
                .extract_posts(&page.body, &page.title, store)
                .map(Extracted::Posts),
            ExtractMode::Threads => self.extract_threads(&page.body).map(Extracted::Threads),
            ExtractMode::Document => Ok(Extracted::Document(Html::parse_document(&page.body))),
        }
    }

    /// Extracts `(post, author)` pairs from a thread page, in document order
    pub fn extract_posts(
        &self,
        html: &str,
        thread: &str,
        mut store: Option<&mut dyn ForumStore>,
    ) -> Result<Vec<PostWithAuthor>> {
        let document = Html::parse_document(html);
        let mut pairs = Vec::new();

        for block in document.select(&self.selectors.message) {
            let mut user = posts::extract_user(block, &self.selectors)?;
            let mut post = posts::extract_post(block, &self.selectors, &user, thread)?;

            if let Some(store) = store.as_deref_mut() {
                user.last_updated = Some(store.upsert_user(&user)?);
                post.last_updated = Some(store.upsert_post(&post)?);
            }

            pairs.push((post, user));
        }

        Ok(pairs)
    }

    /// Extracts thread slugs from a forum listing page, in document order
    pub fn extract_threads(&self, html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);
        threads::extract_slugs(&document, &self.selectors)
    }
}
