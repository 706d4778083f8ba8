//! Lazy page-by-page walk with echo termination
//!
//! The forum never reports how many pages a thread has. Requesting a page
//! past the end redirects to the last valid page instead, so the walk stops
//! as soon as the resolved URL names a different page than the one asked
//! for. That page is not emitted.

use crate::crawler::pages::{page_number_of, EntityKind, PageFetcher, PageResult};
use crate::Result;
use url::Url;

/// Why a walk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exhaustion {
    /// The item cap was reached
    CapReached,
    /// The request for `requested` resolved to page `actual`
    Echo { requested: u32, actual: u32 },
}

/// Outcome of one pull
#[derive(Debug)]
pub enum PageStep {
    Page(PageResult),
    Exhausted(Exhaustion),
}

/// Iterator state of one walk
#[derive(Debug, Clone)]
pub struct PaginationCursor {
    pub kind: EntityKind,
    pub title: String,
    /// Next page to request
    pub page: u32,
    /// Maximum number of pages to emit
    pub n_max: Option<usize>,
    pub emitted: usize,
    /// Resolved URL of the last emitted page
    pub last_url: Option<Url>,
    /// Set once the walk has ended; later pulls return it again
    pub exhausted: Option<Exhaustion>,
}

/// A finite, pull-based sequence of pages
///
/// Nothing is fetched until [`Paginator::step`] is called, and each call
/// fetches at most one page. A walk cannot be rewound; start a new
/// paginator instead.
pub struct Paginator {
    fetcher: PageFetcher,
    cursor: PaginationCursor,
}

impl Paginator {
    /// Creates a walk over `title` starting at `start` (pages are numbered
    /// from 1; 0 is treated as 1)
    pub fn new(
        fetcher: PageFetcher,
        kind: EntityKind,
        title: impl Into<String>,
        start: u32,
        n_max: Option<usize>,
    ) -> Self {
        Self {
            fetcher,
            cursor: PaginationCursor {
                kind,
                title: title.into(),
                page: start.max(1),
                n_max,
                emitted: 0,
                last_url: None,
                exhausted: None,
            },
        }
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    /// Pulls the next page, or the reason the walk has ended
    ///
    /// Transport errors are returned as-is and leave the cursor where it was.
    pub async fn step(&mut self) -> Result<PageStep> {
        if let Some(reason) = &self.cursor.exhausted {
            return Ok(PageStep::Exhausted(reason.clone()));
        }

        if self
            .cursor
            .n_max
            .is_some_and(|max| self.cursor.emitted >= max)
        {
            return Ok(self.finish(Exhaustion::CapReached));
        }

        let requested = self.cursor.page;
        let page = self
            .fetcher
            .fetch(self.cursor.kind, &self.cursor.title, requested)
            .await?;

        let actual = page_number_of(&page.url);
        let repeated = self.cursor.last_url.as_ref() == Some(&page.url);

        if actual != requested || repeated {
            tracing::debug!(
                "Page {} of {} resolved to {} ({})",
                requested,
                self.cursor.title,
                page.url,
                actual
            );
            return Ok(self.finish(Exhaustion::Echo { requested, actual }));
        }

        tracing::debug!("Accepted page {} of {}", requested, self.cursor.title);
        self.cursor.last_url = Some(page.url.clone());
        self.cursor.page += 1;
        self.cursor.emitted += 1;

        Ok(PageStep::Page(page))
    }

    /// Pulls the next page, `None` once the walk has ended
    pub async fn next_page(&mut self) -> Result<Option<PageResult>> {
        match self.step().await? {
            PageStep::Page(page) => Ok(Some(page)),
            PageStep::Exhausted(_) => Ok(None),
        }
    }

    /// Drains the walk into a vector
    pub async fn collect_pages(mut self) -> Result<Vec<PageResult>> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await? {
            pages.push(page);
        }
        Ok(pages)
    }

    fn finish(&mut self, reason: Exhaustion) -> PageStep {
        tracing::info!(
            "Finished {} after {} page(s): {:?}",
            self.cursor.title,
            self.cursor.emitted,
            reason
        );
        self.cursor.exhausted = Some(reason.clone());
        PageStep::Exhausted(reason)
    }
}
