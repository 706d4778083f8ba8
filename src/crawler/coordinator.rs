//! Crawl coordinator
//!
//! Owns the pieces one crawl needs: a single transport session (reused for
//! every page it fetches), the extractor, and the record store. Pages are
//! fetched strictly in increasing order and each page is fully extracted and
//! persisted before the next one is requested.

use crate::config::Config;
use crate::crawler::pages::{EntityKind, PageFetcher};
use crate::crawler::paginator::{Exhaustion, PageStep, Paginator};
use crate::extract::{ExtractMode, Extracted, Extractor};
use crate::records::PostWithAuthor;
use crate::storage::ForumStore;
use crate::Result;
use std::collections::HashSet;
use std::sync::Arc;

/// Totals for one walk over a thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkSummary {
    pub pages: usize,
    pub posts: usize,
    /// Distinct authors seen
    pub users: usize,
    /// Last page accepted, if any
    pub last_page: Option<u32>,
    pub stopped: Exhaustion,
}

/// Main crawler coordinator structure
pub struct Coordinator<S: ForumStore> {
    config: Arc<Config>,
    fetcher: PageFetcher,
    extractor: Extractor,
    store: S,
}

impl<S: ForumStore> Coordinator<S> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `store` - Where extracted records are upserted when persisting is on
    pub fn new(config: Config, store: S) -> Result<Self> {
        let fetcher = PageFetcher::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            fetcher,
            extractor: Extractor::new()?,
            store,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Starts a lazy walk sharing this coordinator's transport session
    pub fn paginate(
        &self,
        kind: EntityKind,
        title: &str,
        start: u32,
        n_max: Option<usize>,
    ) -> Paginator {
        Paginator::new(self.fetcher.clone(), kind, title, start, n_max)
    }

    /// Fetches one thread page and extracts its posts
    ///
    /// No echo check is made; a page past the end returns the last page's posts.
    pub async fn get_posts(&mut self, thread: &str, page: u32) -> Result<Vec<PostWithAuthor>> {
        let page = self
            .fetcher
            .fetch(EntityKind::PostThread, thread, page)
            .await?;
        let mode = ExtractMode::for_kind(page.kind);
        let store = persist_target(self.config.storage.persist, &mut self.store);
        match self.extractor.extract(&page, mode, store)? {
            Extracted::Posts(pairs) => Ok(pairs),
            _ => unreachable!("{:?} extraction of a thread page", mode),
        }
    }

    /// Fetches one forum listing page and extracts its thread slugs
    pub async fn get_threads(&self, forum: &str, page: u32) -> Result<Vec<String>> {
        self.lister().get_threads(forum, page).await
    }

    /// Walks a thread from `start`, extracting (and persisting) every page
    pub async fn walk_thread(
        &mut self,
        thread: &str,
        start: u32,
        n_max: Option<usize>,
    ) -> Result<WalkSummary> {
        let mut paginator = self.paginate(EntityKind::PostThread, thread, start, n_max);
        let mut users = HashSet::new();
        let mut pages = 0;
        let mut posts = 0;
        let mut last_page = None;

        let stopped = loop {
            let page = match paginator.step().await? {
                PageStep::Page(page) => page,
                PageStep::Exhausted(reason) => break reason,
            };

            let store = persist_target(self.config.storage.persist, &mut self.store);
            let pairs = self.extractor.extract_posts(&page.body, thread, store)?;
            tracing::info!(
                "Page {} of {}: {} post(s)",
                page.page,
                thread,
                pairs.len()
            );

            posts += pairs.len();
            users.extend(pairs.iter().map(|(_, user)| user.id));
            pages += 1;
            last_page = Some(page.page);
        };

        Ok(WalkSummary {
            pages,
            posts,
            users: users.len(),
            last_page,
            stopped,
        })
    }

    /// Walks a forum listing from `start`, returning thread slugs in
    /// first-seen order without duplicates
    pub async fn walk_forum(
        &self,
        forum: &str,
        start: u32,
        n_max: Option<usize>,
    ) -> Result<Vec<String>> {
        self.lister().walk_forum(forum, start, n_max).await
    }

    fn lister(&self) -> ThreadLister {
        ThreadLister {
            fetcher: self.fetcher.clone(),
            extractor: self.extractor.clone(),
        }
    }
}

/// Forum listing walker
///
/// Listings yield thread slugs only, so no record store is involved.
#[derive(Debug, Clone)]
pub struct ThreadLister {
    fetcher: PageFetcher,
    extractor: Extractor,
}

impl ThreadLister {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            fetcher: PageFetcher::from_config(config)?,
            extractor: Extractor::new()?,
        })
    }

    /// Fetches one forum listing page and extracts its thread slugs
    pub async fn get_threads(&self, forum: &str, page: u32) -> Result<Vec<String>> {
        let page = self
            .fetcher
            .fetch(EntityKind::ForumThreadList, forum, page)
            .await?;
        let mode = ExtractMode::for_kind(page.kind);
        match self.extractor.extract(&page, mode, None)? {
            Extracted::Threads(slugs) => Ok(slugs),
            _ => unreachable!("{:?} extraction of a forum listing", mode),
        }
    }

    /// Walks a forum listing from `start`, returning thread slugs in
    /// first-seen order without duplicates
    pub async fn walk_forum(
        &self,
        forum: &str,
        start: u32,
        n_max: Option<usize>,
    ) -> Result<Vec<String>> {
        let mut paginator = Paginator::new(
            self.fetcher.clone(),
            EntityKind::ForumThreadList,
            forum,
            start,
            n_max,
        );
        let mut seen = HashSet::new();
        let mut slugs = Vec::new();

        while let Some(page) = paginator.next_page().await? {
            for slug in self.extractor.extract_threads(&page.body)? {
                if seen.insert(slug.clone()) {
                    slugs.push(slug);
                }
            }
        }

        Ok(slugs)
    }
}

fn persist_target<S: ForumStore>(persist: bool, store: &mut S) -> Option<&mut dyn ForumStore> {
    if persist {
        Some(store)
    } else {
        None
    }
}
