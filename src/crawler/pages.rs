//! Page URLs and page fetching
//!
//! Thread pages live at `<base>/threads/<slug>[/page-<n>]` and forum listings
//! at `<base>/forums/<slug>[/page-<n>]`; page 1 never carries a suffix.

use crate::config::Config;
use crate::crawler::transport::Transport;
use crate::Result;
use url::Url;

/// What a paginated title refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The posts of a single thread
    PostThread,
    /// The thread listing of a forum
    ForumThreadList,
}

impl EntityKind {
    /// Path segment preceding the title slug
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::PostThread => "threads",
            Self::ForumThreadList => "forums",
        }
    }
}

/// A fetched page, ready for extraction
#[derive(Debug, Clone)]
pub struct PageResult {
    /// Raw markup
    pub body: String,
    /// URL the request resolved to after redirects
    pub url: Url,
    pub kind: EntityKind,
    /// Title slug the page was requested for
    pub title: String,
    /// Page number that was requested
    pub page: u32,
}

/// Builds the canonical URL of a page
///
/// ```
/// use spacer::crawler::{page_url, EntityKind};
///
/// let url = page_url("https://forums.space.com", EntityKind::PostThread, "mars.37226", 2).unwrap();
/// assert_eq!(url.as_str(), "https://forums.space.com/threads/mars.37226/page-2");
/// ```
pub fn page_url(base_url: &str, kind: EntityKind, title: &str, page: u32) -> Result<Url> {
    let mut url = format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        kind.path_segment(),
        title.trim_matches('/')
    );
    if page > 1 {
        url.push_str(&format!("/page-{}", page));
    }
    Ok(Url::parse(&url)?)
}

/// Reads the page number a resolved URL represents
///
/// A trailing `page-<n>` segment gives `n`; anything else is the landing
/// page, i.e. page 1.
pub fn page_number_of(url: &Url) -> u32 {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .and_then(|last| last.strip_prefix("page-"))
        .and_then(|n| n.parse::<u32>().ok())
        .unwrap_or(1)
}

/// Fetches pages of either entity kind through one shared transport
#[derive(Debug, Clone)]
pub struct PageFetcher {
    transport: Transport,
    base_url: String,
}

impl PageFetcher {
    pub fn new(transport: Transport, base_url: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Transport::new(config)?, config.client.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetches one page of a thread or forum listing
    pub async fn fetch(&self, kind: EntityKind, title: &str, page: u32) -> Result<PageResult> {
        let url = page_url(&self.base_url, kind, title, page)?;
        tracing::debug!("Fetching {}", url);

        let response = self.transport.get(&url).await?;

        Ok(PageResult {
            body: response.body,
            url: response.final_url,
            kind,
            title: title.to_string(),
            page,
        })
    }
}
