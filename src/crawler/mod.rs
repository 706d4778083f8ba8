//! Crawler module for forum page fetching and pagination
//!
//! This module contains the core crawling logic, including:
//! - HTTP transport with retry logic
//! - Canonical page URLs for threads and forum listings
//! - Lazy pagination with echo termination
//! - Overall crawl coordination

mod coordinator;
mod pages;
mod paginator;
mod transport;

pub use coordinator::{Coordinator, ThreadLister, WalkSummary};
pub use pages::{page_number_of, page_url, EntityKind, PageFetcher, PageResult};
pub use paginator::{Exhaustion, PageStep, PaginationCursor, Paginator};
pub use transport::{build_http_client, RawResponse, RetryPolicy, Transport};
