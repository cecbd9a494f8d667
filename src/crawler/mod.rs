//! Crawler module for page fetching, extraction and traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching and failure classification
//! - Main content extraction and link collection
//! - The depth-first frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;

pub use coordinator::{crawl_site, run_crawl, Coordinator, CrawlReport, CrawlSettings, CrawlTarget};
pub use extractor::{
    extract_main_content, ContentStrategy, ExtractedContent, Page, CONTENT_CASCADE, UNTITLED,
};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use frontier::{Frontier, VisitedSet};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the root URL and output directory
/// 2. Build the HTTP client
/// 3. Clear the output directory
/// 4. Fetch pages depth-first and write one Markdown file each
/// 5. Aggregate the page files into the combined corpus
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed successfully
/// * `Err(HarvestError)` - Crawl failed
pub async fn crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    run_crawl(&config).await
}
