//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl run through its phases:
//! - Clearing and recreating the output directory
//! - Fetching the root page (fatal on failure)
//! - Draining the frontier with up to `workers` fetches in flight
//! - Extracting, converting and writing one file per page
//! - Aggregating the page files into the combined corpus
//!
//! The visited set lives in the coordinator value of one run. Fetches run
//! concurrently as futures; everything else happens on the coordinator.

use crate::config::{validate_root_url, Config, UserAgentConfig};
use crate::crawler::extractor::Page;
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult};
use crate::crawler::frontier::Frontier;
use crate::output::{aggregate, combined_context_path, PageFile};
use crate::state::{PageOutcome, RunPhase};
use crate::url::resolve_link;
use crate::HarvestError;
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use url::Url;

/// What to crawl and where to write it
#[derive(Debug, Clone)]
pub struct CrawlTarget {
    root_url: Url,
    output_dir: PathBuf,
}

impl CrawlTarget {
    /// Validates and builds a crawl target
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlTarget)` - The root is an absolute HTTP(S) URL
    /// * `Err(HarvestError::InvalidTarget)` - The root URL is not usable
    pub fn new(root_url: &str, output_dir: impl Into<PathBuf>) -> Result<Self, HarvestError> {
        validate_root_url(root_url).map_err(|e| HarvestError::InvalidTarget(e.to_string()))?;
        let output_dir = output_dir.into();

        if output_dir.as_os_str().is_empty() {
            return Err(HarvestError::InvalidTarget(
                "output directory cannot be empty".to_string(),
            ));
        }

        Ok(Self {
            root_url: Url::parse(root_url)?,
            output_dir,
        })
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}

/// Tunables of a crawl run
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Maximum number of fetches in flight (1 = strictly sequential)
    pub workers: usize,
    pub user_agent: UserAgentConfig,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            workers: 1,
            user_agent: UserAgentConfig::default(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            workers: config.crawler.workers as usize,
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_secs(config.crawler.request_timeout_secs),
            connect_timeout: Duration::from_secs(config.crawler.connect_timeout_secs),
        }
    }
}

/// Summary of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub root_url: String,
    /// Path of `combined_context.txt`
    pub corpus_path: PathBuf,
    /// Size of the combined corpus (bytes)
    pub corpus_bytes: usize,
    /// Count of pages per outcome
    pub outcomes: HashMap<PageOutcome, u64>,
    /// Links queued for traversal
    pub links_followed: u64,
    /// Links dropped by the filter, canonicalizer or containment check
    pub links_rejected: u64,
    pub elapsed: Duration,
}

impl CrawlReport {
    /// Pages for which a file was written
    pub fn pages_written(&self) -> u64 {
        self.count_where(PageOutcome::is_success)
    }

    /// Pages that failed and were skipped
    pub fn pages_failed(&self) -> u64 {
        self.count_where(PageOutcome::is_error)
    }

    fn count_where(&self, predicate: fn(&PageOutcome) -> bool) -> u64 {
        self.outcomes
            .iter()
            .filter(|(outcome, _)| predicate(outcome))
            .map(|(_, count)| count)
            .sum()
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    target: CrawlTarget,
    client: Client,
    workers: usize,
    phase: RunPhase,
    frontier: Frontier,
    /// File name -> URL of the page that last wrote it
    written: HashMap<String, String>,
    outcomes: HashMap<PageOutcome, u64>,
    links_followed: u64,
    links_rejected: u64,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `target` - The validated crawl target
    /// * `settings` - Concurrency, user agent and timeouts
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - The HTTP client could not be built
    pub fn new(target: CrawlTarget, settings: CrawlSettings) -> Result<Self, HarvestError> {
        let client = build_http_client(
            &settings.user_agent,
            settings.request_timeout,
            settings.connect_timeout,
        )?;

        Ok(Self {
            target,
            client,
            workers: settings.workers.max(1),
            phase: RunPhase::Init,
            frontier: Frontier::new(),
            written: HashMap::new(),
            outcomes: HashMap::new(),
            links_followed: 0,
            links_rejected: 0,
        })
    }

    /// Current phase of the run
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Runs the crawl to completion
    ///
    /// 1. Clears and recreates the output directory
    /// 2. Fetches the root page; failure aborts the run
    /// 3. Drains the frontier, writing one file per page
    /// 4. Aggregates page files into the combined corpus
    pub async fn run(mut self) -> Result<CrawlReport, HarvestError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} into {}",
            self.target.root_url,
            self.target.output_dir.display()
        );

        self.phase.advance(RunPhase::Clearing)?;
        prepare_output_dir(&self.target.output_dir)?;

        self.phase.advance(RunPhase::Crawling)?;
        self.crawl().await?;

        self.phase.advance(RunPhase::Aggregating)?;
        let combined = aggregate(&self.target.output_dir)?;

        self.phase.advance(RunPhase::Done)?;

        let report = CrawlReport {
            root_url: self.target.root_url.to_string(),
            corpus_path: combined_context_path(&self.target.output_dir),
            corpus_bytes: combined.len(),
            outcomes: self.outcomes,
            links_followed: self.links_followed,
            links_rejected: self.links_rejected,
            elapsed: start_time.elapsed(),
        };

        tracing::info!(
            "Crawl completed: {} pages written, {} failed in {:?}",
            report.pages_written(),
            report.pages_failed(),
            report.elapsed
        );

        Ok(report)
    }

    /// Fetches the root page, then drains the frontier
    async fn crawl(&mut self) -> Result<(), HarvestError> {
        let root = self.target.root_url.clone();
        self.frontier.mark_visited(&root);

        match fetch_url(&self.client, root.as_str()).await {
            FetchResult::Success {
                final_url, body, ..
            } => self.process_page(root, &final_url, body),
            failed => {
                let reason = failed.failure_reason().unwrap_or_default();
                tracing::error!("Root page {} could not be fetched: {}", root, reason);
                return Err(HarvestError::RootFetch {
                    url: root.to_string(),
                    reason,
                });
            }
        }

        let start_time = Instant::now();
        let mut pages_crawled: u64 = 1;
        let mut in_flight = FuturesUnordered::new();

        loop {
            while in_flight.len() < self.workers {
                let Some(url) = self.frontier.next_unvisited() else {
                    break;
                };
                tracing::debug!("Fetching {}", url);

                let client = self.client.clone();
                in_flight.push(async move {
                    let result = fetch_url(&client, url.as_str()).await;
                    (url, result)
                });
            }

            let Some((url, result)) = in_flight.next().await else {
                tracing::info!("Frontier is empty, crawl complete");
                break;
            };

            match result {
                FetchResult::Success {
                    final_url, body, ..
                } => self.process_page(url, &final_url, body),
                failed => {
                    tracing::warn!(
                        "Skipping {}: {}",
                        url,
                        failed.failure_reason().unwrap_or_default()
                    );
                    if let Some(outcome) = failed.failure_outcome() {
                        self.record(outcome);
                    }
                }
            }

            pages_crawled += 1;

            // Progress reporting every 10 pages
            if pages_crawled % 10 == 0 {
                let rate = pages_crawled as f64 / start_time.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages crawled, {} in frontier, {:.2} pages/sec",
                    pages_crawled,
                    self.frontier.pending(),
                    rate
                );
            }
        }

        Ok(())
    }

    /// Extracts, converts and writes one page, then queues its links
    ///
    /// A write failure is recorded and the page's links are still followed.
    fn process_page(&mut self, url: Url, final_url: &str, body: String) {
        let (page, hrefs) = Page::extract(url, body, Utc::now());

        let file = PageFile::from_page(&page, &self.target.root_url);
        let outcome = match file.write_to(&self.target.output_dir) {
            Ok(path) => {
                tracing::debug!("Wrote {} -> {}", page.url, path.display());
                match self.written.insert(file.filename.clone(), page.url.to_string()) {
                    Some(previous) if previous != page.url.as_str() => {
                        tracing::warn!(
                            "{} overwrote {} (both map to {})",
                            page.url,
                            previous,
                            file.filename
                        );
                        PageOutcome::Overwrote
                    }
                    _ => PageOutcome::Written,
                }
            }
            Err(e) => {
                tracing::warn!("Failed to write page file for {}: {}", page.url, e);
                PageOutcome::WriteFailed
            }
        };
        self.record(outcome);

        // Relative links resolve against the post-redirect location
        let base = Url::parse(final_url).unwrap_or_else(|_| page.url.clone());
        let links = self.resolve_links(&hrefs, &base);
        self.frontier.push_children(links);
    }

    /// Resolves the hrefs of one page into URLs to crawl
    fn resolve_links(&mut self, hrefs: &[String], base: &Url) -> Vec<Url> {
        let mut links = Vec::with_capacity(hrefs.len());

        for href in hrefs {
            match resolve_link(href, base, &self.target.root_url) {
                Ok(url) => links.push(url),
                Err(e) => {
                    tracing::debug!("Not following {}: {}", href, e);
                    self.links_rejected += 1;
                }
            }
        }

        self.links_followed += links.len() as u64;
        links
    }

    fn record(&mut self, outcome: PageOutcome) {
        *self.outcomes.entry(outcome).or_insert(0) += 1;
    }
}

/// Removes any previous output directory and recreates it empty
fn prepare_output_dir(dir: &Path) -> Result<(), HarvestError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => tracing::info!("Output directory cleaned: {}", dir.display()),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(HarvestError::OutputDir {
                path: dir.to_path_buf(),
                source,
            })
        }
    }

    fs::create_dir_all(dir).map_err(|source| HarvestError::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Crawls a site and writes its combined corpus
///
/// # Arguments
///
/// * `target` - Root URL and output directory
/// * `settings` - Concurrency, user agent and timeouts
///
/// # Returns
///
/// * `Ok(CrawlReport)` - `report.corpus_path` points at `combined_context.txt`
/// * `Err(HarvestError)` - The output directory could not be prepared or the
///   root page could not be fetched
///
/// # Example
///
/// ```no_run
/// use doc_harvest::crawler::{crawl_site, CrawlSettings, CrawlTarget};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let target = CrawlTarget::new("https://docs.example.com/guide", "./extracted_context")?;
/// let report = crawl_site(target, CrawlSettings::default()).await?;
/// println!("Corpus written to {}", report.corpus_path.display());
/// # Ok(())
/// # }
/// ```
pub async fn crawl_site(
    target: CrawlTarget,
    settings: CrawlSettings,
) -> Result<CrawlReport, HarvestError> {
    Coordinator::new(target, settings)?.run().await
}

/// Runs a crawl described by a configuration file
pub async fn run_crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    let target = CrawlTarget::new(&config.crawler.root_url, &config.output.directory)?;
    crawl_site(target, CrawlSettings::from(config)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_rejects_relative_root() {
        let result = CrawlTarget::new("docs/guide", "./out");
        assert!(matches!(result, Err(HarvestError::InvalidTarget(_))));
    }

    #[test]
    fn test_target_rejects_empty_output_dir() {
        let result = CrawlTarget::new("https://docs.example.com", "");
        assert!(matches!(result, Err(HarvestError::InvalidTarget(_))));
    }

    #[test]
    fn test_target_parses_root() {
        let target = CrawlTarget::new("https://docs.example.com", "./out").unwrap();
        assert_eq!(target.root_url().as_str(), "https://docs.example.com/");
        assert_eq!(target.output_dir(), Path::new("./out"));
    }

    #[test]
    fn test_prepare_output_dir_clears_previous_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir_all(out.join("nested")).unwrap();
        fs::write(out.join("stray.md"), "old").unwrap();

        prepare_output_dir(&out).unwrap();

        assert!(out.is_dir());
        assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_output_dir_creates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a").join("b");
        prepare_output_dir(&out).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn test_prepare_output_dir_fails_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let result = prepare_output_dir(&file.join("sub"));
        assert!(matches!(result, Err(HarvestError::OutputDir { .. })));
    }

    #[test]
    fn test_report_counts() {
        let mut outcomes = HashMap::new();
        outcomes.insert(PageOutcome::Written, 3);
        outcomes.insert(PageOutcome::Overwrote, 1);
        outcomes.insert(PageOutcome::HttpError, 2);

        let report = CrawlReport {
            root_url: "https://docs.example.com/".to_string(),
            corpus_path: PathBuf::from("out/combined_context.txt"),
            corpus_bytes: 0,
            outcomes,
            links_followed: 0,
            links_rejected: 0,
            elapsed: Duration::ZERO,
        };
        assert_eq!(report.pages_written(), 4);
        assert_eq!(report.pages_failed(), 2);
    }

    #[test]
    fn test_coordinator_starts_in_init() {
        let target = CrawlTarget::new("https://docs.example.com", "./out").unwrap();
        let coordinator = Coordinator::new(target, CrawlSettings::default()).unwrap();
        assert_eq!(coordinator.phase(), RunPhase::Init);
    }
}
