//! Main-content extraction
//!
//! Documentation sites wrap the actual article in navigation, headers, footers
//! and sidebars. This module strips that chrome from a working copy of the
//! document and then picks the content region with an ordered selector
//! cascade: documentation-platform selectors first, generic content selectors
//! second, and the whole `<body>` as the fallback. The first selector with a
//! match wins; candidates are never scored or merged.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Page furniture removed before and after region selection
const CHROME_SELECTORS: &[&str] = &[
    "script",
    "style",
    "noscript",
    "template",
    "nav",
    "header",
    "footer",
    "[role=\"navigation\"]",
    ".gitbook-root",
    // GitBook sidebar container
    ".css-175oi2r.r-bnwqim.r-13qz1uu",
];

/// Title used when no title source yields text
pub const UNTITLED: &str = "untitled";

/// A single step of the content cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentStrategy {
    /// Selector for a known documentation-hosting product (GitBook, docsify)
    Platform(&'static str),
    /// Generic semantic or content-class selector
    Generic(&'static str),
    /// Whole document body
    Body,
}

impl ContentStrategy {
    /// Returns the selector this strategy tries
    pub fn selector(&self) -> &'static str {
        match self {
            Self::Platform(s) | Self::Generic(s) => s,
            Self::Body => "body",
        }
    }

    /// Finds the first element this strategy matches
    fn locate<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        let selector = Selector::parse(self.selector()).ok()?;
        document.root_element().select(&selector).next()
    }
}

/// Content cascade in priority order
pub const CONTENT_CASCADE: &[ContentStrategy] = &[
    ContentStrategy::Platform("[data-testid=\"page.contentEditor\"]"),
    ContentStrategy::Platform("[data-testid=\"page.content\"]"),
    ContentStrategy::Platform(".reset-3c756112--content-0f7b14fb"),
    ContentStrategy::Platform(".markdown-section"),
    ContentStrategy::Generic("main"),
    ContentStrategy::Generic("article"),
    ContentStrategy::Generic(".content"),
    ContentStrategy::Generic(".main-content"),
    ContentStrategy::Generic(".documentation"),
    ContentStrategy::Generic(".docs-content"),
    ContentStrategy::Generic("#content"),
    ContentStrategy::Generic(".markdown-body"),
    ContentStrategy::Generic(".doc-content"),
    ContentStrategy::Body,
];

/// Title sources in priority order
const TITLE_SELECTORS: &[&str] = &["h1", "title", ".page-title", ".title"];

/// The content region of one page
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    /// Inner HTML of the selected region, chrome removed
    pub html: String,

    /// Resolved page title
    pub title: String,

    /// Raw `href` values of the anchors inside the region, in document order
    pub hrefs: Vec<String>,

    /// The cascade step that selected the region
    pub strategy: ContentStrategy,
}

/// A fetched page moving through extraction
#[derive(Debug, Clone)]
pub struct Page {
    pub url: Url,
    pub raw_html: String,
    pub extracted_html: String,
    pub title: String,
    pub fetched_at: DateTime<Utc>,
}

impl Page {
    /// Runs extraction over fetched HTML
    ///
    /// Returns the page together with the hrefs discovered in its content region.
    pub fn extract(url: Url, raw_html: String, fetched_at: DateTime<Utc>) -> (Self, Vec<String>) {
        let content = extract_main_content(&raw_html);
        tracing::trace!(
            "Extracted {} via {:?} ({} links)",
            url,
            content.strategy,
            content.hrefs.len()
        );

        let page = Self {
            url,
            raw_html,
            extracted_html: content.html,
            title: content.title,
            fetched_at,
        };

        (page, content.hrefs)
    }
}

/// Extracts the main content region from an HTML document
///
/// # Algorithm
///
/// 1. Parse a working copy of the document
/// 2. Detach chrome elements (navigation, header, footer, platform sidebars)
/// 3. Walk the content cascade; the first selector that matches wins
/// 4. Detach any chrome still nested inside the selected region
/// 5. Collect anchors and resolve the title
///
/// A region with no inner markup falls back to the whole body.
///
/// # Example
///
/// ```
/// use doc_harvest::crawler::{extract_main_content, ContentStrategy};
///
/// let html = r#"<html><body><nav><a href="/x">Menu</a></nav>
///     <main><h1>Install</h1><a href="/docs/next">Next</a></main></body></html>"#;
/// let content = extract_main_content(html);
///
/// assert_eq!(content.strategy, ContentStrategy::Generic("main"));
/// assert_eq!(content.title, "Install");
/// assert_eq!(content.hrefs, vec!["/docs/next".to_string()]);
/// ```
pub fn extract_main_content(html: &str) -> ExtractedContent {
    let mut document = Html::parse_document(html);

    let chrome = chrome_selector();
    if let Some(chrome) = &chrome {
        let ids: Vec<_> = document
            .root_element()
            .select(chrome)
            .map(|el| el.id())
            .collect();
        detach_all(&mut document, ids);
    }

    let (strategy, region_id) = select_region(&document);

    if let Some(chrome) = &chrome {
        let ids: Vec<_> = document
            .tree
            .get(region_id)
            .and_then(ElementRef::wrap)
            .map(|region| region.select(chrome).map(|el| el.id()).collect())
            .unwrap_or_default();
        detach_all(&mut document, ids);
    }

    let title = resolve_title(&document);

    let Some(region) = document.tree.get(region_id).and_then(ElementRef::wrap) else {
        return ExtractedContent {
            html: String::new(),
            title,
            hrefs: Vec::new(),
            strategy,
        };
    };

    ExtractedContent {
        html: region.inner_html(),
        title,
        hrefs: collect_hrefs(region),
        strategy,
    }
}

/// Walks the cascade and returns the winning strategy and region node
fn select_region(document: &Html) -> (ContentStrategy, ego_tree::NodeId) {
    for strategy in CONTENT_CASCADE {
        let Some(element) = strategy.locate(document) else {
            continue;
        };

        if *strategy != ContentStrategy::Body && element.inner_html().trim().is_empty() {
            tracing::debug!(
                "Selector {} matched an empty region, using body",
                strategy.selector()
            );
            break;
        }

        return (*strategy, element.id());
    }

    let body = ContentStrategy::Body
        .locate(document)
        .unwrap_or_else(|| document.root_element());
    (ContentStrategy::Body, body.id())
}

fn chrome_selector() -> Option<Selector> {
    Selector::parse(&CHROME_SELECTORS.join(", ")).ok()
}

fn detach_all(document: &mut Html, ids: Vec<ego_tree::NodeId>) {
    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// Collects `href` values of anchors inside the region
///
/// Anchors with a `download` attribute are skipped.
fn collect_hrefs(region: ElementRef<'_>) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    region
        .select(&selector)
        .filter(|a| a.value().attr("download").is_none())
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Resolves the page title from the working document
///
/// First non-empty of: first `h1`, `<title>`, `.page-title`, `.title`.
fn resolve_title(document: &Html) -> String {
    TITLE_SELECTORS
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .root_element()
                .select(&selector)
                .next()
                .map(|el| collapse_whitespace(&el.text().collect::<String>()))
                .filter(|text| !text.is_empty())
        })
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
