//! URL handling module for doc-harvest
//!
//! This module turns raw hrefs into canonical same-site URLs, rejects links
//! that should never be crawled, and derives page file names from URLs.

mod filter;
mod normalize;
mod slug;

use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use filter::should_ignore;
pub use normalize::canonicalize;
pub use slug::{page_filename, slugify};

/// Returns true if the URL lies under the crawl root
///
/// Containment is a plain string-prefix test on the serialized URLs, so a
/// root of `https://example.com/docs` also contains `https://example.com/docs-v2`.
pub fn is_same_site(url: &Url, root: &Url) -> bool {
    url.as_str().starts_with(root.as_str())
}

/// Resolves a discovered href into a URL that should be crawled
///
/// Applies, in order, the link filter, canonicalization and same-site
/// containment.
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `current` - The URL of the page the href was found on
/// * `root` - The crawl root URL
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL to crawl
/// * `Err(UrlError)` - Why the link is not followed
///
/// # Examples
///
/// ```
/// use doc_harvest::url::resolve_link;
/// use url::Url;
///
/// let root = Url::parse("https://root.example/docs").unwrap();
/// let page = Url::parse("https://root.example/docs/intro").unwrap();
///
/// assert!(resolve_link("https://root.example/docs/x", &page, &root).is_ok());
/// assert!(resolve_link("https://other.example/x", &page, &root).is_err());
/// ```
pub fn resolve_link(href: &str, current: &Url, root: &Url) -> UrlResult<Url> {
    if should_ignore(href) {
        return Err(UrlError::Ignored(href.to_string()));
    }

    let url = canonicalize(href, current, root)?;

    if !is_same_site(&url, root) {
        return Err(UrlError::OffSite(url.to_string()));
    }

    Ok(url)
}
