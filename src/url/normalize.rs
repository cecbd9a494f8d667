use crate::{UrlError, UrlResult};
use url::{ParseError, Url};

/// Canonicalizes a discovered href into an absolute, comparable URL
///
/// # Resolution Rules
///
/// 1. Absolute-path hrefs (`/guide/intro`) resolve against the root's origin
/// 2. Scheme-qualified hrefs (`https://...`) are parsed as-is
/// 3. Relative and protocol-relative hrefs resolve against the current page
/// 4. The fragment is stripped from the result
/// 5. Only HTTP and HTTPS results are accepted
///
/// # Arguments
///
/// * `href` - The raw `href` attribute value
/// * `current` - The URL of the page the href was found on
/// * `root` - The crawl root URL
///
/// # Returns
///
/// * `Ok(Url)` - The canonical URL
/// * `Err(UrlError)` - The href could not be parsed or uses another scheme
///
/// # Examples
///
/// ```
/// use doc_harvest::url::canonicalize;
/// use url::Url;
///
/// let root = Url::parse("https://docs.example.com/guide").unwrap();
/// let current = Url::parse("https://docs.example.com/guide/intro/").unwrap();
///
/// let url = canonicalize("/guide/setup", &current, &root).unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide/setup");
///
/// let url = canonicalize("next#part-2", &current, &root).unwrap();
/// assert_eq!(url.as_str(), "https://docs.example.com/guide/intro/next");
/// ```
pub fn canonicalize(href: &str, current: &Url, root: &Url) -> UrlResult<Url> {
    let href = href.trim();

    let resolved = if href.starts_with('/') && !href.starts_with("//") {
        root.join(href)
    } else {
        match Url::parse(href) {
            Ok(url) => Ok(url),
            Err(ParseError::RelativeUrlWithoutBase) => current.join(href),
            Err(e) => Err(e),
        }
    };

    let mut url = resolved.map_err(|e| UrlError::Parse(format!("'{}': {}", href, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    url.set_fragment(None);

    Ok(url)
}
