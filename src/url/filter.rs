/// Schemes that never lead to a crawlable page
const IGNORED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Schemes rejected wherever they appear in an href
const ANYWHERE_SCHEMES: &[&str] = &["mailto:", "tel:"];

/// Path extensions of packaged or binary assets
const ASSET_EXTENSIONS: &[&str] = &[
    // archives
    "zip", "tar", "gz", "tgz", "bz2", "xz", "rar", "7z",
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp",
    // stylesheets and scripts
    "css", "js", "mjs",
    // fonts
    "woff", "woff2", "ttf", "otf", "eot",
];

/// Markers of tracking query parameters
const TRACKING_MARKERS: &[&str] = &["utm_"];

/// Markers of internal documentation-platform artifact paths (GitBook)
const PLATFORM_ARTIFACT_MARKERS: &[&str] = &["~gitbook"];

/// Returns true if a raw href should never be followed
///
/// # Rejected Links
///
/// - Empty and fragment-only hrefs (`#section`)
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Archives, images, stylesheets, scripts and fonts (by path extension)
/// - Links carrying tracking parameters (`utm_*`)
/// - Documentation-platform artifact paths (`~gitbook`)
///
/// # Examples
///
/// ```
/// use doc_harvest::url::should_ignore;
///
/// assert!(should_ignore("#section"));
/// assert!(should_ignore("javascript:void(0)"));
/// assert!(should_ignore("assets/style.css"));
/// assert!(!should_ignore("/docs/getting-started"));
/// ```
pub fn should_ignore(href: &str) -> bool {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return true;
    }

    let lower = href.to_ascii_lowercase();

    if IGNORED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme))
        || ANYWHERE_SCHEMES.iter().any(|scheme| lower.contains(scheme))
    {
        return true;
    }

    if has_asset_extension(&lower) {
        return true;
    }

    TRACKING_MARKERS
        .iter()
        .chain(PLATFORM_ARTIFACT_MARKERS)
        .any(|marker| lower.contains(marker))
}

/// Checks the last path segment's extension, ignoring query and fragment
fn has_asset_extension(lower: &str) -> bool {
    let path = lower.split(['?', '#']).next().unwrap_or_default();
    let segment = path.rsplit('/').next().unwrap_or_default();

    match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ASSET_EXTENSIONS.contains(&ext),
        _ => false,
    }
}
