use url::Url;

/// Slug used for the crawl root itself
const ROOT_SLUG: &str = "index";

/// Derives a stable file stem from a page URL
///
/// Strips the root prefix, any fragment and one trailing slash, replaces every
/// run of non-alphanumeric characters with `_` and lowercases the result.
/// Distinct URLs that differ only in punctuation map to the same slug.
///
/// # Examples
///
/// ```
/// use doc_harvest::url::slugify;
/// use url::Url;
///
/// let root = Url::parse("https://docs.example.com/guide").unwrap();
/// assert_eq!(slugify("https://docs.example.com/guide/Getting-Started/", &root), "_getting_started");
/// assert_eq!(slugify("https://docs.example.com/guide", &root), "index");
/// ```
pub fn slugify(url: &str, root: &Url) -> String {
    let relative = url.strip_prefix(root.as_str()).unwrap_or(url);
    let relative = relative.split('#').next().unwrap_or_default();
    let relative = relative.strip_suffix('/').unwrap_or(relative);

    let mut slug = String::with_capacity(relative.len());
    let mut in_separator = false;

    for c in relative.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            in_separator = false;
        } else if !in_separator {
            slug.push('_');
            in_separator = true;
        }
    }

    if slug.is_empty() || slug == "_" {
        ROOT_SLUG.to_string()
    } else {
        slug
    }
}

/// Returns the page file name (`<slug>.md`) for a URL
pub fn page_filename(url: &str, root: &Url) -> String {
    format!("{}.md", slugify(url, root))
}
