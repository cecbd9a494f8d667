//! Markdown page file generation
//!
//! This module converts extracted content markup into Markdown and renders
//! the per-page files, each headed by a small frontmatter block:
//!
//! ```text
//! ---
//! title: Getting Started
//! url: https://docs.example.com/guide/start
//! parsed_at: 2024-05-01T12:00:00.000Z
//! ---
//!
//! # Getting Started
//! ...
//! ```

use crate::crawler::Page;
use crate::url::page_filename;
use chrono::{DateTime, SecondsFormat, Utc};
use htmd::options::{CodeBlockStyle, HeadingStyle, Options};
use htmd::{Element, HtmlToMarkdown};
use scraper::Html;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use url::Url;

/// Line that opens and closes the frontmatter block
const FRONTMATTER_MARKER: &str = "---";

/// Metadata header of a page file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub url: String,
    pub parsed_at: DateTime<Utc>,
}

/// A rendered page ready to be written
#[derive(Debug, Clone)]
pub struct PageFile {
    /// File name inside the output directory (`<slug>.md`)
    pub filename: String,
    pub frontmatter: FrontMatter,
    /// Converted Markdown body
    pub body: String,
}

impl PageFile {
    /// Builds the page file for an extracted page
    pub fn from_page(page: &Page, root: &Url) -> Self {
        Self {
            filename: page_filename(page.url.as_str(), root),
            frontmatter: FrontMatter {
                title: page.title.clone(),
                url: page.url.to_string(),
                parsed_at: page.fetched_at,
            },
            body: to_portable_text(&page.extracted_html),
        }
    }

    /// Renders the frontmatter followed by the body
    pub fn render(&self) -> String {
        render_page_file(&self.frontmatter, &self.body)
    }

    /// Writes the rendered file into `dir`, replacing any file with the same name
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Path of the written file
    /// * `Err(io::Error)` - The file could not be written
    pub fn write_to(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(&self.filename);
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

/// Renders a page file from its frontmatter and body
pub fn render_page_file(frontmatter: &FrontMatter, body: &str) -> String {
    let mut md = String::with_capacity(body.len() + 128);

    md.push_str(FRONTMATTER_MARKER);
    md.push('\n');
    md.push_str(&format!("title: {}\n", frontmatter.title.trim()));
    md.push_str(&format!("url: {}\n", frontmatter.url));
    md.push_str(&format!(
        "parsed_at: {}\n",
        frontmatter
            .parsed_at
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    ));
    md.push_str(FRONTMATTER_MARKER);
    md.push_str("\n\n");
    md.push_str(body);

    md
}

/// Block elements without a Markdown form, rendered as separate paragraphs
const PLAIN_BLOCK_TAGS: &[&str] = &["dl", "dt", "dd", "figure", "figcaption", "details", "summary"];

/// Converts content markup into Markdown
///
/// Headings use ATX style and code blocks are fenced. Elements without a
/// Markdown form keep their text content, with block elements kept apart as
/// paragraphs; if conversion fails outright the whole fragment degrades to
/// its plain text.
///
/// # Example
///
/// ```
/// use doc_harvest::output::to_portable_text;
///
/// let md = to_portable_text(r#"<p>See <a href="https://example.com/api">the API</a>.</p>"#);
/// assert!(md.contains("[the API](https://example.com/api)"));
/// ```
pub fn to_portable_text(content_html: &str) -> String {
    let converter = HtmlToMarkdown::builder()
        .skip_tags(vec!["script", "style", "noscript", "template"])
        .add_handler(PLAIN_BLOCK_TAGS.to_vec(), |element: Element| {
            Some(format!("\n\n{}\n\n", element.content.trim()))
        })
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        })
        .build();

    match converter.convert(content_html) {
        Ok(markdown) => markdown.trim().to_string(),
        Err(e) => {
            tracing::warn!("Markdown conversion failed, keeping plain text: {}", e);
            plain_text(content_html)
        }
    }
}

/// Text content of a fragment, one trimmed text node per line
fn plain_text(content_html: &str) -> String {
    let fragment = Html::parse_fragment(content_html);

    fragment
        .root_element()
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
