//! Combined corpus generation
//!
//! Concatenates every page file of an output directory into a single
//! `combined_context.txt`, in directory-listing order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name of the combined corpus inside the output directory
pub const COMBINED_CONTEXT_FILE: &str = "combined_context.txt";

/// Delimiter placed between consecutive page files
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Extension of per-page files
const PAGE_EXTENSION: &str = "md";

/// Returns the path of the combined corpus for an output directory
pub fn combined_context_path(output_dir: &Path) -> PathBuf {
    output_dir.join(COMBINED_CONTEXT_FILE)
}

/// Lists the page files of an output directory in directory-listing order
///
/// The order is whatever the file system returns and is not guaranteed to
/// match crawl order.
pub fn list_page_files(output_dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in fs::read_dir(output_dir)? {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type()?.is_file() {
            continue;
        }

        if path.extension().and_then(|e| e.to_str()) == Some(PAGE_EXTENSION) {
            files.push(path);
        }
    }

    Ok(files)
}

/// Aggregates all page files into the combined corpus
///
/// Reads every page file in directory-listing order, joins their full
/// contents with [`PAGE_SEPARATOR`], writes the result to
/// [`COMBINED_CONTEXT_FILE`] in the same directory and returns it.
/// A page file that cannot be read is logged and skipped.
///
/// # Arguments
///
/// * `output_dir` - Directory holding the page files
///
/// # Returns
///
/// * `Ok(String)` - The combined corpus text
/// * `Err(io::Error)` - The directory could not be listed or the corpus not written
pub fn aggregate(output_dir: &Path) -> io::Result<String> {
    let files = list_page_files(output_dir)?;
    let mut contents = Vec::with_capacity(files.len());

    for file in &files {
        match fs::read_to_string(file) {
            Ok(content) => contents.push(content),
            Err(e) => tracing::warn!("Skipping unreadable page file {}: {}", file.display(), e),
        }
    }

    let combined = contents.join(PAGE_SEPARATOR);
    let combined_path = combined_context_path(output_dir);
    fs::write(&combined_path, &combined)?;

    tracing::info!(
        "Combined {} page files into {} ({} bytes)",
        contents.len(),
        combined_path.display(),
        combined.len()
    );

    Ok(combined)
}
