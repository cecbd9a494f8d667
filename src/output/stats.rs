//! Statistics of an output directory
//!
//! This module inspects the page files and combined corpus written by a
//! previous crawl and summarizes them.

use crate::crawler::UNTITLED;
use crate::output::aggregate::{combined_context_path, list_page_files};
use std::fs;
use std::io;
use std::path::Path;

/// Output directory statistics summary
#[derive(Debug, Clone, Default)]
pub struct OutputStatistics {
    /// Number of page files
    pub page_files: u64,

    /// Total size of all page files (bytes)
    pub page_bytes: u64,

    /// Page files whose title fell back to the untitled sentinel
    pub untitled_pages: u64,

    /// Largest page file name and size
    pub largest_page: Option<(String, u64)>,

    /// Size of the combined corpus, if present
    pub corpus_bytes: Option<u64>,
}

/// Loads statistics from an output directory
///
/// # Arguments
///
/// * `output_dir` - Directory written by a crawl
///
/// # Returns
///
/// * `Ok(OutputStatistics)` - Successfully collected statistics
/// * `Err(io::Error)` - The directory could not be listed
pub fn load_statistics(output_dir: &Path) -> io::Result<OutputStatistics> {
    let mut stats = OutputStatistics::default();
    let untitled_line = format!("\ntitle: {}\n", UNTITLED);

    for path in list_page_files(output_dir)? {
        let content = match fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Skipping unreadable page file {}: {}", path.display(), e);
                continue;
            }
        };

        let size = content.len() as u64;
        stats.page_files += 1;
        stats.page_bytes += size;

        if content.contains(&untitled_line) {
            stats.untitled_pages += 1;
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if stats
            .largest_page
            .as_ref()
            .map_or(true, |(_, largest)| size > *largest)
        {
            stats.largest_page = Some((name, size));
        }
    }

    stats.corpus_bytes = fs::metadata(combined_context_path(output_dir))
        .ok()
        .map(|m| m.len());

    Ok(stats)
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &OutputStatistics) {
    println!("=== Output Statistics ===\n");

    println!("Pages:");
    println!("  Page files: {}", stats.page_files);
    println!("  Total size: {} bytes", stats.page_bytes);
    if stats.page_files > 0 {
        println!(
            "  Average size: {:.0} bytes",
            stats.page_bytes as f64 / stats.page_files as f64
        );
    }
    if let Some((name, size)) = &stats.largest_page {
        println!("  Largest: {} ({} bytes)", name, size);
    }
    println!("  Untitled: {}", stats.untitled_pages);
    println!();

    match stats.corpus_bytes {
        Some(bytes) => println!("Combined corpus: {} bytes", bytes),
        None => println!("Combined corpus: missing"),
    }
}
