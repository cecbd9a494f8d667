//! Output module for page files, the combined corpus and agent context
//!
//! This module handles:
//! - Converting extracted content to Markdown page files
//! - Aggregating page files into `combined_context.txt`
//! - Assembling the downstream agent's context
//! - Reporting statistics of an output directory

pub mod aggregate;
mod context;
mod markdown;
pub mod stats;

pub use aggregate::{aggregate, combined_context_path, COMBINED_CONTEXT_FILE, PAGE_SEPARATOR};
pub use context::{export_context, load_context};
pub use markdown::{render_page_file, to_portable_text, FrontMatter, PageFile};
pub use stats::{load_statistics, print_statistics, OutputStatistics};
