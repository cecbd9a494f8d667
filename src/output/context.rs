//! Context assembly for the downstream agent
//!
//! The agent's system context is a static preamble followed by the combined
//! corpus. A missing or unreadable part is logged and contributes nothing,
//! so the agent starts with whatever context is available.

use std::fs;
use std::io;
use std::path::Path;

/// Builds the agent context from a preamble file and the combined corpus
///
/// # Arguments
///
/// * `preamble_path` - Optional static preamble placed first
/// * `corpus_path` - Path to `combined_context.txt`
///
/// # Returns
///
/// The preamble text immediately followed by the corpus text
pub fn load_context(preamble_path: Option<&Path>, corpus_path: &Path) -> String {
    let preamble = preamble_path.map(read_or_empty).unwrap_or_default();
    let corpus = read_or_empty(corpus_path);

    tracing::info!(
        "Loaded context: {} bytes of preamble, {} bytes of corpus",
        preamble.len(),
        corpus.len()
    );

    preamble + &corpus
}

/// Writes the assembled context to `destination`
///
/// # Returns
///
/// * `Ok(usize)` - Number of bytes written
/// * `Err(io::Error)` - The destination could not be written
pub fn export_context(
    preamble_path: Option<&Path>,
    corpus_path: &Path,
    destination: &Path,
) -> io::Result<usize> {
    let context = load_context(preamble_path, corpus_path);

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(destination, &context)?;

    Ok(context.len())
}

fn read_or_empty(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!("Failed to read context file {}: {}", path.display(), e);
            String::new()
        }
    }
}
