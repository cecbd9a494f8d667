//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `RunPhase`: The phase of a crawl run (init, clearing, crawling, aggregating, done)
//! - `PageOutcome`: How processing of an individual page ended

mod page_outcome;
mod run_phase;

// Re-export main types
pub use page_outcome::PageOutcome;
pub use run_phase::RunPhase;
