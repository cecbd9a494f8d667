//! Crawl frontier and visited set
//!
//! The frontier is an explicit LIFO work stack. Children are pushed in
//! reverse document order, so with a single fetch in flight URLs are
//! dispatched in the same pre-order depth-first order a recursive walk
//! would produce, without growing the call stack.

use std::collections::HashSet;
use url::Url;

/// Canonical URLs already dispatched for fetch during one run
///
/// Grows monotonically and is never shared between runs.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: HashSet<String>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL as visited; returns false if it already was
    pub fn insert(&mut self, url: &Url) -> bool {
        self.urls.insert(url.as_str().to_string())
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

/// Work stack of URLs waiting to be fetched
#[derive(Debug, Default)]
pub struct Frontier {
    stack: Vec<Url>,
    visited: VisitedSet,
}

impl Frontier {
    /// Creates an empty frontier
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a URL visited without queuing it (used for the root page)
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url)
    }

    /// Queues the links of one page, preserving their document order
    ///
    /// Links that are already visited are dropped here; duplicates still
    /// waiting on the stack are dropped when popped.
    pub fn push_children(&mut self, links: Vec<Url>) {
        for url in links.into_iter().rev() {
            if !self.visited.contains(&url) {
                self.stack.push(url);
            }
        }
    }

    /// Pops the next unvisited URL and marks it visited
    ///
    /// Returns `None` once the stack is exhausted.
    pub fn next_unvisited(&mut self) -> Option<Url> {
        while let Some(url) = self.stack.pop() {
            if self.visited.insert(&url) {
                return Some(url);
            }
            tracing::trace!("Skipping already visited {}", url);
        }
        None
    }

    /// Number of URLs waiting on the stack (including duplicates)
    pub fn pending(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// The visited set of this run
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }
}
