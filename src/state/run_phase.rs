/// Run phase definitions for a single crawl
///
/// A run moves strictly forward through its phases, one step at a time.
use crate::HarvestError;
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Target is being validated
    Init,

    /// Output directory is being removed and recreated
    Clearing,

    /// Pages are being fetched, converted and written
    Crawling,

    /// Page files are being combined into the corpus
    Aggregating,

    /// Corpus has been written
    Done,
}

impl RunPhase {
    /// Returns the phase that legally follows this one
    pub fn next(&self) -> Option<Self> {
        match self {
            Self::Init => Some(Self::Clearing),
            Self::Clearing => Some(Self::Crawling),
            Self::Crawling => Some(Self::Aggregating),
            Self::Aggregating => Some(Self::Done),
            Self::Done => None,
        }
    }

    /// Returns true if moving to `to` is a legal transition
    pub fn can_transition_to(&self, to: Self) -> bool {
        self.next() == Some(to)
    }

    /// Moves to `to`, or fails with `InvalidTransition`
    pub fn advance(&mut self, to: Self) -> Result<(), HarvestError> {
        if !self.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition { from: *self, to });
        }

        tracing::debug!("Run phase: {} -> {}", self, to);
        *self = to;
        Ok(())
    }

    /// Returns true once the run has finished
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Clearing => "clearing",
            Self::Crawling => "crawling",
            Self::Aggregating => "aggregating",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
