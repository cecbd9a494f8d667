/// Per-page outcome definitions
///
/// Every dispatched URL ends in exactly one of these outcomes.
use std::fmt;

/// Final outcome of processing one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Page file was written
    Written,

    /// Page file was written over a file from a different URL with the same slug
    Overwrote,

    /// Page returned a non-success HTTP status
    HttpError,

    /// Page could not be reached (connection refused, timeout, body read error)
    Unreachable,

    /// Page file could not be written
    WriteFailed,
}

impl PageOutcome {
    /// Returns true if a page file exists for this page
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Written | Self::Overwrote)
    }

    /// Returns true if this represents a recovered failure
    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Written => "written",
            Self::Overwrote => "overwrote",
            Self::HttpError => "http_error",
            Self::Unreachable => "unreachable",
            Self::WriteFailed => "write_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
