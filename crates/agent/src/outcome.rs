//! Submission outcomes and failure classification

use concierge_client::ClientError;
use concierge_core::Message;

/// How a failed backend call is presented to the guest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// HTTP 429: polite end of session, not an outage
    RateLimited,
    /// Any other transport or protocol failure
    BackendUnavailable,
}

/// Classify a client error
pub fn classify(err: &ClientError) -> FailureKind {
    match err {
        ClientError::RateLimited => FailureKind::RateLimited,
        _ => FailureKind::BackendUnavailable,
    }
}

/// Why a submission was dropped without touching the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Input was empty after trimming
    EmptyInput,
    /// Another request is still outstanding
    RequestInFlight,
}

/// Result of one submit call
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Dropped at the guard; nothing was appended
    Ignored(IgnoreReason),
    /// Reply appended
    Replied(Message),
    /// Rate-limit text appended
    RateLimited(Message),
    /// Generic error text appended
    Failed(Message),
    /// The session was reset while the request was outstanding
    Discarded,
}

impl SubmitOutcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }

    /// Assistant message appended by this submission, if any
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Replied(m) | Self::RateLimited(m) | Self::Failed(m) => Some(m),
            Self::Ignored(_) | Self::Discarded => None,
        }
    }
}
