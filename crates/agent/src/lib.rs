//! Restaurant concierge agent
//!
//! Features:
//! - Conversation session with a single in-flight chat request
//! - Voice capture with auto-submit after end of speech
//! - Reply vocalization through remote TTS with a local synthesizer fallback
//! - Background health probe and menu availability polling
//! - Staff roleplay training and the staff menu console

pub mod capture;
pub mod concierge;
pub mod conversation;
pub mod monitor;
pub mod outcome;
pub mod slot;
pub mod staff;
pub mod state;
pub mod training;
pub mod vocalizer;

pub use capture::{CaptureState, VoiceCapture};
pub use concierge::{Concierge, Platform, SessionSnapshot};
pub use conversation::ConversationSession;
pub use monitor::{BackgroundMonitor, MonitorHandle};
pub use outcome::{classify, FailureKind, IgnoreReason, SubmitOutcome};
pub use slot::{SubmitSlot, Submitter};
pub use staff::StaffConsole;
pub use state::{RequestGate, RequestGuard, SessionEvent, SessionPhase, SessionState};
pub use training::TrainingSession;
pub use vocalizer::{SpeakOutcome, Vocalizer};

use concierge_client::ClientError;
use concierge_config::ConfigError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Speech capture is not supported on this platform")]
    Unsupported,

    #[error("Recognition error: {0}")]
    Recognition(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rating already submitted")]
    AlreadyRated,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<ClientError> for AgentError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Unauthorized => AgentError::Unauthorized,
            other => AgentError::Backend(other.to_string()),
        }
    }
}

impl From<ConfigError> for AgentError {
    fn from(err: ConfigError) -> Self {
        AgentError::Config(err.to_string())
    }
}

impl From<concierge_core::Error> for AgentError {
    fn from(err: concierge_core::Error) -> Self {
        use concierge_core::Error;
        match err {
            Error::Recognition(msg) => AgentError::Recognition(msg),
            Error::Unsupported(_) => AgentError::Unsupported,
            Error::Backend(msg) => AgentError::Backend(msg),
            Error::Config(msg) => AgentError::Config(msg),
            Error::InvalidInput(msg) => AgentError::InvalidInput(msg),
            other => AgentError::Platform(other.to_string()),
        }
    }
}

impl From<AgentError> for concierge_core::Error {
    fn from(err: AgentError) -> Self {
        use concierge_core::Error;
        match err {
            AgentError::Unsupported => Error::Unsupported("speech capture".to_string()),
            AgentError::Recognition(msg) => Error::Recognition(msg),
            AgentError::Config(msg) => Error::Config(msg),
            AgentError::InvalidInput(msg) => Error::InvalidInput(msg),
            other => Error::Backend(other.to_string()),
        }
    }
}
