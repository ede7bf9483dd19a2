//! HTTP client for the concierge backend
//!
//! Features:
//! - Chat, training and speech synthesis calls
//! - Health probe and menu availability polling
//! - Staff menu listing and availability toggles (bearer authenticated)
//! - Status classification (429 rate limit, 401 auth failure)

pub mod api;
pub mod backend;

pub use api::{
    AvailabilityResponse, ChatRequest, ChatResponse, RatingRequest, StaffMenuResponse,
    ThemeResponse, ToggleRequest, TrainingRequest, TrainingResponse, TtsRequest,
};
pub use backend::{ClientConfig, ConciergeBackend, HttpBackend};

use thiserror::Error;

/// Client errors
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Rate limited by backend")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Backend returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// HTTP status behind this error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::RateLimited => Some(429),
            ClientError::Unauthorized => Some(401),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::InvalidResponse(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<ClientError> for concierge_core::Error {
    fn from(err: ClientError) -> Self {
        concierge_core::Error::Backend(err.to_string())
    }
}
