//! Concierge backend trait and its HTTP implementation

use std::time::Duration;

use async_trait::async_trait;
use concierge_config::BackendSettings;
use concierge_core::{AvailabilityEntry, Language, StaffMenuItem};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::{
    AvailabilityResponse, ChatRequest, ChatResponse, RatingRequest, StaffMenuResponse,
    ThemeResponse, ToggleRequest, TrainingRequest, TrainingResponse, TtsRequest,
};
use crate::ClientError;

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL, without trailing `/api`
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from(&BackendSettings::default())
    }
}

impl From<&BackendSettings> for ClientConfig {
    fn from(settings: &BackendSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            timeout: settings.timeout(),
        }
    }
}

/// Remote operations the concierge relies on
#[async_trait]
pub trait ConciergeBackend: Send + Sync {
    /// `GET /health`; any non-2xx or transport failure is an error
    async fn health(&self) -> Result<(), ClientError>;

    /// Optional talk theme for the welcome screen
    async fn talk_theme(&self) -> Result<Option<String>, ClientError>;

    /// Current per-item availability
    async fn availability(&self) -> Result<Vec<AvailabilityEntry>, ClientError>;

    /// One chat turn
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError>;

    /// One roleplay training turn
    async fn train(&self, request: &TrainingRequest) -> Result<TrainingResponse, ClientError>;

    /// Synthesize speech, returning the encoded audio bytes
    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>, ClientError>;

    /// Submit a conversation rating
    async fn rate(&self, request: &RatingRequest) -> Result<(), ClientError>;

    /// Staff view of the menu
    async fn staff_menu(&self, token: Option<&str>) -> Result<Vec<StaffMenuItem>, ClientError>;

    /// Flip the availability of one menu item
    async fn toggle_menu(
        &self,
        token: Option<&str>,
        request: &ToggleRequest,
    ) -> Result<(), ClientError>;
}

/// reqwest-backed implementation
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                ClientError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    pub fn from_settings(settings: &BackendSettings) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from(settings))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorized(builder: RequestBuilder, token: Option<&str>) -> RequestBuilder {
        match token {
            Some(token) if !token.is_empty() => builder.bearer_auth(token),
            _ => builder,
        }
    }

    /// Map non-2xx statuses onto client errors
    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), body = %body, "Backend request failed");

        Err(match status {
            StatusCode::TOO_MANY_REQUESTS => ClientError::RateLimited,
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            _ => ClientError::Status {
                status: status.as_u16(),
                body,
            },
        })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(builder.send().await?).await?;
        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    async fn empty(builder: RequestBuilder) -> Result<(), ClientError> {
        Self::check(builder.send().await?).await?;
        Ok(())
    }
}

#[async_trait]
impl ConciergeBackend for HttpBackend {
    async fn health(&self) -> Result<(), ClientError> {
        Self::empty(self.client.get(self.url("/health"))).await
    }

    async fn talk_theme(&self) -> Result<Option<String>, ClientError> {
        let response: ThemeResponse =
            Self::json(self.client.get(self.url("/api/config/talk-theme"))).await?;
        Ok(response.theme.filter(|t| !t.trim().is_empty()))
    }

    async fn availability(&self) -> Result<Vec<AvailabilityEntry>, ClientError> {
        let response: AvailabilityResponse =
            Self::json(self.client.get(self.url("/api/menu/availability"))).await?;
        Ok(response.items)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        tracing::debug!(
            history = request.history.len(),
            lang = ?request.lang,
            "Sending chat request"
        );
        Self::json(self.client.post(self.url("/api/chat")).json(request)).await
    }

    async fn train(&self, request: &TrainingRequest) -> Result<TrainingResponse, ClientError> {
        Self::json(self.client.post(self.url("/api/chat/train")).json(request)).await
    }

    async fn synthesize(&self, text: &str, lang: Language) -> Result<Vec<u8>, ClientError> {
        let body = TtsRequest {
            text,
            lang: lang.tag(),
        };
        let response =
            Self::check(self.client.post(self.url("/api/tts")).json(&body).send().await?).await?;
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(ClientError::InvalidResponse("empty audio body".to_string()));
        }
        Ok(bytes.to_vec())
    }

    async fn rate(&self, request: &RatingRequest) -> Result<(), ClientError> {
        Self::empty(self.client.post(self.url("/api/rating")).json(request)).await
    }

    async fn staff_menu(&self, token: Option<&str>) -> Result<Vec<StaffMenuItem>, ClientError> {
        let builder = Self::authorized(self.client.get(self.url("/api/menu/staff")), token);
        let response: StaffMenuResponse = Self::json(builder).await?;
        Ok(response.items)
    }

    async fn toggle_menu(
        &self,
        token: Option<&str>,
        request: &ToggleRequest,
    ) -> Result<(), ClientError> {
        let builder = Self::authorized(self.client.post(self.url("/api/menu/toggle")), token);
        Self::empty(builder.json(request)).await
    }
}
