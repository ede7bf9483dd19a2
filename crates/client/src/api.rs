//! Request and response bodies of the concierge API

use concierge_core::{AvailabilityEntry, EnergyContext, HistoryEntry, MenuItem, StaffMenuItem};
use serde::{Deserialize, Deserializer, Serialize};

/// `POST /api/chat`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_context: Option<EnergyContext>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Entries that do not decode as a menu item are dropped; the reply stands
    #[serde(default, deserialize_with = "lenient_menu_items")]
    pub menu_items: Option<Vec<MenuItem>>,
}

fn lenient_menu_items<'de, D>(deserializer: D) -> Result<Option<Vec<MenuItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::Array(entries)) => entries,
        Some(other) => {
            tracing::debug!(kind = ?other, "Ignoring non-array menu_items");
            return Ok(None);
        }
        None => return Ok(None),
    };

    let items = entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<MenuItem>(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::debug!(error = %e, "Skipping malformed menu item");
                None
            }
        })
        .collect();
    Ok(Some(items))
}

/// `POST /api/chat/train`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingRequest {
    pub message: String,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingResponse {
    pub customer_reply: String,
    #[serde(default)]
    pub feedback_to_staff: Option<String>,
}

/// `POST /api/tts`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TtsRequest<'a> {
    pub text: &'a str,
    pub lang: &'a str,
}

/// `POST /api/rating`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRequest {
    pub rating: u8,
    pub message_count: usize,
    pub lang: String,
}

/// `POST /api/menu/toggle`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleRequest {
    pub menu_name: String,
    pub available: bool,
}

/// `GET /api/menu/availability`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default)]
    pub items: Vec<AvailabilityEntry>,
}

/// `GET /api/menu/staff`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffMenuResponse {
    #[serde(default)]
    pub items: Vec<StaffMenuItem>,
}

/// `GET /api/config/talk-theme`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeResponse {
    #[serde(default)]
    pub theme: Option<String>,
}
