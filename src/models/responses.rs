use serde::{Deserialize, Serialize};

use crate::models::domain::{OutboundEvent, Profile, UserId};

/// Response for the register endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub status: String,
}

/// Response for the profile lookup endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    #[serde(flatten)]
    pub profile: Profile,
}

/// Response for the match and next endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchResponse {
    /// "matched" or "waiting"
    pub status: String,
    #[serde(rename = "partnerId")]
    pub partner_id: Option<UserId>,
}

/// Response for the stop endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopResponse {
    pub status: String,
    #[serde(rename = "partnerNotified")]
    pub partner_notified: bool,
}

/// Response for the message endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// False when the sender has no active partner (the message was dropped)
    pub delivered: bool,
}

/// Response for the events poll endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(rename = "userId")]
    pub user_id: UserId,
    pub events: Vec<OutboundEvent>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
