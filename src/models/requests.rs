use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{Gender, Preference};

/// Request to register (or re-register) a profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    pub gender: Gender,
    #[validate(range(min = 18, max = 120))]
    pub age: u8,
    pub preference: Preference,
}

/// Request to find a chat partner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to leave the current chat (or cancel a pending wait)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StopRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
}

/// Request to relay a text message to the current partner
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MessageRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(length(min = 1))]
    pub text: String,
}
