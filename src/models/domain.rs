use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque platform user identifier, stable for the process lifetime
pub type UserId = String;

/// Registered gender of a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Who a user wants to be paired with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    Male,
    Female,
    Anyone,
}

impl Preference {
    /// Whether this preference accepts a partner of the given gender
    pub fn accepts(&self, gender: Gender) -> bool {
        match self {
            Preference::Anyone => true,
            Preference::Male => gender == Gender::Male,
            Preference::Female => gender == Gender::Female,
        }
    }
}

/// User profile captured at registration
///
/// Immutable once stored; re-registration overwrites the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub gender: Gender,
    pub age: u8,
    pub preference: Preference,
}

/// Notification emitted by the engine toward a single user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ChatEvent {
    /// A session was established; say hi
    Matched,
    /// No compatible candidate yet; the user entered the waiting pool
    Waiting,
    /// The partner tore the session down
    PartnerLeft,
    /// Acknowledgment that the user left (or was never in) a chat
    LeftChat,
    /// Relayed free-text message from the partner
    Text { body: String },
}

impl ChatEvent {
    /// Canonical display text, for transports that only speak plain strings
    pub fn display_text(&self) -> &str {
        match self {
            ChatEvent::Matched => "You have been matched! Say hi!",
            ChatEvent::Waiting => "Waiting for someone to match with you...",
            ChatEvent::PartnerLeft => "Your partner has left the chat.",
            ChatEvent::LeftChat => "You have left the chat.",
            ChatEvent::Text { body } => body,
        }
    }
}

/// Addressed, timestamped event on its way out of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEvent {
    #[serde(rename = "eventId")]
    pub event_id: Uuid,
    pub to: UserId,
    #[serde(flatten)]
    pub event: ChatEvent,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl OutboundEvent {
    pub fn new(to: UserId, event: ChatEvent) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            to,
            event,
            created_at: Utc::now(),
        }
    }
}
