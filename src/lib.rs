//! Pairlink - In-memory peer-pairing and chat relay engine
//!
//! Users register a profile, request a match, and once paired exchange
//! free-text messages relayed through the server until either party stops
//! or skips to the next partner. Everything lives in memory in a single
//! process; there is no persistence and no message history.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Engine, EngineError, MatchOutcome, Matcher, StopOutcome};
pub use models::{ChatEvent, Gender, OutboundEvent, Preference, Profile, UserId};
pub use services::{Mailboxes, ProfileStore};
