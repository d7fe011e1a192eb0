// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ChatEvent, Gender, OutboundEvent, Preference, Profile, UserId};
pub use requests::{MatchRequest, MessageRequest, RegisterRequest, StopRequest};
pub use responses::{
    ErrorResponse, EventsResponse, HealthResponse, MatchResponse, MessageResponse,
    ProfileResponse, RegisterResponse, StopResponse,
};
